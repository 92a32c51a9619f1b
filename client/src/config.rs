//! # Client Configuration
//!
//! Loaded from environment variables (after `.env`, via `dotenvy`) and
//! validated before anything is built from it.
//!
//! | Variable | Default |
//! |---|---|
//! | `FINANCE_API_BASE_URL` | `http://localhost:8080/api` |
//! | `FINANCE_REQUEST_TIMEOUT_SECS` | `30` |
//! | `FINANCE_MAX_ATTEMPTS` | `3` |
//! | `FINANCE_RETRY_BASE_MS` | `1000` |
//! | `FINANCE_RETRY_JITTER` | off |
//! | `FINANCE_SESSION_FILE` | `.finance/session` |

use crate::core::error::{AppError, Result};
use crate::services::api::retry::{RetryPolicy, DEFAULT_BASE_DELAY, DEFAULT_MAX_ATTEMPTS};
use lib_utils::{get_env_flag, get_env_or, get_env_parse_or};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_SESSION_FILE: &str = ".finance/session";

/// Client configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend root; request paths are appended to it
    pub api_base_url: String,

    /// Ceiling for one attempt, not for the whole retried request
    pub request_timeout: Duration,

    /// Attempts per request, first try included
    pub max_attempts: u32,

    /// Delay before the second attempt; doubles afterwards
    pub retry_base_delay: Duration,

    pub retry_jitter: bool,

    /// Where the session token is persisted
    pub session_file: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(30),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_base_delay: DEFAULT_BASE_DELAY,
            retry_jitter: false,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }
}

impl ClientConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let api_base_url = get_env_or("FINANCE_API_BASE_URL", DEFAULT_API_BASE_URL);
        let timeout_secs: u64 =
            get_env_parse_or("FINANCE_REQUEST_TIMEOUT_SECS", defaults.request_timeout.as_secs())?;
        let max_attempts: u32 = get_env_parse_or("FINANCE_MAX_ATTEMPTS", defaults.max_attempts)?;
        let base_ms: u64 = get_env_parse_or(
            "FINANCE_RETRY_BASE_MS",
            defaults.retry_base_delay.as_millis() as u64,
        )?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            request_timeout: Duration::from_secs(timeout_secs),
            max_attempts,
            retry_base_delay: Duration::from_millis(base_ms),
            retry_jitter: get_env_flag("FINANCE_RETRY_JITTER", false),
            session_file: PathBuf::from(get_env_or("FINANCE_SESSION_FILE", DEFAULT_SESSION_FILE)),
        })
    }

    /// Load from the environment and validate.
    pub fn load() -> Result<Self> {
        let config = Self::from_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the client cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = self.api_base_url.as_str();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "FINANCE_API_BASE_URL must be an http(s) URL, got '{}'",
                url
            )));
        }

        if self.request_timeout.is_zero() {
            return Err(AppError::Config(
                "FINANCE_REQUEST_TIMEOUT_SECS must be greater than 0".to_string(),
            ));
        }

        if self.max_attempts == 0 {
            return Err(AppError::Config(
                "FINANCE_MAX_ATTEMPTS must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_attempts(self.max_attempts)
            .with_base_delay(self.retry_base_delay)
            .with_jitter(self.retry_jitter)
    }
}
