//! Logging configuration from environment variables

use lib_utils::{get_env_flag, get_env_or};
use std::path::PathBuf;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_LEVEL: &str = "finance_client=info,warn";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Filter directives (e.g., "finance_client=debug,info")
    pub log_level: String,
    /// Directory for the rotated log file
    pub log_dir: PathBuf,
    /// Also write a daily-rotated file in `log_dir`
    pub file_logging: bool,
    /// JSON lines instead of human-readable output on stderr
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_dir: PathBuf::from("logs"),
            file_logging: true,
            json: false,
        }
    }
}

impl LogConfig {
    /// Load configuration from environment variables
    ///
    /// - `RUST_LOG`
    /// - `FINANCE_LOG_DIR` (default `logs`)
    /// - `FINANCE_LOG_FILE` (default on)
    /// - `FINANCE_LOG_JSON` (default off)
    pub fn from_env() -> Self {
        Self {
            log_level: get_env_or("RUST_LOG", DEFAULT_LOG_LEVEL),
            log_dir: PathBuf::from(get_env_or("FINANCE_LOG_DIR", "logs")),
            file_logging: get_env_flag("FINANCE_LOG_FILE", true),
            json: get_env_flag("FINANCE_LOG_JSON", false),
        }
    }

    pub fn is_debug_enabled(&self) -> bool {
        self.log_level.contains("debug") || self.log_level.contains("trace")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_detection() {
        let mut config = LogConfig::default();
        assert!(!config.is_debug_enabled());
        config.log_level = "finance_client=debug".to_string();
        assert!(config.is_debug_enabled());
    }
}
