//! # Retry Policy
//!
//! Transient-failure retry for outbound calls. The predicate and the backoff
//! schedule are pure functions; waiting goes through [`Sleeper`] so tests can
//! observe the schedule without spending wall-clock time.
//!
//! Schedule with the defaults (3 attempts, 1 s base):
//!
//! ```text
//! attempt 1 ──fail──▶ wait 1s ──▶ attempt 2 ──fail──▶ wait 2s ──▶ attempt 3 ──▶ terminal
//! ```

use super::request::{RawResponse, TransportError};
use async_trait::async_trait;
use parking_lot::Mutex;
use rand::Rng;
use std::time::Duration;

/// Total attempts per request, first try included.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Delay before the second attempt; doubles for each later attempt.
pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Whether an attempt's outcome is worth another try.
///
/// No response at all, or a 5xx. A 4xx is deterministic and never retried.
pub fn is_retryable(outcome: &Result<RawResponse, TransportError>) -> bool {
    match outcome {
        Ok(response) => is_retryable_status(response.status),
        Err(_) => true,
    }
}

pub fn is_retryable_status(status: u16) -> bool {
    status >= 500
}

/// Delay before attempt `attempt` (1-based): `2^(attempt-2) * base`.
///
/// The first attempt is never delayed.
pub fn backoff_delay(attempt: u32, base: Duration) -> Duration {
    if attempt < 2 {
        return Duration::ZERO;
    }
    let exponent = (attempt - 2).min(16);
    base.saturating_mul(1u32 << exponent)
}

/// Retry configuration for one client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    /// Spread each delay over `[delay/2, delay]` to avoid synchronized retries.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            base_delay: DEFAULT_BASE_DELAY,
            jitter: false,
        }
    }
}

impl RetryPolicy {
    /// A policy that makes a single attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Whether another attempt may follow attempt number `attempt`.
    pub fn allows_another(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Delay to wait before attempt `attempt`, jitter applied.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        let delay = backoff_delay(attempt, self.base_delay);
        if !self.jitter || delay.is_zero() {
            return delay;
        }
        let ceiling = delay.as_millis() as u64;
        let floor = ceiling / 2;
        Duration::from_millis(rand::rng().random_range(floor..=ceiling))
    }
}

/// Non-blocking wait between attempts.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Records requested delays and returns immediately.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    calls: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Duration> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.calls.lock().push(duration);
    }
}
