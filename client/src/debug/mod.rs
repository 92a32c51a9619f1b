//! # Logging
//!
//! `tracing` subscriber setup for the CLI and for embedding applications.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: filter (default `finance_client=info,warn`)
//! - `FINANCE_LOG_DIR`: directory for the daily-rotated file (default `logs`)
//! - `FINANCE_LOG_FILE`: file logging on/off (default on)
//! - `FINANCE_LOG_JSON`: JSON lines on stderr (default off)
//!
//! ```rust,no_run
//! let _guard = finance_client::debug::init();
//! tracing::info!(endpoint = "/budgets/current", duration_ms = 42, "API call completed");
//! ```

pub mod config;
pub mod logger;

pub use config::LogConfig;
pub use tracing_appender::non_blocking::WorkerGuard;

/// Initialize logging from the environment. Hold the guard until exit.
pub fn init() -> Option<WorkerGuard> {
    logger::init(&LogConfig::from_env())
}
