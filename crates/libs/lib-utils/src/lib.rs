//! # Utilities Library
//!
//! Shared utility functions for environment variables, month/date-range handling, and validation.

pub mod envs;
pub mod time;
pub mod validation;

// Re-export commonly used functions
pub use envs::{get_env, get_env_flag, get_env_or, get_env_parse, get_env_parse_or};
pub use time::{
    date_range_ending, format_day, format_month_key, month_start, parse_day, previous_month, today,
    DateRange,
};
pub use validation::{validate_email, validate_min_length, validate_not_empty};
