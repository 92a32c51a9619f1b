//! # Environment Variables
//!
//! Utilities for reading and parsing environment variables.

use std::env;
use std::str::FromStr;

/// Get an environment variable by name.
pub fn get_env(name: &'static str) -> Result<String, Error> {
    env::var(name).map_err(|_| Error::MissingEnv(name))
}

/// Get and parse an environment variable.
pub fn get_env_parse<T: FromStr>(name: &'static str) -> Result<T, Error> {
    let val = get_env(name)?;
    val.trim().parse::<T>().map_err(|_| Error::WrongFormat(name))
}

/// Get an environment variable, falling back to `default` when unset or empty.
pub fn get_env_or(name: &'static str, default: &str) -> String {
    match env::var(name) {
        Ok(val) if !val.trim().is_empty() => val,
        _ => default.to_string(),
    }
}

/// Parse an environment variable, falling back to `default` when unset.
///
/// A variable that is set but unparseable is still an error.
pub fn get_env_parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, Error> {
    match env::var(name) {
        Ok(val) if !val.trim().is_empty() => {
            val.trim().parse::<T>().map_err(|_| Error::WrongFormat(name))
        }
        _ => Ok(default),
    }
}

/// Read a boolean flag. `1`, `true`, `yes` and `on` (any case) are true.
pub fn get_env_flag(name: &'static str, default: bool) -> bool {
    match env::var(name) {
        Ok(val) => matches!(
            val.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        ),
        Err(_) => default,
    }
}

// region:    --- Error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    MissingEnv(&'static str),
    WrongFormat(&'static str),
}

impl std::fmt::Display for Error {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}

impl std::error::Error for Error {}
// endregion: --- Error

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_env() {
        assert_eq!(
            get_env("LIB_UTILS_TEST_SURELY_UNSET"),
            Err(Error::MissingEnv("LIB_UTILS_TEST_SURELY_UNSET"))
        );
        assert_eq!(get_env_or("LIB_UTILS_TEST_SURELY_UNSET", "fallback"), "fallback");
        assert_eq!(get_env_parse_or("LIB_UTILS_TEST_SURELY_UNSET", 7u32), Ok(7));
        assert!(get_env_flag("LIB_UTILS_TEST_SURELY_UNSET", true));
    }

    #[test]
    fn test_parse_and_flags() {
        env::set_var("LIB_UTILS_TEST_NUMBER", " 42 ");
        env::set_var("LIB_UTILS_TEST_GARBAGE", "forty-two");
        env::set_var("LIB_UTILS_TEST_FLAG", "Yes");

        assert_eq!(get_env_parse::<u64>("LIB_UTILS_TEST_NUMBER"), Ok(42));
        assert_eq!(
            get_env_parse_or("LIB_UTILS_TEST_GARBAGE", 1u64),
            Err(Error::WrongFormat("LIB_UTILS_TEST_GARBAGE"))
        );
        assert!(get_env_flag("LIB_UTILS_TEST_FLAG", false));
    }
}
