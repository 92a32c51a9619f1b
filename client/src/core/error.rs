//! # Common Error Types
//!
//! Error handling for the finance client.
//!
//! Two layers:
//!
//! - [`ApiError`]: terminal outcome of one backend call, after the retry
//!   policy has run. It is `Clone` because a single failed fetch is delivered
//!   to every observer of the query.
//! - [`AppError`]: application-level failures (session persistence,
//!   configuration, input validation) plus a transparent wrapper over
//!   [`ApiError`].
//!
//! ## Classification
//!
//! | Outcome | Variant | Retried |
//! |---|---|---|
//! | no response / timeout | `Network` | yes |
//! | 5xx | `Server` | yes |
//! | 401 | `Unauthorized` | no, tears the session down |
//! | 403 | `Forbidden` | no |
//! | 404 | `NotFound` | no |
//! | other 4xx | `Validation` | no |
//!
//! ```rust
//! use finance_client::core::error::{ApiError, ErrorKind};
//!
//! let err = ApiError::from_status(503, None);
//! assert_eq!(err.kind(), ErrorKind::Server);
//! assert!(err.is_retryable());
//! ```

use shared::ErrorResponse;
use thiserror::Error;

/// Terminal error of a backend call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// 401. The session has been invalidated by the time the caller sees this.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// 403. Typically a feature not included in the user's plan.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success, non-5xx status. Carries the server message.
    #[error("Request rejected ({status}): {message}")]
    Validation { status: u16, message: String },

    /// 5xx after the retry budget was exhausted.
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// No response after the retry budget was exhausted (connection failure or timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// 2xx whose body did not match the expected shape.
    #[error("Failed to parse response: {0}")]
    Decode(String),
}

/// Coarse grouping used to pick a banner in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No connectivity; suggest checking the connection.
    Network,
    /// Backend failure; suggest trying later.
    Server,
    /// The request itself was refused.
    Client,
}

impl ApiError {
    /// Classify a non-success status, using the decoded error body's message when present.
    pub fn from_status(status: u16, body: Option<&ErrorResponse>) -> Self {
        let message = body
            .and_then(ErrorResponse::text)
            .map(str::to_string)
            .unwrap_or_else(|| default_message(status).to_string());

        match status {
            401 => ApiError::Unauthorized(message),
            403 => ApiError::Forbidden(message),
            404 => ApiError::NotFound(message),
            s if s >= 500 => ApiError::Server { status: s, message },
            s => ApiError::Validation { status: s, message },
        }
    }

    /// Classify a non-success response from its raw body.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let decoded = serde_json::from_slice::<ErrorResponse>(body).ok();
        Self::from_status(status, decoded.as_ref())
    }

    /// HTTP status behind this error, if a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized(_) => Some(401),
            ApiError::Forbidden(_) => Some(403),
            ApiError::NotFound(_) => Some(404),
            ApiError::Validation { status, .. } | ApiError::Server { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode(_) => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(_) => ErrorKind::Network,
            ApiError::Server { .. } | ApiError::Decode(_) => ErrorKind::Server,
            _ => ErrorKind::Client,
        }
    }

    /// Whether this error came from a retryable attempt outcome, as judged by
    /// [`crate::services::api::retry::is_retryable`].
    pub fn is_retryable(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Server { .. })
    }

    /// Only an authentication failure ends the session.
    pub fn is_fatal_to_session(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }
}

fn default_message(status: u16) -> &'static str {
    match status {
        400 => "Bad request",
        401 => "Session expired, please log in again",
        403 => "Access denied",
        404 => "Resource not found",
        409 => "Conflict",
        422 => "Unprocessable request",
        429 => "Too many requests",
        s if s >= 500 => "Server error",
        _ => "Unexpected response",
    }
}

/// Application-wide error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Persisting or removing the session token failed.
    #[error("Session storage error: {0}")]
    Session(String),

    /// Missing or invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before any request was made.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Convenience type alias for `Result<T, AppError>`.
pub type Result<T> = std::result::Result<T, AppError>;

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Session(err.to_string())
    }
}

impl From<lib_utils::envs::Error> for AppError {
    fn from(err: lib_utils::envs::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert!(matches!(ApiError::from_status(401, None), ApiError::Unauthorized(_)));
        assert!(matches!(ApiError::from_status(403, None), ApiError::Forbidden(_)));
        assert!(matches!(ApiError::from_status(404, None), ApiError::NotFound(_)));
        assert!(matches!(
            ApiError::from_status(422, None),
            ApiError::Validation { status: 422, .. }
        ));
        assert!(matches!(
            ApiError::from_status(502, None),
            ApiError::Server { status: 502, .. }
        ));
    }

    #[test]
    fn test_server_message_is_kept() {
        let err = ApiError::from_response(400, br#"{"error": "Amount must be positive"}"#);
        assert_eq!(
            err,
            ApiError::Validation {
                status: 400,
                message: "Amount must be positive".to_string()
            }
        );
    }

    #[test]
    fn test_unparseable_error_body_falls_back_to_default_message() {
        let err = ApiError::from_response(500, b"<html>gateway</html>");
        assert_eq!(err.to_string(), "Server error (500): Server error");
    }

    #[test]
    fn test_kinds_and_retryability() {
        assert_eq!(ApiError::Network("refused".into()).kind(), ErrorKind::Network);
        assert!(ApiError::Network("refused".into()).is_retryable());
        assert!(!ApiError::from_status(404, None).is_retryable());
        assert!(!ApiError::from_status(429, None).is_retryable());
        assert_eq!(ApiError::from_status(400, None).kind(), ErrorKind::Client);
        assert!(ApiError::from_status(401, None).is_fatal_to_session());
        assert!(!ApiError::from_status(403, None).is_fatal_to_session());
    }
}
