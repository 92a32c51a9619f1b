//! # Request and Response Types
//!
//! Transport-neutral description of one backend call. Paths are relative to
//! the configured base URL.

use crate::core::error::ApiError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

pub use reqwest::Method;

/// Percent-encode user input for use as one path segment.
pub fn path_segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// An outbound call before authentication is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append a query parameter.
    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    /// Append a query parameter only when `value` is present.
    pub fn query_opt(self, name: &str, value: Option<impl ToString>) -> Self {
        match value {
            Some(v) => self.query(name, v),
            None => self,
        }
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Decode(format!("Failed to encode request body: {}", e)))?;
        self.body = Some(value);
        Ok(self)
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// What the transport actually puts on the wire for one attempt.
#[derive(Debug, Clone, Copy)]
pub struct Envelope<'a> {
    pub request: &'a ApiRequest,
    /// Bearer token, when a session exists.
    pub bearer: Option<&'a str>,
    /// Correlates all attempts of one logical request in the logs.
    pub request_id: &'a str,
}

/// A response as received, success or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// No response was received.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("failed to read response body: {0}")]
    Body(String),
}

/// A successful (2xx) response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Decode the JSON body.
    ///
    /// An empty body decodes as JSON `null`, so endpoints that answer with no
    /// content can be read as `()` or `Option<T>`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body: &[u8] = if self.body.iter().all(u8::is_ascii_whitespace) {
            b"null"
        } else {
            &self.body
        };
        serde_json::from_slice(body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

impl From<RawResponse> for ApiResponse {
    fn from(raw: RawResponse) -> Self {
        Self {
            status: raw.status,
            body: raw.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let req = ApiRequest::get("/analytics/top-merchants")
            .query("startDate", "2025-01-01")
            .query_opt("month", None::<String>)
            .query("limit", 5);

        assert_eq!(req.method, Method::GET);
        assert_eq!(
            req.query,
            vec![
                ("startDate".to_string(), "2025-01-01".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
        assert_eq!(req.to_string(), "GET /analytics/top-merchants");
    }

    #[test]
    fn test_path_segment_escapes_reserved_characters() {
        assert_eq!(path_segment("Food & Dining"), "Food%20%26%20Dining");
        assert_eq!(path_segment("a/b?c#d"), "a%2Fb%3Fc%23d");
        assert_eq!(path_segment("AI_COACH"), "AI_COACH");
    }

    #[test]
    fn test_empty_body_decodes_as_unit() {
        let resp = ApiResponse {
            status: 204,
            body: Vec::new(),
        };
        assert!(resp.json::<()>().is_ok());
        assert_eq!(resp.json::<Option<u32>>(), Ok(None));
    }

    #[test]
    fn test_shape_mismatch_is_decode_error() {
        let resp = ApiResponse {
            status: 200,
            body: br#"{"unexpected": true}"#.to_vec(),
        };
        assert!(matches!(
            resp.json::<shared::AuthResponse>(),
            Err(ApiError::Decode(_))
        ));
    }
}
