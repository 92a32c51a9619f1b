//! # Reqwest Transport
//!
//! The production [`Transport`]: one HTTP exchange over a pooled reqwest client.

use super::request::{Envelope, RawResponse, TransportError};
use crate::core::service::Transport;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// HTTP transport backed by a shared reqwest connection pool.
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ReqwestTransport {
    /// Create a transport rooted at `base_url` (e.g. `http://localhost:8080/api`).
    ///
    /// `timeout` is the per-attempt ceiling enforced by reqwest itself.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                Client::new()
            });

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base URL.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, envelope: Envelope<'_>) -> Result<RawResponse, TransportError> {
        let request = envelope.request;
        let mut builder = self
            .client
            .request(request.method.clone(), self.url_for(&request.path))
            .header(REQUEST_ID_HEADER, envelope.request_id);

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = envelope.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.timeout)
            } else {
                TransportError::Connect(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        Ok(RawResponse::new(status, body.to_vec()))
    }
}
