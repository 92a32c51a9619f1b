//! # API Client
//!
//! Single chokepoint for backend calls. Wraps a [`Transport`] with the
//! cross-cutting policy every call needs:
//!
//! 1. attach the bearer token when a session exists
//! 2. bound each attempt by the request timeout
//! 3. retry network failures and 5xx with exponential backoff
//! 4. classify the terminal outcome into an [`ApiError`]
//! 5. on 401, invalidate the session the request was sent with
//!
//! Requests share nothing but the read-only token; retry state lives on the
//! stack of one [`ApiClient::send`] call.

use super::request::{ApiRequest, ApiResponse, Envelope, TransportError};
use super::retry::{is_retryable, RetryPolicy, Sleeper, TokioSleeper};
use super::session::SessionManager;
use super::transport::ReqwestTransport;
use crate::config::ClientConfig;
use crate::core::error::ApiError;
use crate::core::service::Transport;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-attempt ceiling when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP client for the finance backend.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<SessionManager>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    timeout: Duration,
}

impl ApiClient {
    /// Client on the reqwest transport, configured from `config`.
    pub fn new(config: &ClientConfig, session: Arc<SessionManager>) -> Self {
        let transport = Arc::new(ReqwestTransport::new(&config.api_base_url, config.request_timeout));
        Self::builder(transport, session)
            .retry_policy(config.retry_policy())
            .timeout(config.request_timeout)
            .build()
    }

    pub fn builder(transport: Arc<dyn Transport>, session: Arc<SessionManager>) -> ApiClientBuilder {
        ApiClientBuilder {
            transport,
            session,
            policy: RetryPolicy::default(),
            sleeper: Arc::new(TokioSleeper),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Send `request`, retrying transient failures, and return the 2xx response
    /// or the classified terminal error.
    #[tracing::instrument(skip(self, request), fields(method = %request.method, path = %request.path, request_id))]
    pub async fn send(&self, request: ApiRequest) -> Result<ApiResponse, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("request_id", request_id.as_str());

        // Read once: every attempt, and the 401 handler, refer to the same session.
        let bearer = self.session.token();
        let mut attempt: u32 = 1;

        loop {
            let start = Instant::now();
            let envelope = Envelope {
                request: &request,
                bearer: bearer.as_deref(),
                request_id: &request_id,
            };
            let outcome = match tokio::time::timeout(self.timeout, self.transport.execute(envelope)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(TransportError::Timeout(self.timeout)),
            };
            let duration_ms = start.elapsed().as_millis();
            let retryable = is_retryable(&outcome);

            let failure = match outcome {
                Ok(raw) if raw.is_success() => {
                    debug!(attempt, status = raw.status, duration_ms, "Request succeeded");
                    return Ok(raw.into());
                }
                Ok(raw) => {
                    let error = ApiError::from_response(raw.status, &raw.body);
                    warn!(attempt, status = raw.status, duration_ms, error = %error, "Request failed");
                    error
                }
                Err(e) => {
                    warn!(attempt, duration_ms, error = %e, "Request got no response");
                    ApiError::Network(e.to_string())
                }
            };

            if retryable && self.policy.allows_another(attempt) {
                attempt += 1;
                let delay = self.policy.delay_before(attempt);
                info!(next_attempt = attempt, max_attempts = self.policy.max_attempts, delay_ms = delay.as_millis(), "Retrying");
                self.sleeper.sleep(delay).await;
                continue;
            }

            if failure.is_fatal_to_session() {
                self.session.invalidate(bearer.as_deref());
            }
            return Err(failure);
        }
    }

    /// Send `request` and decode the JSON body.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        self.send(request).await?.json()
    }

    /// Send `request`, ignoring any response body.
    pub async fn execute(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.send(request).await.map(|_| ())
    }
}

/// Assembles an [`ApiClient`] from its collaborators.
pub struct ApiClientBuilder {
    transport: Arc<dyn Transport>,
    session: Arc<SessionManager>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    timeout: Duration,
}

impl ApiClientBuilder {
    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> ApiClient {
        ApiClient {
            transport: self.transport,
            session: self.session,
            policy: self.policy,
            sleeper: self.sleeper,
            timeout: self.timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::SessionStore;
    use crate::services::api::retry::RecordingSleeper;
    use crate::services::api::session::{MemorySessionStore, RecordingNavigator};
    use crate::testing::{MockReply, MockTransport};
    use serde_json::json;

    struct Harness {
        client: Arc<ApiClient>,
        transport: Arc<MockTransport>,
        sleeper: Arc<RecordingSleeper>,
        navigator: Arc<RecordingNavigator>,
        store: Arc<MemorySessionStore>,
    }

    fn harness(token: Option<&str>, transport: MockTransport) -> Harness {
        let store = Arc::new(match token {
            Some(t) => MemorySessionStore::with_token(t),
            None => MemorySessionStore::default(),
        });
        let navigator = Arc::new(RecordingNavigator::default());
        let session = Arc::new(SessionManager::new(store.clone(), navigator.clone()));
        let transport = Arc::new(transport);
        let sleeper = Arc::new(RecordingSleeper::new());
        let client = Arc::new(
            ApiClient::builder(transport.clone(), session)
                .sleeper(sleeper.clone())
                .build(),
        );
        Harness {
            client,
            transport,
            sleeper,
            navigator,
            store,
        }
    }

    #[tokio::test]
    async fn test_attaches_bearer_token() {
        let h = harness(Some("tok-123"), MockTransport::replying(MockReply::json(200, json!({}))));
        h.client.execute(ApiRequest::get("/users/me")).await.unwrap();

        let calls = h.transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].bearer.as_deref(), Some("tok-123"));
        assert_eq!(calls[0].path, "/users/me");
    }

    #[tokio::test]
    async fn test_unauthenticated_request_has_no_bearer() {
        let h = harness(None, MockTransport::replying(MockReply::json(200, json!([]))));
        h.client.execute(ApiRequest::get("/subscriptions/plans")).await.unwrap();
        assert_eq!(h.transport.calls()[0].bearer, None);
    }

    #[tokio::test]
    async fn test_two_server_errors_then_success() {
        let h = harness(
            Some("tok"),
            MockTransport::sequence(vec![
                MockReply::status(500),
                MockReply::status(500),
                MockReply::json(200, json!({"budgets": [], "totalBudget": 0})),
            ]),
        );

        let summary: shared::BudgetSummary =
            h.client.fetch(ApiRequest::get("/budgets/current")).await.unwrap();

        assert!(summary.budgets.is_empty());
        assert_eq!(h.transport.calls().len(), 3);
        assert_eq!(
            h.sleeper.calls(),
            vec![Duration::from_millis(1000), Duration::from_millis(2000)]
        );
    }

    #[tokio::test]
    async fn test_gives_up_after_three_attempts() {
        let h = harness(Some("tok"), MockTransport::replying(MockReply::status(503)));

        let err = h.client.execute(ApiRequest::get("/budgets/current")).await.unwrap_err();

        assert!(matches!(err, ApiError::Server { status: 503, .. }));
        assert_eq!(h.transport.calls().len(), 3);
        assert_eq!(h.sleeper.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_network_failure_is_distinguished() {
        let h = harness(Some("tok"), MockTransport::replying(MockReply::Network));

        let err = h.client.execute(ApiRequest::get("/transactions")).await.unwrap_err();

        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(h.transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_rate_limited_request_is_not_retried() {
        let h = harness(
            Some("tok"),
            MockTransport::sequence(vec![
                MockReply::json(429, json!({ "error": "Slow down" })),
                MockReply::json(200, json!({})),
            ]),
        );

        let err = h.client.execute(ApiRequest::get("/coach/weekly-summary")).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Validation {
                status: 429,
                message: "Slow down".to_string()
            }
        );
        assert_eq!(h.transport.calls().len(), 1);
        assert!(h.sleeper.calls().is_empty());
    }

    #[tokio::test]
    async fn test_not_found_is_not_retried() {
        let h = harness(Some("tok"), MockTransport::replying(MockReply::status(404)));

        let err = h.client.execute(ApiRequest::delete("/budgets/99")).await.unwrap_err();

        assert!(matches!(err, ApiError::NotFound(_)));
        assert_eq!(h.transport.calls().len(), 1);
        assert!(h.sleeper.calls().is_empty());
    }

    #[tokio::test]
    async fn test_validation_error_carries_server_message() {
        let h = harness(
            Some("tok"),
            MockTransport::replying(MockReply::json(400, json!({"error": "Amount must be positive"}))),
        );

        let err = h.client.execute(ApiRequest::post("/budgets")).await.unwrap_err();

        assert_eq!(
            err,
            ApiError::Validation {
                status: 400,
                message: "Amount must be positive".to_string()
            }
        );
        assert_eq!(h.transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_forbidden_keeps_session() {
        let h = harness(Some("tok"), MockTransport::replying(MockReply::status(403)));

        let err = h.client.execute(ApiRequest::get("/ai-coach/weekly-summary")).await.unwrap_err();

        assert!(matches!(err, ApiError::Forbidden(_)));
        assert_eq!(h.client.session().token().as_deref(), Some("tok"));
        assert_eq!(h.navigator.redirects(), 0);
    }

    #[tokio::test]
    async fn test_unauthorized_clears_session_and_redirects() {
        let h = harness(Some("tok"), MockTransport::replying(MockReply::status(401)));

        let err = h.client.execute(ApiRequest::get("/users/me")).await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized(_)));
        assert_eq!(h.transport.calls().len(), 1);
        assert!(h.client.session().token().is_none());
        assert!(h.store.load().is_none());
        assert_eq!(h.navigator.redirects(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_unauthorized_redirects_once() {
        let h = harness(Some("tok"), MockTransport::replying(MockReply::status(401)));

        let requests = (0..8).map(|i| {
            let client = h.client.clone();
            async move { client.execute(ApiRequest::get(format!("/budgets/{}", i))).await }
        });
        let results = futures::future::join_all(requests).await;

        assert!(results.iter().all(|r| matches!(r, Err(ApiError::Unauthorized(_)))));
        assert_eq!(h.navigator.redirects(), 1);
        assert!(h.client.session().token().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_network_failure() {
        let store = Arc::new(MemorySessionStore::with_token("tok"));
        let session = Arc::new(SessionManager::new(store, Arc::new(RecordingNavigator::default())));
        let transport = Arc::new(MockTransport::replying(MockReply::Hang));
        let client = ApiClient::builder(transport.clone(), session).build();

        let started = tokio::time::Instant::now();
        let err = client.execute(ApiRequest::get("/transactions")).await.unwrap_err();

        assert!(matches!(err, ApiError::Network(_)));
        assert_eq!(transport.calls().len(), 3);
        // three 30s ceilings plus 1s and 2s of backoff
        assert_eq!(started.elapsed(), Duration::from_secs(93));
    }

    #[tokio::test]
    async fn test_each_request_gets_its_own_id() {
        let h = harness(
            Some("tok"),
            MockTransport::sequence(vec![
                MockReply::status(500),
                MockReply::json(200, json!({})),
                MockReply::json(200, json!({})),
            ]),
        );

        h.client.execute(ApiRequest::get("/a")).await.unwrap();
        h.client.execute(ApiRequest::get("/b")).await.unwrap();

        let calls = h.transport.calls();
        assert_eq!(calls[0].request_id, calls[1].request_id);
        assert_ne!(calls[1].request_id, calls[2].request_id);
    }
}
