//! # Auth Context
//!
//! Owns the transitions of the session: created by login/register or by
//! validating a persisted token at boot, destroyed by logout (here) or by a
//! 401 (in the API client). Every transition starts the query cache cold so
//! one user's data never shows up for the next.

use crate::core::error::{ApiError, AppError, Result};
use crate::services::api::{auth, ApiClient};
use crate::sync::QueryClient;
use lib_utils::{validate_email, validate_min_length, validate_not_empty};
use shared::{LoginRequest, RegisterRequest, ResetPasswordRequest, UserInfo};
use std::sync::Arc;
use tracing::{info, warn};

/// Minimum length for a new password.
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub struct AuthContext {
    api: Arc<ApiClient>,
    cache: QueryClient,
}

impl AuthContext {
    pub fn new(api: Arc<ApiClient>, cache: QueryClient) -> Self {
        Self { api, cache }
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.api.session().user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.api.session().is_authenticated()
    }

    /// Validate a persisted token by resolving the user it belongs to.
    ///
    /// A token the backend rejects is dropped. A network or server failure
    /// keeps it, so an offline start does not log the user out.
    #[tracing::instrument(skip(self))]
    pub async fn boot(&self) -> Result<Option<UserInfo>> {
        let session = self.api.session();
        let Some(token) = session.token() else {
            return Ok(None);
        };

        match auth::current_user(&self.api).await {
            Ok(user) => {
                session.attach_user(&token, user.clone());
                info!(user_id = user.id, "Persisted session is valid");
                Ok(Some(user))
            }
            Err(e @ (ApiError::Unauthorized(_) | ApiError::Forbidden(_) | ApiError::NotFound(_))) => {
                warn!(error = %e, "Persisted session rejected");
                // A 401 has already torn the session down; anything else has not.
                session.invalidate(Some(&token));
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<UserInfo> {
        validate_not_empty(email, "Email").map_err(AppError::Validation)?;
        validate_not_empty(password, "Password").map_err(AppError::Validation)?;

        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = auth::login(&self.api, &request).await?;
        self.api.session().establish(&response)?;
        self.cache.reset();
        Ok(response.user)
    }

    #[tracing::instrument(skip(self, password))]
    pub async fn register(&self, email: &str, password: &str, full_name: &str) -> Result<UserInfo> {
        validate_email(email).map_err(AppError::Validation)?;
        validate_min_length(password, MIN_PASSWORD_LENGTH, "Password").map_err(AppError::Validation)?;
        validate_not_empty(full_name, "Full name").map_err(AppError::Validation)?;

        let request = RegisterRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
            full_name: full_name.trim().to_string(),
        };
        let response = auth::register(&self.api, &request).await?;
        self.api.session().establish(&response)?;
        self.cache.reset();
        info!(user_id = response.user.id, "Registered");
        Ok(response.user)
    }

    pub fn logout(&self) -> Result<()> {
        self.api.session().logout()?;
        self.cache.reset();
        Ok(())
    }

    /// Ask for a reset link. Returns the backend's confirmation message.
    pub async fn forgot_password(&self, email: &str) -> Result<String> {
        validate_email(email).map_err(AppError::Validation)?;
        let response = auth::forgot_password(&self.api, email.trim()).await?;
        Ok(response.message)
    }

    pub async fn reset_password(&self, token: &str, new_password: &str, confirmation: &str) -> Result<String> {
        validate_not_empty(token, "Reset token").map_err(AppError::Validation)?;
        validate_min_length(new_password, MIN_PASSWORD_LENGTH, "Password").map_err(AppError::Validation)?;
        if new_password != confirmation {
            return Err(AppError::Validation("Passwords do not match".to_string()));
        }

        let request = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        let response = auth::reset_password(&self.api, &request).await?;
        Ok(response.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::SessionStore;
    use crate::services::api::{MemorySessionStore, RecordingNavigator, RecordingSleeper, SessionManager};
    use crate::testing::{MockReply, MockTransport};
    use serde_json::json;

    struct Harness {
        auth: AuthContext,
        transport: Arc<MockTransport>,
        store: Arc<MemorySessionStore>,
        navigator: Arc<RecordingNavigator>,
    }

    fn harness(token: Option<&str>, transport: MockTransport) -> Harness {
        let store = Arc::new(token.map(MemorySessionStore::with_token).unwrap_or_default());
        let navigator = Arc::new(RecordingNavigator::default());
        let session = Arc::new(SessionManager::new(store.clone(), navigator.clone()));
        let transport = Arc::new(transport);
        let api = Arc::new(
            ApiClient::builder(transport.clone(), session)
                .sleeper(Arc::new(RecordingSleeper::new()))
                .build(),
        );
        Harness {
            auth: AuthContext::new(api, QueryClient::new()),
            transport,
            store,
            navigator,
        }
    }

    fn user_json() -> serde_json::Value {
        json!({ "id": 7, "email": "ada@example.com", "fullName": "Ada Lovelace" })
    }

    #[tokio::test]
    async fn test_boot_without_token_makes_no_request() {
        let h = harness(None, MockTransport::replying(MockReply::status(500)));
        assert_eq!(h.auth.boot().await.unwrap(), None);
        assert!(h.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_boot_attaches_user() {
        let h = harness(Some("persisted"), MockTransport::replying(MockReply::json(200, user_json())));

        let user = h.auth.boot().await.unwrap().unwrap();

        assert_eq!(user.full_name, "Ada Lovelace");
        assert_eq!(h.auth.user(), Some(user));
        assert_eq!(h.transport.calls()[0].bearer.as_deref(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_boot_drops_rejected_token() {
        let h = harness(Some("expired"), MockTransport::replying(MockReply::status(401)));

        assert_eq!(h.auth.boot().await.unwrap(), None);
        assert!(!h.auth.is_authenticated());
        assert!(h.store.load().is_none());
        assert_eq!(h.navigator.redirects(), 1);
    }

    #[tokio::test]
    async fn test_boot_keeps_token_when_offline() {
        let h = harness(Some("persisted"), MockTransport::replying(MockReply::Network));

        let err = h.auth.boot().await.unwrap_err();

        assert!(matches!(err, AppError::Api(ApiError::Network(_))));
        assert!(h.auth.is_authenticated());
        assert_eq!(h.store.load().as_deref(), Some("persisted"));
    }

    #[tokio::test]
    async fn test_login_establishes_session() {
        let h = harness(
            None,
            MockTransport::replying(MockReply::json(200, json!({ "token": "fresh", "user": user_json() }))),
        );

        let user = h.auth.login("ada@example.com", "secret-pass").await.unwrap();

        assert_eq!(user.id, 7);
        assert_eq!(h.store.load().as_deref(), Some("fresh"));
        let call = &h.transport.calls()[0];
        assert_eq!(call.path, "/auth/login");
        assert_eq!(call.bearer, None);
        assert_eq!(
            call.body,
            Some(json!({ "email": "ada@example.com", "password": "secret-pass" }))
        );
    }

    #[tokio::test]
    async fn test_wrong_password_does_not_redirect() {
        let h = harness(
            None,
            MockTransport::replying(MockReply::json(401, json!({ "error": "Invalid email or password" }))),
        );

        let err = h.auth.login("ada@example.com", "nope").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "Unauthorized: Invalid email or password"
        );
        assert_eq!(h.navigator.redirects(), 0);
    }

    #[tokio::test]
    async fn test_input_is_validated_before_any_request() {
        let h = harness(None, MockTransport::replying(MockReply::status(500)));

        assert!(matches!(h.auth.login("", "pw").await, Err(AppError::Validation(_))));
        assert!(matches!(
            h.auth.register("not-an-email", "long-enough", "Ada").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            h.auth.register("ada@example.com", "short", "Ada").await,
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            h.auth.reset_password("tok", "long-enough", "different").await,
            Err(AppError::Validation(_))
        ));
        assert!(h.transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let h = harness(Some("tok"), MockTransport::replying(MockReply::status(500)));

        h.auth.logout().unwrap();

        assert!(!h.auth.is_authenticated());
        assert!(h.store.load().is_none());
        assert_eq!(h.navigator.redirects(), 0);
    }

    #[tokio::test]
    async fn test_forgot_password_returns_message() {
        let h = harness(
            None,
            MockTransport::replying(MockReply::json(200, json!({ "message": "Reset link sent" }))),
        );

        let message = h.auth.forgot_password("ada@example.com").await.unwrap();

        assert_eq!(message, "Reset link sent");
        assert_eq!(h.transport.calls()[0].path, "/auth/forgot-password");
    }
}
