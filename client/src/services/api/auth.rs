//! # Authentication Endpoints
//!
//! Login, registration, current user and password reset.

use super::client::ApiClient;
use super::request::ApiRequest;
use crate::core::error::ApiError;
use shared::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MessageResponse, RegisterRequest,
    ResetPasswordRequest, UserInfo,
};

/// Exchange credentials for a token.
///
/// Does not touch the session; see [`crate::app::auth::AuthContext::login`].
#[tracing::instrument(skip(client, request), fields(email = %request.email))]
pub async fn login(client: &ApiClient, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
    tracing::info!("Attempting login");
    let response: AuthResponse = client
        .fetch(ApiRequest::post("/auth/login").json(request)?)
        .await?;
    tracing::info!(user_id = response.user.id, "Login successful");
    Ok(response)
}

#[tracing::instrument(skip(client, request), fields(email = %request.email))]
pub async fn register(client: &ApiClient, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
    client
        .fetch(ApiRequest::post("/auth/register").json(request)?)
        .await
}

/// The user the current token belongs to.
#[tracing::instrument(skip(client))]
pub async fn current_user(client: &ApiClient) -> Result<UserInfo, ApiError> {
    client.fetch(ApiRequest::get("/users/me")).await
}

#[tracing::instrument(skip(client))]
pub async fn forgot_password(client: &ApiClient, email: &str) -> Result<MessageResponse, ApiError> {
    let request = ForgotPasswordRequest {
        email: email.to_string(),
    };
    client
        .fetch(ApiRequest::post("/auth/forgot-password").json(&request)?)
        .await
}

#[tracing::instrument(skip(client, request))]
pub async fn reset_password(
    client: &ApiClient,
    request: &ResetPasswordRequest,
) -> Result<MessageResponse, ApiError> {
    client
        .fetch(ApiRequest::post("/auth/reset-password").json(request)?)
        .await
}
