//! # Bank Link Endpoints
//!
//! Linking a bank is a two-step exchange: the backend issues a link token,
//! the bank widget returns a public token, and the backend trades that for
//! long-lived access.

use super::client::ApiClient;
use super::request::ApiRequest;
use crate::core::error::ApiError;
use shared::{ExchangeTokenRequest, LinkTokenResponse, LinkedAccount};

#[tracing::instrument(skip(client))]
pub async fn create_link_token(client: &ApiClient) -> Result<LinkTokenResponse, ApiError> {
    client.fetch(ApiRequest::post("/plaid/create-link-token")).await
}

#[tracing::instrument(skip(client, public_token))]
pub async fn exchange_token(client: &ApiClient, public_token: &str) -> Result<(), ApiError> {
    let request = ExchangeTokenRequest {
        public_token: public_token.to_string(),
    };
    client
        .execute(ApiRequest::post("/plaid/exchange-token").json(&request)?)
        .await
}

#[tracing::instrument(skip(client))]
pub async fn accounts(client: &ApiClient) -> Result<Vec<LinkedAccount>, ApiError> {
    client.fetch(ApiRequest::get("/plaid/accounts")).await
}
