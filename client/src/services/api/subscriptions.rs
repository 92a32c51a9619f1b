//! # Subscription Endpoints

use super::client::ApiClient;
use super::request::{path_segment, ApiRequest};
use crate::core::error::ApiError;
use shared::{CheckoutRequest, CheckoutSession, FeatureAccess, Subscription, SubscriptionPlan};

#[tracing::instrument(skip(client))]
pub async fn plans(client: &ApiClient) -> Result<Vec<SubscriptionPlan>, ApiError> {
    client.fetch(ApiRequest::get("/subscriptions/plans")).await
}

#[tracing::instrument(skip(client))]
pub async fn current(client: &ApiClient) -> Result<Subscription, ApiError> {
    client.fetch(ApiRequest::get("/subscriptions/current")).await
}

#[tracing::instrument(skip(client))]
pub async fn feature_access(client: &ApiClient, feature: &str) -> Result<FeatureAccess, ApiError> {
    client
        .fetch(ApiRequest::get(format!("/subscriptions/features/{}", path_segment(feature))))
        .await
}

/// Start a hosted checkout; the caller opens the returned URL.
#[tracing::instrument(skip(client, request), fields(plan_id = request.plan_id))]
pub async fn checkout(client: &ApiClient, request: &CheckoutRequest) -> Result<CheckoutSession, ApiError> {
    client
        .fetch(ApiRequest::post("/subscriptions/checkout").json(request)?)
        .await
}

#[tracing::instrument(skip(client))]
pub async fn cancel(client: &ApiClient) -> Result<(), ApiError> {
    client.execute(ApiRequest::post("/subscriptions/cancel")).await?;
    tracing::info!("Subscription cancelled");
    Ok(())
}
