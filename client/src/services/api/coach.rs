//! # AI Coach Endpoints
//!
//! Premium feature. A user on the free plan gets `Forbidden`.

use super::client::ApiClient;
use super::request::{path_segment, ApiRequest};
use crate::core::error::ApiError;
use shared::{ChatRequest, ChatResponse, CoachReport, SavingsRequest};

#[tracing::instrument(skip(client, message))]
pub async fn chat(client: &ApiClient, message: &str) -> Result<ChatResponse, ApiError> {
    let request = ChatRequest {
        message: message.to_string(),
    };
    client.fetch(ApiRequest::post("/ai-coach/chat").json(&request)?).await
}

#[tracing::instrument(skip(client))]
pub async fn weekly_summary(client: &ApiClient) -> Result<CoachReport, ApiError> {
    client.fetch(ApiRequest::get("/ai-coach/weekly-summary")).await
}

#[tracing::instrument(skip(client))]
pub async fn monthly_report(client: &ApiClient) -> Result<CoachReport, ApiError> {
    client.fetch(ApiRequest::get("/ai-coach/monthly-report")).await
}

#[tracing::instrument(skip(client))]
pub async fn analyze_category(client: &ApiClient, category: &str) -> Result<CoachReport, ApiError> {
    client
        .fetch(ApiRequest::get(format!("/ai-coach/analyze-category/{}", path_segment(category))))
        .await
}

#[tracing::instrument(skip(client))]
pub async fn savings_recommendations(client: &ApiClient, savings_goal: f64) -> Result<CoachReport, ApiError> {
    client
        .fetch(ApiRequest::post("/ai-coach/savings-recommendations").json(&SavingsRequest { savings_goal })?)
        .await
}
