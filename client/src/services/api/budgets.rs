//! # Budget Endpoints
//!
//! Budgets are keyed by category and month; `POST /budgets` creates or
//! updates. Months in paths and query strings are `YYYY-MM-DD` (first day).

use super::client::ApiClient;
use super::request::ApiRequest;
use crate::core::error::ApiError;
use chrono::NaiveDate;
use lib_utils::format_day;
use shared::{
    Budget, BudgetAlert, BudgetProgress, BudgetRecommendations, BudgetRequest, BudgetSummary,
    CopyBudgetsResponse,
};

/// Create a budget, or update the one with the same category and month.
#[tracing::instrument(skip(client, request), fields(category = %request.category, amount = request.amount))]
pub async fn upsert(client: &ApiClient, request: &BudgetRequest) -> Result<Budget, ApiError> {
    let budget: Budget = client.fetch(ApiRequest::post("/budgets").json(request)?).await?;
    tracing::info!(budget_id = budget.id, "Budget saved");
    Ok(budget)
}

#[tracing::instrument(skip(client))]
pub async fn current(client: &ApiClient) -> Result<BudgetSummary, ApiError> {
    client.fetch(ApiRequest::get("/budgets/current")).await
}

#[tracing::instrument(skip(client))]
pub async fn for_month(client: &ApiClient, month: NaiveDate) -> Result<BudgetSummary, ApiError> {
    client
        .fetch(ApiRequest::get(format!("/budgets/month/{}", format_day(month))))
        .await
}

#[tracing::instrument(skip(client))]
pub async fn progress(client: &ApiClient, month: Option<NaiveDate>) -> Result<Vec<BudgetProgress>, ApiError> {
    client
        .fetch(ApiRequest::get("/budgets/progress").query_opt("month", month.map(format_day)))
        .await
}

/// Suggested amount per category, from recent spending.
#[tracing::instrument(skip(client))]
pub async fn recommendations(client: &ApiClient) -> Result<BudgetRecommendations, ApiError> {
    client.fetch(ApiRequest::get("/budgets/recommendations")).await
}

#[tracing::instrument(skip(client))]
pub async fn exceeded(client: &ApiClient) -> Result<Vec<Budget>, ApiError> {
    client.fetch(ApiRequest::get("/budgets/exceeded")).await
}

#[tracing::instrument(skip(client))]
pub async fn alerts(client: &ApiClient) -> Result<Vec<BudgetAlert>, ApiError> {
    client.fetch(ApiRequest::get("/budgets/alerts")).await
}

/// Recompute spent amounts from transactions.
#[tracing::instrument(skip(client))]
pub async fn refresh(client: &ApiClient, month: Option<NaiveDate>) -> Result<(), ApiError> {
    client
        .execute(ApiRequest::post("/budgets/refresh").query_opt("month", month.map(format_day)))
        .await
}

/// Copy last month's budgets into the current month.
#[tracing::instrument(skip(client))]
pub async fn copy_previous(client: &ApiClient) -> Result<CopyBudgetsResponse, ApiError> {
    client.fetch(ApiRequest::post("/budgets/copy-previous")).await
}

#[tracing::instrument(skip(client))]
pub async fn delete(client: &ApiClient, id: i64) -> Result<(), ApiError> {
    client.execute(ApiRequest::delete(format!("/budgets/{}", id))).await?;
    tracing::info!(budget_id = id, "Budget deleted");
    Ok(())
}
