//! # Analytics Endpoints
//!
//! Spending aggregates computed by the backend. Range endpoints take
//! `startDate`/`endDate` as `YYYY-MM-DD`.

use super::client::ApiClient;
use super::request::ApiRequest;
use crate::core::error::ApiError;
use lib_utils::DateRange;
use shared::{CategoryBreakdown, MonthComparison, MonthlySummary, SpendingTrend, TopMerchants};

fn ranged(path: &str, range: &DateRange) -> ApiRequest {
    ApiRequest::get(path)
        .query("startDate", range.start_param())
        .query("endDate", range.end_param())
}

/// `month` is `YYYY-MM`; the backend defaults to the current month.
#[tracing::instrument(skip(client))]
pub async fn monthly_summary(client: &ApiClient, month: Option<&str>) -> Result<MonthlySummary, ApiError> {
    client
        .fetch(ApiRequest::get("/analytics/monthly-summary").query_opt("month", month))
        .await
}

#[tracing::instrument(skip(client))]
pub async fn spending_trend(client: &ApiClient, range: &DateRange) -> Result<SpendingTrend, ApiError> {
    client.fetch(ranged("/analytics/spending-trend", range)).await
}

#[tracing::instrument(skip(client))]
pub async fn category_breakdown(client: &ApiClient, range: &DateRange) -> Result<CategoryBreakdown, ApiError> {
    client.fetch(ranged("/analytics/spending-by-category", range)).await
}

#[tracing::instrument(skip(client))]
pub async fn top_merchants(client: &ApiClient, range: &DateRange, limit: u32) -> Result<TopMerchants, ApiError> {
    client
        .fetch(ranged("/analytics/top-merchants", range).query("limit", limit))
        .await
}

/// Current month against the previous one.
#[tracing::instrument(skip(client))]
pub async fn compare_months(client: &ApiClient) -> Result<MonthComparison, ApiError> {
    client.fetch(ApiRequest::get("/analytics/compare-months")).await
}
