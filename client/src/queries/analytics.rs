//! Spending analytics queries, keyed by their date range.

use super::{keys, query};
use crate::query_key;
use crate::services::api::{analytics as endpoints, ApiClient};
use crate::sync::QueryDescriptor;
use lib_utils::DateRange;
use shared::{CategoryBreakdown, MonthComparison, MonthlySummary, SpendingTrend, TopMerchants};
use std::sync::Arc;

pub fn monthly_summary(api: &Arc<ApiClient>, month: Option<String>) -> QueryDescriptor<MonthlySummary> {
    query(api, query_key![keys::MONTHLY_SUMMARY, month.clone()], move |api| {
        let month = month.clone();
        async move { endpoints::monthly_summary(&api, month.as_deref()).await }
    })
}

pub fn spending_trend(api: &Arc<ApiClient>, range: DateRange) -> QueryDescriptor<SpendingTrend> {
    query(
        api,
        query_key![keys::SPENDING_TREND, range.start_param(), range.end_param()],
        move |api| async move { endpoints::spending_trend(&api, &range).await },
    )
}

pub fn category_breakdown(api: &Arc<ApiClient>, range: DateRange) -> QueryDescriptor<CategoryBreakdown> {
    query(
        api,
        query_key![keys::CATEGORY_BREAKDOWN, range.start_param(), range.end_param()],
        move |api| async move { endpoints::category_breakdown(&api, &range).await },
    )
}

pub fn top_merchants(api: &Arc<ApiClient>, range: DateRange, limit: u32) -> QueryDescriptor<TopMerchants> {
    query(
        api,
        query_key![keys::TOP_MERCHANTS, range.start_param(), range.end_param(), limit],
        move |api| async move { endpoints::top_merchants(&api, &range, limit).await },
    )
}

pub fn month_comparison(api: &Arc<ApiClient>) -> QueryDescriptor<MonthComparison> {
    query(api, query_key![keys::MONTH_COMPARISON], |api| async move {
        endpoints::compare_months(&api).await
    })
}
