//! Budget queries. Budget lists are never cached past their last observer:
//! spent amounts move with every synced transaction.

use super::{keys, mutation, query};
use crate::query_key;
use crate::services::api::{budgets as endpoints, ApiClient};
use crate::sync::{Invalidates, MutationDescriptor, QueryDescriptor};
use chrono::NaiveDate;
use lib_utils::format_day;
use shared::{
    Budget, BudgetAlert, BudgetProgress, BudgetRecommendations, BudgetRequest, BudgetSummary,
    CopyBudgetsResponse,
};
use std::sync::Arc;
use std::time::Duration;

const RECOMMENDATIONS_STALE_TIME: Duration = Duration::from_secs(5 * 60);

/// Key segment for a month, `"current"` when none is given.
fn month_segment(month: Option<NaiveDate>) -> String {
    month.map_or_else(|| "current".to_string(), format_day)
}

/// Budgets for `month`, or for the current month.
pub fn budgets(api: &Arc<ApiClient>, month: Option<NaiveDate>) -> QueryDescriptor<BudgetSummary> {
    query(api, query_key![keys::BUDGETS, month_segment(month)], move |api| async move {
        match month {
            Some(month) => endpoints::for_month(&api, month).await,
            None => endpoints::current(&api).await,
        }
    })
    .cache_time(Duration::ZERO)
}

pub fn progress(api: &Arc<ApiClient>, month: Option<NaiveDate>) -> QueryDescriptor<Vec<BudgetProgress>> {
    query(api, query_key![keys::BUDGET_PROGRESS, month.map(format_day)], move |api| async move {
        endpoints::progress(&api, month).await
    })
}

pub fn recommendations(api: &Arc<ApiClient>) -> QueryDescriptor<BudgetRecommendations> {
    query(api, query_key![keys::BUDGET_RECOMMENDATIONS], |api| async move {
        endpoints::recommendations(&api).await
    })
    .stale_time(RECOMMENDATIONS_STALE_TIME)
}

pub fn exceeded(api: &Arc<ApiClient>) -> QueryDescriptor<Vec<Budget>> {
    query(api, query_key![keys::BUDGETS, "exceeded"], |api| async move {
        endpoints::exceeded(&api).await
    })
}

pub fn alerts(api: &Arc<ApiClient>) -> QueryDescriptor<Vec<BudgetAlert>> {
    query(api, query_key![keys::BUDGETS, "alerts"], |api| async move {
        endpoints::alerts(&api).await
    })
}

/// Everything a budget change can affect.
pub fn budget_invalidation() -> Invalidates {
    Invalidates::prefixes([query_key![keys::BUDGETS], query_key![keys::BUDGET_PROGRESS]])
}

/// Create, or update by category and month.
pub fn save(api: &Arc<ApiClient>) -> MutationDescriptor<BudgetRequest, Budget> {
    mutation(api, "save_budget", |api, request: BudgetRequest| async move {
        endpoints::upsert(&api, &request).await
    })
    .invalidates(budget_invalidation())
}

pub fn delete(api: &Arc<ApiClient>) -> MutationDescriptor<i64, ()> {
    mutation(api, "delete_budget", |api, id: i64| async move {
        endpoints::delete(&api, id).await
    })
    .invalidates(budget_invalidation())
}

/// Recompute spent amounts for `month` (current month when `None`).
pub fn refresh(api: &Arc<ApiClient>) -> MutationDescriptor<Option<NaiveDate>, ()> {
    mutation(api, "refresh_budgets", |api, month: Option<NaiveDate>| async move {
        endpoints::refresh(&api, month).await
    })
    .invalidates(budget_invalidation())
}

pub fn copy_previous(api: &Arc<ApiClient>) -> MutationDescriptor<(), CopyBudgetsResponse> {
    mutation(api, "copy_previous_budgets", |api, ()| async move {
        endpoints::copy_previous(&api).await
    })
    .invalidates(budget_invalidation())
}
