//! # Queries and Mutations
//!
//! One [`QueryDescriptor`] constructor per backend resource and one
//! [`MutationDescriptor`] per server-side change, with the cache keys,
//! staleness policy and invalidation edges the screens rely on.
//!
//! | Mutation | Invalidates |
//! |---|---|
//! | save / delete / refresh / copy budgets | `budgets`, `budgetProgress` |
//! | cancel subscription | `currentSubscription` |
//! | sync transactions | everything |
//! | exchange bank token | `linkedAccounts`, `transactions` |
//! | checkout, link token, coach requests | nothing |

use crate::core::error::ApiError;
use crate::services::api::ApiClient;
use crate::sync::{MutationDescriptor, QueryDescriptor, QueryKey};
use std::future::Future;
use std::sync::Arc;

pub mod account;
pub mod analytics;
pub mod budgets;
pub mod coach;
pub mod subscriptions;
pub mod transactions;


/// Root segments of every cache key.
pub mod keys {
    pub const BUDGETS: &str = "budgets";
    pub const BUDGET_PROGRESS: &str = "budgetProgress";
    pub const BUDGET_RECOMMENDATIONS: &str = "budgetRecommendations";
    pub const SUBSCRIPTION_PLANS: &str = "subscriptionPlans";
    pub const CURRENT_SUBSCRIPTION: &str = "currentSubscription";
    pub const FEATURE_ACCESS: &str = "featureAccess";
    pub const TRANSACTIONS: &str = "transactions";
    pub const MONTHLY_SUMMARY: &str = "monthlySummary";
    pub const SPENDING_TREND: &str = "spendingTrend";
    pub const CATEGORY_BREAKDOWN: &str = "categoryBreakdown";
    pub const TOP_MERCHANTS: &str = "topMerchants";
    pub const MONTH_COMPARISON: &str = "monthComparison";
    pub const LINKED_ACCOUNTS: &str = "linkedAccounts";
    pub const CURRENT_USER: &str = "currentUser";
    pub const WEEKLY_SUMMARY: &str = "weeklySummary";
    pub const MONTHLY_REPORT: &str = "monthlyReport";
    pub const CATEGORY_ANALYSIS: &str = "categoryAnalysis";
}

/// Query whose fetch gets its own handle on the API client.
fn query<T, F, Fut>(api: &Arc<ApiClient>, key: QueryKey, fetch: F) -> QueryDescriptor<T>
where
    T: Send + 'static,
    F: Fn(Arc<ApiClient>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
{
    let api = api.clone();
    QueryDescriptor::new(key, move || fetch(api.clone()))
}

fn mutation<I, O, F, Fut>(api: &Arc<ApiClient>, name: &'static str, execute: F) -> MutationDescriptor<I, O>
where
    I: Send + 'static,
    O: Send + 'static,
    F: Fn(Arc<ApiClient>, I) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<O, ApiError>> + Send + 'static,
{
    let api = api.clone();
    MutationDescriptor::new(name, move |input| execute(api.clone(), input))
}
