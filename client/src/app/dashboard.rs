//! # Dashboard
//!
//! The analytics overview: this month's summary plus spending trend,
//! category breakdown and top merchants over a trailing window. Each piece
//! is its own query, so the dashboard shares entries with any other screen
//! that observes the same keys.

use crate::core::error::{ApiError, ErrorKind};
use crate::queries::analytics;
use crate::services::api::ApiClient;
use crate::sync::{QueryClient, QueryObserver};
use lib_utils::{date_range_ending, today, DateRange};
use shared::{CategoryBreakdown, MonthlySummary, SpendingTrend, TopMerchants};
use std::sync::Arc;

/// Days covered by the trend, breakdown and merchant panels.
pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Merchants listed on the dashboard.
pub const TOP_MERCHANT_LIMIT: u32 = 5;

/// What the dashboard renders at one point in time.
#[derive(Debug, Clone)]
pub struct DashboardSnapshot {
    pub range: DateRange,
    pub summary: Option<Arc<MonthlySummary>>,
    pub trend: Option<Arc<SpendingTrend>>,
    pub categories: Option<Arc<CategoryBreakdown>>,
    pub merchants: Option<Arc<TopMerchants>>,
    /// Any panel still waiting for its first data.
    pub is_loading: bool,
    /// First failing panel's error, in panel order.
    pub error: Option<ApiError>,
}

impl DashboardSnapshot {
    /// Which banner to show, if any.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(ApiError::kind)
    }
}

pub struct Dashboard {
    range: DateRange,
    summary: QueryObserver<MonthlySummary>,
    trend: QueryObserver<SpendingTrend>,
    categories: QueryObserver<CategoryBreakdown>,
    merchants: QueryObserver<TopMerchants>,
}

impl Dashboard {
    /// Observe the last [`DEFAULT_WINDOW_DAYS`] days ending today.
    pub fn observe(cache: &QueryClient, api: &Arc<ApiClient>) -> Self {
        Self::observe_range(cache, api, date_range_ending(today(), DEFAULT_WINDOW_DAYS))
    }

    pub fn observe_range(cache: &QueryClient, api: &Arc<ApiClient>, range: DateRange) -> Self {
        Self {
            summary: cache.observe(&analytics::monthly_summary(api, None)),
            trend: cache.observe(&analytics::spending_trend(api, range)),
            categories: cache.observe(&analytics::category_breakdown(api, range)),
            merchants: cache.observe(&analytics::top_merchants(api, range, TOP_MERCHANT_LIMIT)),
            range,
        }
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        let summary = self.summary.state();
        let trend = self.trend.state();
        let categories = self.categories.state();
        let merchants = self.merchants.state();

        DashboardSnapshot {
            range: self.range,
            is_loading: summary.is_loading
                || trend.is_loading
                || categories.is_loading
                || merchants.is_loading,
            error: summary
                .error
                .or(trend.error)
                .or(categories.error)
                .or(merchants.error),
            summary: summary.data,
            trend: trend.data,
            categories: categories.data,
            merchants: merchants.data,
        }
    }

    /// Wait until every panel has settled.
    pub async fn settled(&mut self) -> DashboardSnapshot {
        self.summary.settled().await;
        self.trend.settled().await;
        self.categories.settled().await;
        self.merchants.settled().await;
        self.snapshot()
    }

    /// The retry button: refetch every panel concurrently.
    pub async fn refetch(&self) -> DashboardSnapshot {
        // Failures land in the panels' state.
        let _ = futures::join!(
            self.summary.refetch(),
            self.trend.refetch(),
            self.categories.refetch(),
            self.merchants.refetch(),
        );
        self.snapshot()
    }
}
