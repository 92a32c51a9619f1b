use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Income/spending totals for one month.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    #[serde(default)]
    pub total_spending: f64,
    #[serde(default)]
    pub total_income: f64,
    #[serde(default)]
    pub net_cash_flow: f64,
    #[serde(default)]
    pub transaction_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<String>,
}

/// Daily spending keyed by `yyyy-MM-dd`.
pub type SpendingTrend = BTreeMap<String, f64>;

/// Spending per category over a date range.
pub type CategoryBreakdown = BTreeMap<String, f64>;

/// Spending per merchant over a date range.
pub type TopMerchants = BTreeMap<String, f64>;

/// Month-over-month comparison.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MonthComparison {
    #[serde(default)]
    pub current_month: MonthlySummary,
    #[serde(default)]
    pub previous_month: MonthlySummary,
    #[serde(default)]
    pub spending_change_percent: f64,
}

/// Entries sorted by descending amount, largest first.
pub fn ranked(amounts: &BTreeMap<String, f64>) -> Vec<(&str, f64)> {
    let mut entries: Vec<(&str, f64)> = amounts
        .iter()
        .map(|(name, amount)| (name.as_str(), amount.abs()))
        .collect();
    entries.sort_by(|a, b| b.1.total_cmp(&a.1));
    entries
}
