use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Create-or-update request. The backend upserts by `(category, month)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    pub category: String,
    pub amount: f64,
    pub month: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_threshold: Option<f64>,
}

/// A budget with its computed spending for the month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub remaining: f64,
    #[serde(default)]
    pub percentage_spent: f64,
    #[serde(default)]
    pub is_exceeded: bool,
    #[serde(default)]
    pub should_alert: bool,
    pub month: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Overall health of a month's budgets.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    #[default]
    OnTrack,
    Warning,
    Exceeded,
    #[serde(other)]
    Unknown,
}

/// Budgets for one month with aggregate totals.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetSummary {
    #[serde(default)]
    pub budgets: Vec<Budget>,
    #[serde(default)]
    pub total_budget: f64,
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub total_remaining: f64,
    #[serde(default)]
    pub percentage_spent: f64,
    #[serde(default)]
    pub status: BudgetStatus,
    #[serde(default)]
    pub exceeded_count: u32,
    #[serde(default)]
    pub alert_count: u32,
}

impl BudgetSummary {
    /// Whether a budget for `category` exists in this summary.
    pub fn contains_category(&self, category: &str) -> bool {
        self.budgets.iter().any(|b| b.category == category)
    }
}

/// Per-category progress for a month.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetProgress {
    pub category: String,
    pub amount: f64,
    #[serde(default)]
    pub spent: f64,
    #[serde(default)]
    pub percentage_spent: f64,
    #[serde(default)]
    pub is_exceeded: bool,
}

/// Suggested budget amount per category, derived from past spending.
pub type BudgetRecommendations = BTreeMap<String, f64>;

/// A budget that crossed its alert threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BudgetAlert {
    pub category: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub percentage_spent: f64,
    #[serde(default)]
    pub is_exceeded: bool,
}

/// Result of copying last month's budgets forward.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CopyBudgetsResponse {
    #[serde(default)]
    pub copied_count: u32,
    #[serde(default)]
    pub budgets: Vec<Budget>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_summary_decodes() {
        let summary: BudgetSummary =
            serde_json::from_str(r#"{"budgets": [], "totalBudget": 0, "status": "on_track"}"#)
                .unwrap();
        assert!(summary.budgets.is_empty());
        assert_eq!(summary.total_budget, 0.0);
        assert_eq!(summary.status, BudgetStatus::OnTrack);
    }

    #[test]
    fn test_unknown_status_does_not_fail() {
        let summary: BudgetSummary =
            serde_json::from_str(r#"{"budgets": [], "status": "frozen"}"#).unwrap();
        assert_eq!(summary.status, BudgetStatus::Unknown);
    }

    #[test]
    fn test_budget_request_wire_shape() {
        let req = BudgetRequest {
            category: "Food & Dining".to_string(),
            amount: 500.0,
            month: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            notes: None,
            alert_threshold: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["month"], "2025-01-01");
        assert_eq!(json["category"], "Food & Dining");
        assert!(json.get("notes").is_none());
    }
}
