use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A bank transaction synced through the aggregator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_name: Option<String>,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub pending: bool,
}

impl Transaction {
    /// Merchant name when known, otherwise the raw transaction name.
    pub fn display_name(&self) -> &str {
        self.merchant_name.as_deref().unwrap_or(&self.name)
    }
}

/// Outcome of a sync-from-bank run.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    #[serde(default)]
    pub added: u32,
    #[serde(default)]
    pub modified: u32,
    #[serde(default)]
    pub removed: u32,
    #[serde(default)]
    pub message: String,
}
