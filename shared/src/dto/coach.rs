use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsRequest {
    pub savings_goal: f64,
}

/// Free-form report text produced by the coach (weekly summary, monthly
/// report, category analysis, savings advice).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CoachReport {
    #[serde(default, alias = "summary", alias = "report", alias = "analysis")]
    pub response: String,
}
