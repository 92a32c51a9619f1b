//! # Shared Data Transfer Objects Library
//!
//! This library defines the contract between the finance client and the backend API.
//! All DTOs use JSON serialization via `serde` for API communication.
//!
//! ## Structure
//!
//! - **[`dto`]**: Data Transfer Objects for API communication
//!   - **[`dto::auth`]**: Login, registration, password reset, current user
//!   - **[`dto::budget`]**: Budgets, monthly summaries, progress, recommendations, alerts
//!   - **[`dto::transaction`]**: Bank transactions and sync results
//!   - **[`dto::analytics`]**: Monthly summary, spending trend, category and merchant breakdowns
//!   - **[`dto::subscription`]**: Plans, current subscription, feature access, checkout
//!   - **[`dto::plaid`]**: Bank-link tokens and linked accounts
//!   - **[`dto::coach`]**: AI coach chat exchange
//! - **[`utils`]**: Display helpers for amounts and percentages
//!
//! ## Wire Format
//!
//! The backend speaks **camelCase** JSON, so every struct carries
//! `#[serde(rename_all = "camelCase")]`. Optional fields are omitted when `None`.
//! Aggregates the backend sometimes trims (summary totals, counters) default to
//! zero when absent, so a minimal `{"budgets": []}` still decodes.
//!
//! ## Usage
//!
//! ```rust
//! use shared::dto::budget::BudgetSummary;
//!
//! let summary: BudgetSummary =
//!     serde_json::from_str(r#"{"budgets": [], "totalBudget": 0}"#).unwrap();
//! assert!(summary.budgets.is_empty());
//! ```

pub mod dto;
pub mod utils;

// Re-export commonly used types for convenience
// Note: Wildcard re-exports are used here since shared is a DTO library
// where all exports are meant to be public API
pub use dto::*;
pub use utils::*;
