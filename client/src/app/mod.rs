//! # Application Layer
//!
//! What a screen needs beyond raw queries:
//!
//! - **[`auth`]**: the session lifecycle (boot validation, login, register,
//!   logout, password reset) with input validation
//! - **[`dashboard`]**: the analytics dashboard as one aggregate view over
//!   four queries

pub mod auth;
pub mod dashboard;

pub use auth::AuthContext;
pub use dashboard::{Dashboard, DashboardSnapshot};
