//! # Core Abstractions
//!
//! Error types and the dependency-injection traits the rest of the crate is
//! assembled from.
//!
//! - **[`error`]**: [`ApiError`] (terminal outcome of a backend call) and
//!   [`AppError`] (application failures), plus `Result<T>`
//! - **[`service`]**: [`Transport`], [`SessionStore`], [`Navigator`]
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use finance_client::core::service::Transport;
//! use finance_client::services::api::ReqwestTransport;
//!
//! // In production: reqwest on the wire
//! let transport: Arc<dyn Transport> =
//!     Arc::new(ReqwestTransport::new("http://localhost:8080/api", std::time::Duration::from_secs(30)));
//! ```

pub mod error;
pub mod service;

pub use error::{ApiError, AppError, ErrorKind, Result};
pub use service::{Navigator, SessionStore, Transport};
