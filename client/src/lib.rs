//! # Finance Tracker Client - Library Root
//!
//! Client core for the personal finance tracker backend: a resilient HTTP
//! client and a server-state cache that keeps every screen consistent with
//! the backend after each change.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  app        AuthContext, Dashboard                       │
//! ├──────────────────────────────────────────────────────────┤
//! │  queries    descriptors, cache keys, invalidation edges  │
//! ├──────────────────────────────────────────────────────────┤
//! │  sync       QueryClient, QueryObserver                   │
//! ├──────────────────────────────────────────────────────────┤
//! │  services   ApiClient (retry, timeout, session, 401)     │
//! │             typed endpoints per backend area             │
//! └──────────────────────────────────────────────────────────┘
//!          │ HTTP/JSON (camelCase), Bearer token
//!          ▼
//! ┌──────────────────────────┐
//! │  Finance backend (/api)  │
//! └──────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - **app**: session lifecycle and the dashboard aggregate
//! - **config**: [`ClientConfig`] from environment variables
//! - **core**: error types and the injection seams
//!   ([`Transport`](core::Transport), [`SessionStore`](core::SessionStore),
//!   [`Navigator`](core::Navigator))
//! - **debug**: `tracing` subscriber setup
//! - **queries**: one descriptor per backend resource
//! - **services**: `api` (client, retry, session, endpoints)
//! - **sync**: the query cache
//!
//! ## Usage
//!
//! ```rust,no_run
//! use finance_client::{queries, ApiClient, ClientConfig, QueryClient, SessionManager};
//! use std::sync::Arc;
//!
//! # async fn demo() -> finance_client::Result<()> {
//! let config = ClientConfig::load()?;
//! let api = Arc::new(ApiClient::new(&config, Arc::new(SessionManager::in_memory())));
//! let cache = QueryClient::new();
//!
//! let mut budgets = cache.observe(&queries::budgets::budgets(&api, None));
//! let state = budgets.settled().await;
//! println!("{} budgets", state.data.map_or(0, |s| s.budgets.len()));
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test -p finance-client --lib
//! cargo test -p finance-client --test transport
//! ```

pub mod app;
pub mod config;
pub mod core;
pub mod debug;
pub mod queries;
pub mod services;
pub mod sync;

#[cfg(test)]
mod testing;

pub use app::{AuthContext, Dashboard, DashboardSnapshot};
pub use config::ClientConfig;
pub use core::{ApiError, AppError, ErrorKind, Result};
pub use services::api::{ApiClient, SessionManager};
pub use sync::{QueryClient, QueryKey, QueryObserver, QueryState};
