//! # Backend API Client Module
//!
//! Resilient HTTP access to the finance backend.
//!
//! ## Module Structure
//!
//! ```text
//! api/
//! ├── client.rs        - ApiClient: bearer auth, timeout, retry, 401 handling
//! ├── request.rs       - ApiRequest / ApiResponse / transport-level types
//! ├── retry.rs         - Retry predicate, backoff schedule, Sleeper
//! ├── session.rs       - SessionManager and token stores
//! ├── transport.rs     - reqwest Transport
//! ├── auth.rs          - /auth, /users
//! ├── transactions.rs  - /transactions
//! ├── analytics.rs     - /analytics
//! ├── budgets.rs       - /budgets
//! ├── subscriptions.rs - /subscriptions
//! ├── plaid.rs         - /plaid
//! └── coach.rs         - /ai-coach
//! ```
//!
//! Endpoint functions take `&ApiClient` and return `Result<T, ApiError>`.
//! They are the `fetch`/`execute` halves of the descriptors in
//! [`crate::queries`].

pub mod analytics;
pub mod auth;
pub mod budgets;
pub mod client;
pub mod coach;
pub mod plaid;
pub mod request;
pub mod retry;
pub mod session;
pub mod subscriptions;
pub mod transactions;
pub mod transport;

pub use client::{ApiClient, ApiClientBuilder};
pub use request::{ApiRequest, ApiResponse, Envelope, Method, RawResponse, TransportError};
pub use retry::{RecordingSleeper, RetryPolicy, Sleeper, TokioSleeper};
pub use session::{
    FileSessionStore, MemorySessionStore, NoopNavigator, RecordingNavigator, Session, SessionManager,
};
pub use transport::ReqwestTransport;
