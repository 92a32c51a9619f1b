//! # Server-State Synchronization
//!
//! A query cache in front of the API client. Screens (or the CLI) describe
//! what they need with a [`QueryDescriptor`] and [`QueryClient::observe`] it;
//! changes go through [`QueryClient::mutate`] with a [`MutationDescriptor`]
//! that names the cached keys it makes stale.
//!
//! ```rust,no_run
//! use finance_client::query_key;
//! use finance_client::sync::{QueryClient, QueryDescriptor};
//! use std::time::Duration;
//!
//! # async fn demo() {
//! let cache = QueryClient::new();
//! let plans = QueryDescriptor::new(query_key!["subscriptionPlans"], || async { Ok(vec!["FREE"]) })
//!     .stale_time(Duration::from_secs(300));
//!
//! let mut observer = cache.observe(&plans);
//! let state = observer.settled().await;
//! assert_eq!(state.data.map(|d| d.len()), Some(1));
//! # }
//! ```

pub mod cache;
pub mod descriptor;
pub mod key;
pub mod observer;

pub use cache::QueryClient;
pub use descriptor::{FetchFuture, Invalidates, MutationDescriptor, QueryDescriptor, DEFAULT_CACHE_TIME};
pub use key::{KeyPart, QueryKey};
pub use observer::{QueryObserver, QueryState};
