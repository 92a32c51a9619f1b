//! Typed handle on one cache entry.

use super::cache::{EntrySnapshot, QueryClient};
use super::key::QueryKey;
use crate::core::error::ApiError;
use std::any::type_name;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::watch;

/// Point-in-time view of a query.
pub struct QueryState<T> {
    /// Last successful result. Survives later failures.
    pub data: Option<Arc<T>>,
    /// Error of the most recent fetch, cleared by the next success.
    pub error: Option<ApiError>,
    /// No data yet and a fetch is running.
    pub is_loading: bool,
    /// A fetch is running, initial or background.
    pub is_fetching: bool,
}

impl<T> Clone for QueryState<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            error: self.error.clone(),
            is_loading: self.is_loading,
            is_fetching: self.is_fetching,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for QueryState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryState")
            .field("data", &self.data)
            .field("error", &self.error)
            .field("is_loading", &self.is_loading)
            .field("is_fetching", &self.is_fetching)
            .finish()
    }
}

impl<T> QueryState<T> {
    /// The outcome of the latest fetch: its error if it failed, else the data.
    pub fn into_result(self) -> Result<Arc<T>, ApiError> {
        match (self.error, self.data) {
            (Some(e), _) => Err(e),
            (None, Some(data)) => Ok(data),
            (None, None) => Err(ApiError::NotFound("query has no data".to_string())),
        }
    }

    pub fn is_success(&self) -> bool {
        self.data.is_some() && self.error.is_none()
    }
}

/// Subscription to one query. Dropping it detaches from the entry.
pub struct QueryObserver<T> {
    client: QueryClient,
    key: QueryKey,
    entry_id: u64,
    rx: watch::Receiver<EntrySnapshot>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> QueryObserver<T> {
    pub(crate) fn new(
        client: QueryClient,
        key: QueryKey,
        entry_id: u64,
        rx: watch::Receiver<EntrySnapshot>,
    ) -> Self {
        Self {
            client,
            key,
            entry_id,
            rx,
            _marker: PhantomData,
        }
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn state(&self) -> QueryState<T> {
        let snapshot = self.rx.borrow();
        let (data, mismatch) = match snapshot.data.clone().map(|d| d.downcast::<T>()) {
            Some(Ok(data)) => (Some(data), None),
            Some(Err(_)) => (None, Some(self.type_mismatch())),
            None => (None, None),
        };
        QueryState {
            is_loading: data.is_none() && snapshot.is_fetching,
            is_fetching: snapshot.is_fetching,
            error: mismatch.or_else(|| snapshot.error.clone()),
            data,
        }
    }

    pub fn data(&self) -> Option<Arc<T>> {
        self.state().data
    }

    pub fn error(&self) -> Option<ApiError> {
        self.state().error
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading
    }

    pub fn is_fetching(&self) -> bool {
        self.rx.borrow().is_fetching
    }

    /// Fetch now, or join the fetch already running, and return its outcome.
    pub async fn refetch(&self) -> Result<Arc<T>, ApiError> {
        match self.client.refetch(&self.key, self.entry_id).await {
            Some(Ok(data)) => data.downcast::<T>().map_err(|_| self.type_mismatch()),
            Some(Err(e)) => Err(e),
            None => Err(ApiError::NotFound(format!("cache entry {} was reset", self.key))),
        }
    }

    /// Wait until no fetch is running, then return the state.
    pub async fn settled(&mut self) -> QueryState<T> {
        // An error here means the entry was reset; the last snapshot stands.
        let _ = self.rx.wait_for(|s| !s.is_fetching).await;
        self.state()
    }

    /// Wait for the next state change. `None` once the entry is gone.
    pub async fn changed(&mut self) -> Option<QueryState<T>> {
        self.rx.changed().await.ok()?;
        Some(self.state())
    }

    fn type_mismatch(&self) -> ApiError {
        ApiError::Decode(format!(
            "cached value for {} is not a {}",
            self.key,
            type_name::<T>()
        ))
    }
}

impl<T> Drop for QueryObserver<T> {
    fn drop(&mut self) {
        self.client.detach(&self.key, self.entry_id);
    }
}

impl<T> fmt::Debug for QueryObserver<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryObserver")
            .field("key", &self.key)
            .field("entry_id", &self.entry_id)
            .finish()
    }
}
