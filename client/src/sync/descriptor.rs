//! Query and mutation descriptors.
//!
//! A [`QueryDescriptor`] says how to fetch one resource and how long its
//! cached value stays good; a [`MutationDescriptor`] says how to change
//! server state and which cached resources that change makes stale.

use super::key::QueryKey;
use crate::core::error::ApiError;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// How long an unobserved entry is kept when the descriptor does not say.
pub const DEFAULT_CACHE_TIME: Duration = Duration::from_secs(5 * 60);

pub type FetchFuture<T> = BoxFuture<'static, Result<T, ApiError>>;

type Fetcher<T> = Arc<dyn Fn() -> FetchFuture<T> + Send + Sync>;
type Executor<I, O> = Arc<dyn Fn(I) -> FetchFuture<O> + Send + Sync>;

/// Fetch contract and cache policy for one resource.
pub struct QueryDescriptor<T> {
    key: QueryKey,
    fetch: Fetcher<T>,
    stale_time: Duration,
    cache_time: Duration,
    enabled: bool,
}

impl<T> Clone for QueryDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            fetch: self.fetch.clone(),
            stale_time: self.stale_time,
            cache_time: self.cache_time,
            enabled: self.enabled,
        }
    }
}

impl<T> fmt::Debug for QueryDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryDescriptor")
            .field("key", &self.key)
            .field("stale_time", &self.stale_time)
            .field("cache_time", &self.cache_time)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl<T: Send + 'static> QueryDescriptor<T> {
    /// Always stale, kept for [`DEFAULT_CACHE_TIME`] once unobserved.
    pub fn new<F, Fut>(key: QueryKey, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ApiError>> + Send + 'static,
    {
        Self {
            key,
            fetch: Arc::new(move || fetch().boxed()),
            stale_time: Duration::ZERO,
            cache_time: DEFAULT_CACHE_TIME,
            enabled: true,
        }
    }

    pub fn stale_time(mut self, stale_time: Duration) -> Self {
        self.stale_time = stale_time;
        self
    }

    pub fn cache_time(mut self, cache_time: Duration) -> Self {
        self.cache_time = cache_time;
        self
    }

    /// A disabled query serves whatever is cached and never fetches on observation.
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn key(&self) -> &QueryKey {
        &self.key
    }

    pub fn get_stale_time(&self) -> Duration {
        self.stale_time
    }

    pub fn get_cache_time(&self) -> Duration {
        self.cache_time
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Run the fetch once, outside any cache.
    pub fn fetch(&self) -> FetchFuture<T> {
        (self.fetch)()
    }
}

/// Cached queries a successful mutation makes stale.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Invalidates {
    #[default]
    Nothing,
    Prefixes(Vec<QueryKey>),
    Everything,
}

impl Invalidates {
    pub fn prefixes(prefixes: impl IntoIterator<Item = QueryKey>) -> Self {
        Invalidates::Prefixes(prefixes.into_iter().collect())
    }

    pub fn matches(&self, key: &QueryKey) -> bool {
        match self {
            Invalidates::Nothing => false,
            Invalidates::Prefixes(prefixes) => prefixes.iter().any(|p| key.starts_with(p)),
            Invalidates::Everything => true,
        }
    }
}

/// A server-side change and the cache entries it invalidates.
pub struct MutationDescriptor<I, O> {
    name: &'static str,
    execute: Executor<I, O>,
    invalidates: Invalidates,
}

impl<I, O> Clone for MutationDescriptor<I, O> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            execute: self.execute.clone(),
            invalidates: self.invalidates.clone(),
        }
    }
}

impl<I, O> fmt::Debug for MutationDescriptor<I, O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MutationDescriptor")
            .field("name", &self.name)
            .field("invalidates", &self.invalidates)
            .finish()
    }
}

impl<I: Send + 'static, O: Send + 'static> MutationDescriptor<I, O> {
    pub fn new<F, Fut>(name: &'static str, execute: F) -> Self
    where
        F: Fn(I) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<O, ApiError>> + Send + 'static,
    {
        Self {
            name,
            execute: Arc::new(move |input| execute(input).boxed()),
            invalidates: Invalidates::Nothing,
        }
    }

    pub fn invalidates(mut self, invalidates: Invalidates) -> Self {
        self.invalidates = invalidates;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn invalidation(&self) -> &Invalidates {
        &self.invalidates
    }

    pub(crate) fn execute(&self, input: I) -> FetchFuture<O> {
        (self.execute)(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query_key;

    #[test]
    fn test_invalidation_matching() {
        let budgets = Invalidates::prefixes([query_key!["budgets"], query_key!["budgetProgress"]]);
        assert!(budgets.matches(&query_key!["budgets", "current"]));
        assert!(budgets.matches(&query_key!["budgets", "exceeded"]));
        assert!(budgets.matches(&query_key!["budgetProgress", None::<String>]));
        assert!(!budgets.matches(&query_key!["budgetRecommendations"]));

        assert!(Invalidates::Everything.matches(&query_key!["transactions"]));
        assert!(!Invalidates::Nothing.matches(&query_key!["transactions"]));
    }

    #[tokio::test]
    async fn test_descriptor_defaults() {
        let query = QueryDescriptor::new(query_key!["transactions"], || async { Ok(3u32) });
        assert_eq!(query.get_stale_time(), Duration::ZERO);
        assert_eq!(query.get_cache_time(), DEFAULT_CACHE_TIME);
        assert!(query.is_enabled());
        assert_eq!(query.fetch().await, Ok(3));
    }
}
