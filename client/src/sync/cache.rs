//! # Query Cache
//!
//! Keyed registry of server state shared by every observer in the process.
//!
//! ## Entry lifecycle
//!
//! ```text
//! observe (new key) ──▶ entry created ──▶ fetch ──▶ fresh ──stale_time──▶ stale
//!                                           ▲                              │
//!                                           └──── observe / invalidate ────┘
//! last observer detached ──cache_time──▶ evicted (immediately when cache_time = 0)
//! ```
//!
//! ## Guarantees
//!
//! - At most one fetch in flight per key. Later observers and `refetch`
//!   callers attach to it.
//! - Invalidation supersedes a fetch that was already running: that fetch may
//!   have read the server before the write, so a new one is started and the
//!   old result is dropped. Only a fetch started after the latest
//!   invalidation marks the entry fresh.
//! - A failed fetch records the error and keeps the previous data.
//! - A result arriving for an entry that was evicted (or reset) meanwhile is
//!   dropped.
//!
//! Entry state is published through a `tokio::sync::watch` channel per entry,
//! so observers read the latest snapshot without locking the registry.

use super::descriptor::{Invalidates, MutationDescriptor, QueryDescriptor};
use super::key::QueryKey;
use super::observer::QueryObserver;
use crate::core::error::ApiError;
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::AbortHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

pub(crate) type Erased = Arc<dyn Any + Send + Sync>;
type ErasedResult = Result<Erased, ApiError>;
type SharedFetch = Shared<BoxFuture<'static, ErasedResult>>;
type ErasedFetcher = Arc<dyn Fn() -> BoxFuture<'static, ErasedResult> + Send + Sync>;

/// What observers of one entry see.
#[derive(Clone, Default)]
pub(crate) struct EntrySnapshot {
    pub data: Option<Erased>,
    pub error: Option<ApiError>,
    pub is_fetching: bool,
}

/// A running fetch and the invalidation generation it started under.
struct InFlight {
    id: u64,
    generation: u64,
    fetch: SharedFetch,
    task: AbortHandle,
}

struct Entry {
    /// Distinguishes this entry from a later one under the same key.
    id: u64,
    tx: watch::Sender<EntrySnapshot>,
    fetcher: ErasedFetcher,
    observers: usize,
    in_flight: Option<InFlight>,
    updated_at: Option<Instant>,
    invalidated: bool,
    /// Bumped on every invalidation.
    generation: u64,
    stale_time: Duration,
    cache_time: Duration,
    enabled: bool,
    /// Bumped on every attach/detach; a pending eviction only fires if unchanged.
    epoch: u64,
}

impl Entry {
    fn is_stale(&self, now: Instant) -> bool {
        self.invalidated
            || self
                .updated_at
                .map_or(true, |at| now.duration_since(at) >= self.stale_time)
    }

    /// The in-flight fetch, unless an invalidation has happened since it started.
    fn current_fetch(&self) -> Option<SharedFetch> {
        self.in_flight
            .as_ref()
            .filter(|f| f.generation == self.generation)
            .map(|f| f.fetch.clone())
    }
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    next_id: AtomicU64,
}

/// Process-wide query cache. Cheap to clone; clones share the registry.
#[derive(Clone)]
pub struct QueryClient {
    inner: Arc<Inner>,
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClient {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Subscribe to the resource described by `descriptor`.
    ///
    /// Fetches when the entry is missing, stale or invalidated and no fetch is
    /// already running; cached data stays visible while it refetches.
    ///
    /// # Panics
    ///
    /// Must be called from within a tokio runtime; fetches run as spawned tasks.
    pub fn observe<T>(&self, descriptor: &QueryDescriptor<T>) -> QueryObserver<T>
    where
        T: Send + Sync + 'static,
    {
        let key = descriptor.key().clone();
        let mut entries = self.inner.entries.lock();

        let entry = entries.entry(key.clone()).or_insert_with(|| {
            let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
            debug!(%key, entry_id = id, "Cache entry created");
            let (tx, _) = watch::channel(EntrySnapshot::default());
            Entry {
                id,
                tx,
                fetcher: erase(descriptor),
                observers: 0,
                in_flight: None,
                updated_at: None,
                invalidated: false,
                generation: 0,
                stale_time: descriptor.get_stale_time(),
                cache_time: descriptor.get_cache_time(),
                enabled: descriptor.is_enabled(),
                epoch: 0,
            }
        });

        // The latest descriptor for a key defines its policy.
        entry.fetcher = erase(descriptor);
        entry.stale_time = descriptor.get_stale_time();
        entry.cache_time = descriptor.get_cache_time();
        entry.enabled = descriptor.is_enabled();
        entry.observers += 1;
        entry.epoch += 1;

        if entry.enabled && entry.current_fetch().is_none() && entry.is_stale(Instant::now()) {
            let _ = self.inner.start_fetch(&key, entry);
        }

        let rx = entry.tx.subscribe();
        let entry_id = entry.id;
        drop(entries);

        QueryObserver::new(self.clone(), key, entry_id, rx)
    }

    /// Observe until the current fetch settles, then detach.
    pub async fn fetch_query<T>(&self, descriptor: &QueryDescriptor<T>) -> Result<Arc<T>, ApiError>
    where
        T: Send + Sync + 'static,
    {
        let mut observer = self.observe(descriptor);
        observer.settled().await.into_result()
    }

    /// Run `mutation` once. On success, invalidate what it names and wait for
    /// the observed entries among those to refetch.
    #[tracing::instrument(skip_all, fields(mutation = mutation.name()))]
    pub async fn mutate<I, O>(&self, mutation: &MutationDescriptor<I, O>, input: I) -> Result<O, ApiError>
    where
        I: Send + 'static,
        O: Send + 'static,
    {
        match mutation.execute(input).await {
            Ok(output) => {
                self.invalidate_queries(mutation.invalidation()).await;
                Ok(output)
            }
            Err(e) => {
                warn!(error = %e, "Mutation failed, cache left untouched");
                Err(e)
            }
        }
    }

    /// Mark matching entries stale and refetch the observed ones.
    ///
    /// Resolves once every triggered refetch has settled. Refetch errors land
    /// in the entries' state, not here.
    pub async fn invalidate_queries(&self, which: &Invalidates) {
        let refetches = self.inner.invalidate(which);
        if refetches.is_empty() {
            return;
        }
        debug!(count = refetches.len(), "Awaiting refetches after invalidation");
        futures::future::join_all(refetches).await;
    }

    /// Drop every entry. Used when the session ends, so the next user starts cold.
    pub fn reset(&self) {
        let mut entries = self.inner.entries.lock();
        for entry in entries.values() {
            entry.tx.send_replace(EntrySnapshot::default());
        }
        let count = entries.len();
        entries.clear();
        debug!(count, "Query cache reset");
    }

    /// Whether `key` currently has an entry.
    pub fn is_cached(&self, key: &QueryKey) -> bool {
        self.inner.entries.lock().contains_key(key)
    }

    pub fn observer_count(&self, key: &QueryKey) -> usize {
        self.inner
            .entries
            .lock()
            .get(key)
            .map_or(0, |entry| entry.observers)
    }

    pub fn len(&self) -> usize {
        self.inner.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Refetch the entry an observer is attached to, joining any fetch in flight.
    pub(crate) async fn refetch(&self, key: &QueryKey, entry_id: u64) -> Option<ErasedResult> {
        let fetch = {
            let mut entries = self.inner.entries.lock();
            let entry = entries.get_mut(key).filter(|e| e.id == entry_id)?;
            match entry.current_fetch() {
                Some(fetch) => fetch,
                None => self.inner.start_fetch(key, entry),
            }
        };
        Some(fetch.await)
    }

    /// Release one observer of the entry.
    pub(crate) fn detach(&self, key: &QueryKey, entry_id: u64) {
        let mut entries = self.inner.entries.lock();
        let Some(entry) = entries.get_mut(key).filter(|e| e.id == entry_id) else {
            return;
        };

        entry.observers = entry.observers.saturating_sub(1);
        entry.epoch += 1;
        if entry.observers > 0 {
            return;
        }

        if entry.cache_time.is_zero() {
            entries.remove(key);
            debug!(%key, "Cache entry evicted on last detach");
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            entries.remove(key);
            debug!(%key, "Cache entry evicted, no runtime for deferred eviction");
            return;
        };

        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let key = key.clone();
        let (epoch, cache_time) = (entry.epoch, entry.cache_time);
        runtime.spawn(async move {
            tokio::time::sleep(cache_time).await;
            if let Some(inner) = weak.upgrade() {
                inner.evict_if_idle(&key, entry_id, epoch);
            }
        });
    }
}

impl Inner {
    /// Start a fetch for `entry` and record it as in flight, replacing (and
    /// aborting) any fetch already running.
    ///
    /// The fetch runs on its own task, so it completes and updates the entry
    /// even if every caller stops waiting.
    fn start_fetch(self: &Arc<Self>, key: &QueryKey, entry: &mut Entry) -> SharedFetch {
        let fetch_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(%key, entry_id = entry.id, fetch_id, generation = entry.generation, "Fetch started");
        let weak = Arc::downgrade(self);
        let fetch = (entry.fetcher)();
        let (key, entry_id) = (key.clone(), entry.id);

        let shared = async move {
            let result = fetch.await;
            if let Some(inner) = weak.upgrade() {
                inner.complete(&key, entry_id, fetch_id, &result);
            }
            result
        }
        .boxed()
        .shared();

        let task = tokio::spawn(shared.clone()).abort_handle();
        if let Some(superseded) = entry.in_flight.replace(InFlight {
            id: fetch_id,
            generation: entry.generation,
            fetch: shared.clone(),
            task,
        }) {
            debug!(fetch_id = superseded.id, "Superseding fetch started before invalidation");
            superseded.task.abort();
        }
        entry.tx.send_modify(|s| s.is_fetching = true);
        shared
    }

    fn complete(&self, key: &QueryKey, entry_id: u64, fetch_id: u64, result: &ErasedResult) {
        let mut entries = self.entries.lock();
        let Some(entry) = entries.get_mut(key).filter(|e| e.id == entry_id) else {
            debug!(%key, entry_id, "Discarding result for evicted entry");
            return;
        };
        let Some(in_flight) = entry.in_flight.take_if(|f| f.id == fetch_id) else {
            debug!(%key, fetch_id, "Discarding result of superseded fetch");
            return;
        };

        match result {
            Ok(data) => {
                // A fetch from before the latest invalidation may predate the write.
                if in_flight.generation == entry.generation {
                    entry.updated_at = Some(Instant::now());
                    entry.invalidated = false;
                }
                entry.tx.send_modify(|s| {
                    s.data = Some(data.clone());
                    s.error = None;
                    s.is_fetching = false;
                });
                debug!(%key, "Fetch succeeded");
            }
            Err(e) => {
                entry.tx.send_modify(|s| {
                    s.error = Some(e.clone());
                    s.is_fetching = false;
                });
                warn!(%key, error = %e, "Fetch failed");
            }
        }
    }

    fn invalidate(self: &Arc<Self>, which: &Invalidates) -> Vec<SharedFetch> {
        let mut entries = self.entries.lock();
        let mut refetches = Vec::new();

        for (key, entry) in entries.iter_mut().filter(|(key, _)| which.matches(key)) {
            entry.invalidated = true;
            entry.generation += 1;
            if entry.observers == 0 || !entry.enabled {
                continue;
            }
            refetches.push(self.start_fetch(key, entry));
        }

        refetches
    }

    fn evict_if_idle(&self, key: &QueryKey, entry_id: u64, epoch: u64) {
        let mut entries = self.entries.lock();
        let idle = entries
            .get(key)
            .is_some_and(|e| e.id == entry_id && e.epoch == epoch && e.observers == 0);
        if idle {
            entries.remove(key);
            debug!(%key, "Cache entry evicted after cache time");
        }
    }
}

fn erase<T: Send + Sync + 'static>(descriptor: &QueryDescriptor<T>) -> ErasedFetcher {
    let descriptor = descriptor.clone();
    Arc::new(move || {
        let fetch = descriptor.fetch();
        async move { fetch.await.map(|data| Arc::new(data) as Erased) }.boxed()
    })
}
