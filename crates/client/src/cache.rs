//! Keyed cache of server query results.
//!
//! Entries are stored type-erased and recovered by downcast, so one cache
//! holds pages of transactions next to analytics payloads. A key is the
//! resource plus its canonical parameters; invalidation is by resource.
//!
//! Concurrent `fetch` calls for the same key share one request: the first
//! caller leads, later callers wait on a `watch` channel for its outcome.
//! The map lock is a plain mutex and is never held across an `.await`.

use std::{
    any::Any,
    collections::HashMap,
    fmt,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use tokio::sync::watch;
use tracing::{debug, info};

use crate::{
    error::{ClientError, FetchError},
    resource::Resource,
};

pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: Resource,
    params: Vec<(String, String)>,
}

impl QueryKey {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            params: Vec::new(),
        }
    }

    /// Adds or replaces one parameter. Parameters stay sorted by name so
    /// equality does not depend on insertion order.
    pub fn param(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        let name = name.into();
        let value = value.to_string();
        match self.params.binary_search_by(|(k, _)| k.cmp(&name)) {
            Ok(idx) => self.params[idx].1 = value,
            Err(idx) => self.params.insert(idx, (name, value)),
        }
        self
    }

    pub fn with_params<I, K, V>(resource: Resource, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        params
            .into_iter()
            .fold(Self::new(resource), |key, (name, value)| key.param(name, value))
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        for (idx, (name, value)) in self.params.iter().enumerate() {
            let sep = if idx == 0 { '?' } else { '&' };
            write!(f, "{sep}{name}={value}")?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct CachedEntry<T> {
    pub value: Arc<T>,
    pub fetched_at: Instant,
    /// Older than the cache's `stale_after`; `fetch` would refetch it.
    pub stale: bool,
}

impl<T> Clone for CachedEntry<T> {
    fn clone(&self) -> Self {
        Self {
            value: Arc::clone(&self.value),
            fetched_at: self.fetched_at,
            stale: self.stale,
        }
    }
}

type Shared = Arc<dyn Any + Send + Sync>;
type Outcome = Result<Shared, FetchError>;

struct StoredEntry {
    value: Shared,
    fetched_at: Instant,
    seq: u64,
}

/// A running fetch. `epoch` is the resource epoch it started under; a fetch
/// from before an invalidation is never joined.
struct InFlight {
    ticket: u64,
    epoch: u64,
    rx: watch::Receiver<Option<Outcome>>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<QueryKey, StoredEntry>,
    in_flight: HashMap<QueryKey, InFlight>,
    epochs: HashMap<Resource, u64>,
    seq: u64,
    tickets: u64,
}

impl Inner {
    fn epoch(&self, resource: Resource) -> u64 {
        self.epochs.get(&resource).copied().unwrap_or(0)
    }

    fn store(&mut self, key: QueryKey, value: Shared) {
        self.seq += 1;
        let entry = StoredEntry {
            value,
            fetched_at: Instant::now(),
            seq: self.seq,
        };
        self.entries.insert(key, entry);
    }

    /// Clears the marker of `key` unless a newer fetch replaced it.
    fn finish(&mut self, key: &QueryKey, ticket: u64) {
        if self
            .in_flight
            .get(key)
            .is_some_and(|running| running.ticket == ticket)
        {
            self.in_flight.remove(key);
        }
    }
}

enum Plan<T> {
    Hit(Arc<T>),
    Wait(watch::Receiver<Option<Outcome>>),
    Lead {
        tx: watch::Sender<Option<Outcome>>,
        epoch: u64,
        ticket: u64,
    },
}

/// Clears the in-flight marker if the leading fetch is dropped before it
/// settles, so waiters fall through and retry.
struct InFlightGuard<'a> {
    cache: &'a QueryCache,
    key: &'a QueryKey,
    ticket: u64,
    armed: bool,
}

impl InFlightGuard<'_> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.cache.lock().finish(self.key, self.ticket);
        }
    }
}

pub struct QueryCache {
    inner: Mutex<Inner>,
    stale_after: Option<Duration>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("QueryCache")
            .field("entries", &inner.entries.len())
            .field("in_flight", &inner.in_flight.len())
            .field("stale_after", &self.stale_after)
            .finish()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_stale_after(Some(DEFAULT_STALE_AFTER))
    }

    /// `None` keeps entries fresh until they are invalidated.
    pub fn with_stale_after(stale_after: Option<Duration>) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            stale_after,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn is_stale(&self, fetched_at: Instant) -> bool {
        self.stale_after
            .is_some_and(|limit| fetched_at.elapsed() >= limit)
    }

    fn entry<T: Send + Sync + 'static>(&self, stored: &StoredEntry) -> Option<CachedEntry<T>> {
        let value = Arc::clone(&stored.value).downcast::<T>().ok()?;
        Some(CachedEntry {
            value,
            fetched_at: stored.fetched_at,
            stale: self.is_stale(stored.fetched_at),
        })
    }

    pub fn get<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<CachedEntry<T>> {
        let inner = self.lock();
        inner
            .entries
            .get(key)
            .and_then(|stored| self.entry(stored))
    }

    pub fn set<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.lock().store(key, Arc::clone(&value) as Shared);
        value
    }

    /// Drops every entry of `resource`, whatever its parameters. Fetches of
    /// that resource already in flight still answer their existing waiters
    /// but do not store their result, and later callers start a new fetch
    /// instead of joining them.
    pub fn invalidate(&self, resource: Resource) -> usize {
        let mut inner = self.lock();
        let before = inner.entries.len();
        inner.entries.retain(|key, _| key.resource != resource);
        *inner.epochs.entry(resource).or_insert(0) += 1;
        let dropped = before - inner.entries.len();
        info!(%resource, dropped, "cache invalidated");
        dropped
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.lock().entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.lock().in_flight.contains_key(key)
    }

    /// The most recently stored entry of `resource`, used as placeholder
    /// data while another page of it loads.
    pub fn latest<T: Send + Sync + 'static>(&self, resource: Resource) -> Option<CachedEntry<T>> {
        let inner = self.lock();
        inner
            .entries
            .iter()
            .filter(|(key, _)| key.resource == resource)
            .filter(|(_, stored)| stored.value.is::<T>())
            .max_by_key(|(_, stored)| stored.seq)
            .and_then(|(_, stored)| self.entry(stored))
    }

    fn plan<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Plan<T> {
        let mut inner = self.lock();

        if let Some(stored) = inner.entries.get(key)
            && !self.is_stale(stored.fetched_at)
            && let Ok(value) = Arc::clone(&stored.value).downcast::<T>()
        {
            debug!(%key, "cache hit");
            return Plan::Hit(value);
        }

        let epoch = inner.epoch(key.resource);
        if let Some(running) = inner.in_flight.get(key) {
            if running.epoch == epoch {
                debug!(%key, "joining in-flight fetch");
                return Plan::Wait(running.rx.clone());
            }
            debug!(%key, "in-flight fetch predates invalidation; fetching again");
        }

        let (tx, rx) = watch::channel(None);
        inner.tickets += 1;
        let ticket = inner.tickets;
        inner.in_flight.insert(key.clone(), InFlight { ticket, epoch, rx });
        debug!(%key, "cache miss");
        Plan::Lead { tx, epoch, ticket }
    }

    async fn wait<T: Send + Sync + 'static>(
        mut rx: watch::Receiver<Option<Outcome>>,
    ) -> Option<Result<Arc<T>, FetchError>> {
        let outcome = match rx.wait_for(Option::is_some).await {
            Ok(outcome) => (*outcome).clone(),
            // The leader was dropped before settling.
            Err(_) => return None,
        };
        match outcome? {
            Ok(shared) => shared.downcast::<T>().ok().map(Ok),
            Err(err) => Some(Err(err)),
        }
    }

    /// Returns the cached value for `key`, or runs `fetcher` to load it.
    ///
    /// At most one `fetcher` per key runs at a time; concurrent callers get
    /// the same success or the same error. Failures are not stored.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<Arc<T>, FetchError>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ClientError>>,
    {
        let (tx, epoch, ticket) = loop {
            match self.plan::<T>(&key) {
                Plan::Hit(value) => return Ok(value),
                Plan::Wait(rx) => {
                    if let Some(result) = Self::wait::<T>(rx).await {
                        return result;
                    }
                }
                Plan::Lead { tx, epoch, ticket } => break (tx, epoch, ticket),
            }
        };

        let guard = InFlightGuard {
            cache: self,
            key: &key,
            ticket,
            armed: true,
        };
        let result = fetcher().await.map(Arc::new).map_err(FetchError::from);
        let outcome: Outcome = result.clone().map(|value| value as Shared);

        {
            let mut inner = self.lock();
            inner.finish(&key, ticket);
            match &outcome {
                Ok(value) if inner.epoch(key.resource) == epoch => {
                    inner.store(key.clone(), Arc::clone(value));
                    debug!(%key, "cache stored");
                }
                Ok(_) => debug!(%key, "resource invalidated during fetch; result not stored"),
                Err(err) => debug!(%key, error = %err, "fetch failed; entry left absent"),
            }
        }
        guard.disarm();

        tx.send_replace(Some(outcome));
        result
    }
}
