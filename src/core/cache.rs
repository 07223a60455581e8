use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone)]
struct CacheEntry {
    value: String,
    expires_at: Instant,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    in_flight: HashSet<String>,
}

impl CacheState {
    fn fresh(&self, key: &str, now: Instant) -> Option<&str> {
        self.entries
            .get(key)
            .filter(|entry| now < entry.expires_at)
            .map(|entry| entry.value.as_str())
    }
}

/// Clears the in-flight marker for a key, including when the fetch task panics.
struct InFlightGuard {
    state: Arc<Mutex<CacheState>>,
    key: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        lock(&self.state).in_flight.remove(&self.key);
    }
}

fn lock(state: &Mutex<CacheState>) -> MutexGuard<'_, CacheState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// TTL cache of resolved values with single-flight background refresh.
///
/// Expired entries are never evicted, only ignored: `get` treats them as
/// absent and the next successful fetch overwrites them.
#[derive(Debug, Clone)]
pub struct EntityCache {
    state: Arc<Mutex<CacheState>>,
    ttl: Duration,
    runtime: Handle,
}

impl EntityCache {
    pub fn new(runtime: Handle) -> Self {
        Self::with_ttl(runtime, DEFAULT_TTL)
    }

    pub fn with_ttl(runtime: Handle, ttl: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            ttl,
            runtime,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        lock(&self.state)
            .fresh(key, Instant::now())
            .map(str::to_string)
    }

    /// Stores a value that expires one TTL from now, replacing any previous entry.
    pub fn insert(&self, key: &str, value: String) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        lock(&self.state).entries.insert(key.to_string(), entry);
    }

    pub fn is_fetching(&self, key: &str) -> bool {
        lock(&self.state).in_flight.contains(key)
    }

    /// Starts a background fetch for `key` unless the key is fresh or a fetch
    /// for it is already running.
    ///
    /// `fetch` resolving to `Some` stores the value; `None` leaves the cache
    /// untouched so that the next call retries. The returned handle completes
    /// after the result has been applied; dropping it does not cancel the fetch.
    pub fn ensure_fetching<F, Fut>(&self, key: &str, fetch: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<String>> + Send + 'static,
    {
        {
            let mut state = lock(&self.state);
            if state.fresh(key, Instant::now()).is_some() {
                return None;
            }
            // check-and-set under the same lock
            if !state.in_flight.insert(key.to_string()) {
                tracing::debug!("Fetch for {} already in flight", key);
                return None;
            }
        }

        let guard = InFlightGuard {
            state: Arc::clone(&self.state),
            key: key.to_string(),
        };
        let future = fetch();
        let cache = self.clone();

        Some(self.runtime.spawn(async move {
            let guard = guard;
            match future.await {
                Some(value) => cache.insert(&guard.key, value),
                None => tracing::debug!("Fetch for {} returned nothing; cache unchanged", guard.key),
            }
        }))
    }
}
