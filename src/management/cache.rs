use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Arc, Mutex, MutexGuard,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use crate::config;

/// Time source for cache expiry.
///
/// `now` is measured from an arbitrary origin; only differences matter.
pub trait Clock: Send + Sync {
    fn now(&self) -> Duration;
}

pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// A clock that only moves when told to. Used by tests to step over TTLs.
#[derive(Default)]
pub struct ManualClock {
    millis: AtomicU64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.millis
            .fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

struct Entry<V> {
    value: V,
    expires_at: Duration,
}

struct Inner<V> {
    entries: HashMap<String, Entry<V>>,
    // insertion order, oldest first
    order: VecDeque<String>,
}

impl<V> Inner<V> {
    fn remove(&mut self, key: &str) {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
    }

    fn purge_expired(&mut self, now: Duration) {
        self.entries.retain(|_, entry| entry.expires_at > now);
        let entries = &self.entries;
        self.order.retain(|k| entries.contains_key(k));
    }
}

/// Bounded key→value cache with a fixed time-to-live and first-in-first-out
/// eviction.
///
/// Entries are keyed by Spotify id. Reads never return an entry whose TTL has
/// elapsed. When a new key is inserted at capacity, expired entries are
/// dropped first and then the oldest inserted entries are evicted. Refreshing
/// an existing key restarts its TTL and moves it to the back of the queue.
///
/// The cache is safe to share between concurrent requests; all operations
/// take an internal lock.
pub struct CatalogCache<V> {
    max_size: usize,
    ttl: Duration,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner<V>>,
}

impl<V: Clone> CatalogCache<V> {
    pub fn new(max_size: usize, ttl: Duration) -> Self {
        Self::with_clock(max_size, ttl, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(max_size: usize, ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            max_size,
            ttl,
            clock,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
        }
    }

    /// Builds a cache sized from `SPOTITAG_CACHE_SIZE` / `SPOTITAG_CACHE_TTL`.
    pub fn from_env() -> Self {
        Self::new(config::cache_size(), config::cache_ttl())
    }

    /// Returns the fresh entries among `ids`. Missing and expired ids are
    /// left out of the map.
    pub fn get_many<I, S>(&self, ids: I) -> HashMap<String, V>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let now = self.clock.now();
        let mut inner = self.lock();
        let mut found = HashMap::new();

        for id in ids {
            let id = id.as_ref();
            let expired = match inner.entries.get(id) {
                Some(entry) if entry.expires_at > now => {
                    found.insert(id.to_string(), entry.value.clone());
                    false
                }
                Some(_) => true,
                None => false,
            };
            if expired {
                inner.remove(id);
            }
        }

        found
    }

    pub fn get(&self, id: &str) -> Option<V> {
        self.get_many([id]).remove(id)
    }

    /// Inserts or refreshes every entry, stamping each with `now + ttl`.
    pub fn set_many<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, V)>,
    {
        if self.max_size == 0 {
            return;
        }

        let now = self.clock.now();
        let expires_at = now + self.ttl;
        let mut inner = self.lock();

        for (id, value) in entries {
            if inner.entries.contains_key(&id) {
                inner.remove(&id);
            } else if inner.entries.len() >= self.max_size {
                inner.purge_expired(now);
                while inner.entries.len() >= self.max_size {
                    match inner.order.pop_front() {
                        Some(oldest) => {
                            inner.entries.remove(&oldest);
                        }
                        None => break,
                    }
                }
            }

            inner.order.push_back(id.clone());
            inner.entries.insert(id, Entry { value, expires_at });
        }
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.order.clear();
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    fn lock(&self) -> MutexGuard<'_, Inner<V>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
