//! Time-expiring byte cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::{debug, trace};

use crate::config::CacheConfig;
use crate::reaper::Reaper;

/// Entry stored in the cache.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// When this entry was written.
    pub created_at: Instant,

    /// Cached payload.
    pub value: Vec<u8>,
}

impl CacheEntry {
    fn new(value: Vec<u8>) -> Self {
        Self {
            created_at: Instant::now(),
            value,
        }
    }

    /// Age of the entry relative to `now`. Zero if `now` predates the entry.
    pub fn age_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.created_at)
    }
}

#[derive(Debug, Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    inserts: AtomicU64,
    reaped: AtomicU64,
    reap_passes: AtomicU64,
}

/// State shared between cache handles and the reaper.
pub(crate) struct Shared {
    entries: Mutex<HashMap<String, CacheEntry>>,
    interval: Duration,
    counters: Counters,
}

impl Shared {
    fn new(interval: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            interval,
            counters: Counters::default(),
        }
    }

    /// Delete every entry older than the interval as of `now`.
    ///
    /// The guard is held for the whole pass.
    pub(crate) fn reap(&self, now: Instant) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, entry| {
            let keep = entry.age_at(now) <= self.interval;
            if !keep {
                trace!(key = %key, "Reaping expired cache entry");
            }
            keep
        });
        let removed = before - entries.len();
        let remaining = entries.len();
        drop(entries);

        self.counters.reap_passes.fetch_add(1, Ordering::Relaxed);
        self.counters
            .reaped
            .fetch_add(removed as u64, Ordering::Relaxed);

        if removed > 0 {
            debug!(removed, remaining, "Reaped expired cache entries");
        }

        removed
    }
}

/// Concurrency-safe map from string keys to opaque byte payloads.
///
/// Every entry is stamped with its write time. When reaping is enabled a
/// single background task wakes up once per interval and deletes entries
/// older than the interval, so a stale entry stays readable for at most one
/// extra reap period.
///
/// Clones share the same entries and the same reaper. The reaper stops when
/// [`shutdown`](Self::shutdown) is called or the last clone is dropped.
#[derive(Clone)]
pub struct ExpiringCache {
    shared: Arc<Shared>,
    reaper: Option<Arc<Reaper>>,
    config: CacheConfig,
}

impl ExpiringCache {
    /// Create a new cache, starting the reaper if the config enables it.
    pub fn new(config: CacheConfig) -> Self {
        let shared = Arc::new(Shared::new(config.interval));

        let reaper = if config.reaping {
            Reaper::spawn(Arc::downgrade(&shared), config.reap_period()).map(Arc::new)
        } else {
            None
        };

        debug!(
            interval_ms = config.interval.as_millis() as u64,
            reaping = reaper.is_some(),
            "Expiring cache created"
        );

        Self {
            shared,
            reaper,
            config,
        }
    }

    /// Create a reaping cache with the given interval.
    pub fn with_interval(interval: Duration) -> Self {
        Self::new(CacheConfig::new().with_interval(interval))
    }

    /// Get the cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Expiry interval (and reap period).
    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    /// Insert or replace the payload stored under `key`.
    pub fn add(&self, key: &str, value: impl Into<Vec<u8>>) {
        let value = value.into();
        let size = value.len();

        let mut entries = self.shared.entries.lock();
        // Timestamp taken under the guard so replacements never go backwards.
        entries.insert(key.to_string(), CacheEntry::new(value));
        let len = entries.len();
        drop(entries);

        self.shared.counters.inserts.fetch_add(1, Ordering::Relaxed);
        trace!(key = %key, size, cache_size = len, "Cache entry added");
    }

    /// Get the payload stored under `key`, stale or not.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let value = self
            .shared
            .entries
            .lock()
            .get(key)
            .map(|entry| entry.value.clone());

        let counter = if value.is_some() {
            trace!(key = %key, "Cache hit");
            &self.shared.counters.hits
        } else {
            trace!(key = %key, "Cache miss");
            &self.shared.counters.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);

        value
    }

    /// Get a copy of the full entry, including its timestamp.
    pub fn peek_entry(&self, key: &str) -> Option<CacheEntry> {
        self.shared.entries.lock().get(key).cloned()
    }

    /// Remove the entry stored under `key`.
    pub fn remove(&self, key: &str) -> Option<Vec<u8>> {
        let removed = self.shared.entries.lock().remove(key);
        if removed.is_some() {
            debug!(key = %key, "Cache entry removed");
        }
        removed.map(|entry| entry.value)
    }

    /// Check if an entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.shared.entries.lock().contains_key(key)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.shared.entries.lock().len()
    }

    /// Check if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.shared.entries.lock().is_empty()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        let mut entries = self.shared.entries.lock();
        let count = entries.len();
        entries.clear();
        drop(entries);
        debug!(count, "Cache cleared");
    }

    /// Run one reap pass now, outside the reaper's schedule.
    ///
    /// Returns the number of entries deleted.
    pub fn reap_expired(&self) -> usize {
        self.shared.reap(Instant::now())
    }

    /// Whether a background reaper is currently running.
    pub fn is_reaping(&self) -> bool {
        self.reaper.as_ref().is_some_and(|r| r.is_running())
    }

    /// Stop the background reaper. Idempotent.
    ///
    /// Entries are kept; they simply stop expiring.
    pub fn shutdown(&self) {
        if let Some(reaper) = &self.reaper {
            reaper.cancel();
        }
    }

    /// Get cache statistics.
    pub fn stats(&self) -> CacheStats {
        let counters = &self.shared.counters;
        CacheStats {
            entries: self.len(),
            hits: counters.hits.load(Ordering::Relaxed),
            misses: counters.misses.load(Ordering::Relaxed),
            inserts: counters.inserts.load(Ordering::Relaxed),
            reaped: counters.reaped.load(Ordering::Relaxed),
            reap_passes: counters.reap_passes.load(Ordering::Relaxed),
        }
    }
}

impl Default for ExpiringCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl std::fmt::Debug for ExpiringCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("config", &self.config)
            .field("entries", &self.len())
            .field("reaping", &self.is_reaping())
            .finish()
    }
}

/// Cache statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Current number of entries.
    pub entries: usize,

    /// Lookups that found an entry.
    pub hits: u64,

    /// Lookups that found nothing.
    pub misses: u64,

    /// Writes, including overwrites.
    pub inserts: u64,

    /// Entries deleted by reap passes.
    pub reaped: u64,

    /// Reap passes run, scheduled or manual.
    pub reap_passes: u64,
}
