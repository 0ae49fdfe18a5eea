//! Configuration for the expiring cache.

use std::time::Duration;

/// Default expiry interval. Entries older than this are removed on the next
/// reap cycle, and the reaper wakes up once per interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(7);

/// Smallest period the reaper will tick at.
pub(crate) const MIN_REAP_PERIOD: Duration = Duration::from_millis(1);

/// Configuration for the expiring cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum age of an entry before the reaper may delete it.
    /// Also the period of the reaper.
    pub interval: Duration,

    /// Whether to run the background reaper.
    /// If false, entries live until overwritten, removed or cleared.
    pub reaping: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            reaping: true,
        }
    }
}

impl CacheConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the expiry interval.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Enable or disable the background reaper.
    pub fn with_reaping(mut self, enabled: bool) -> Self {
        self.reaping = enabled;
        self
    }

    /// Disable the background reaper.
    pub fn without_reaping(self) -> Self {
        self.with_reaping(false)
    }

    /// Period the reaper actually ticks at.
    pub(crate) fn reap_period(&self) -> Duration {
        self.interval.max(MIN_REAP_PERIOD)
    }
}
