//! # Result Cache
//!
//! Time-bounded key/value cache for aggregated search results.
//!
//! Entries expire `ttl` after they were written. Reads never return an
//! expired entry: an expired hit is evicted on the spot. A background
//! sweep started with [`ResultCache::spawn_cleanup`] removes entries that
//! nobody reads again.
//!
//! The clock is [`tokio::time::Instant`], so tests can pause and advance
//! time deterministically.
//!
//! # Examples
//!
//! ```
//! use review_import::infrastructure::cache::ResultCache;
//! use std::time::Duration;
//!
//! let cache: ResultCache<u32> = ResultCache::new(Duration::from_secs(60));
//! cache.set("search:coffee", 7);
//! assert_eq!(cache.get("search:coffee"), Some(7));
//! ```

use dashmap::DashMap;
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default interval between background sweeps.
pub const DEFAULT_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

/// Shortest interval accepted by [`ResultCache::spawn_cleanup`].
pub const MIN_CLEANUP_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at <= now
    }
}

/// TTL cache keyed by string.
#[derive(Debug)]
pub struct ResultCache<V> {
    entries: DashMap<String, CacheEntry<V>>,
    ttl: Duration,
}

impl<V> ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Creates an empty cache whose entries live for `ttl`.
    ///
    /// # Arguments
    ///
    /// * `ttl` - Lifetime of each entry, counted from its last `set`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Creates an empty cache with the default five minute TTL.
    #[must_use]
    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL)
    }

    /// Returns the configured TTL.
    #[inline]
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a clone of the live value under `key`.
    ///
    /// An expired entry is removed and `None` is returned.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        {
            let entry = self.entries.get(key)?;
            if !entry.is_expired(now) {
                return Some(entry.value.clone());
            }
        }

        // Re-check under the write lock so a concurrent `set` is not evicted.
        self.entries
            .remove_if(key, |_, entry| entry.is_expired(now));
        None
    }

    /// Stores `value` under `key`, replacing any previous entry and
    /// restarting its TTL.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let expires_at = Instant::now() + self.ttl;
        self.entries
            .insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Removes `key`. Returns true if an entry was present.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Evicts every expired entry and returns how many were removed.
    pub fn cleanup(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    /// Number of stored entries, including expired ones not yet evicted.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Starts a task that calls [`cleanup`](Self::cleanup) every `every`.
    ///
    /// The task holds only a weak reference and exits once the cache has
    /// been dropped. Must be called from within a Tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `every` - Sweep interval, raised to [`MIN_CLEANUP_INTERVAL`] if shorter.
    pub fn spawn_cleanup(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let every = if every < MIN_CLEANUP_INTERVAL {
            warn!(
                requested_ms = u64::try_from(every.as_millis()).unwrap_or(u64::MAX),
                "cache cleanup interval too short, using minimum"
            );
            MIN_CLEANUP_INTERVAL
        } else {
            every
        };
        let weak: Weak<Self> = Arc::downgrade(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(cache) = weak.upgrade() else {
                    debug!("result cache dropped, stopping cleanup task");
                    break;
                };
                let evicted = cache.cleanup();
                if evicted > 0 {
                    debug!(evicted, remaining = cache.len(), "evicted expired cache entries");
                }
            }
        })
    }
}

impl<V> Default for ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn get_returns_live_value() {
        let cache = ResultCache::new(Duration::from_secs(10));
        cache.set("k", 1u32);
        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(cache.get("k"), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_evicted_on_read() {
        let cache = ResultCache::new(Duration::from_secs(10));
        cache.set("k", 1u32);
        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
        // Never comes back.
        assert_eq!(cache.get("k"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn set_restarts_ttl() {
        let cache = ResultCache::new(Duration::from_secs(10));
        cache.set("k", 1u32);
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("k", 2u32);
        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get("k"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn cleanup_counts_evictions() {
        let cache = ResultCache::new(Duration::from_secs(10));
        cache.set("a", 1u32);
        cache.set("b", 2u32);
        tokio::time::advance(Duration::from_secs(5)).await;
        cache.set("c", 3u32);
        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(cache.cleanup(), 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("c"), Some(3));
        assert_eq!(cache.cleanup(), 0);
    }

    #[test]
    fn delete_and_clear() {
        let cache = ResultCache::with_default_ttl();
        cache.set("a", "x".to_string());
        cache.set("b", "y".to_string());
        assert!(cache.delete("a"));
        assert!(!cache.delete("a"));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.ttl(), DEFAULT_TTL);
    }

    #[tokio::test(start_paused = true)]
    async fn background_sweep_evicts_unread_entries() {
        let cache = Arc::new(ResultCache::new(Duration::from_secs(5)));
        cache.set("k", 1u32);
        let _handle = cache.spawn_cleanup(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_secs(7)).await;
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_sweep_still_runs() {
        let cache = Arc::new(ResultCache::new(Duration::from_secs(2)));
        cache.set("k", 1u32);
        let handle = cache.spawn_cleanup(Duration::ZERO);

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(!handle.is_finished());
        assert!(cache.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_stops_when_cache_dropped() {
        let cache = Arc::new(ResultCache::<u32>::new(Duration::from_secs(5)));
        let handle = cache.spawn_cleanup(Duration::from_secs(1));
        drop(cache);

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(handle.is_finished());
    }
}
