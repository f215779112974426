//! TTL cache implementation.

use crate::{Clock, SystemClock};
use derive_getters::Getters;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use streamgate_error::{JsonError, StreamgateResult};

/// Cache entry with value and expiration.
#[derive(Debug, Clone, Getters)]
pub struct CacheEntry {
    value: JsonValue,
    inserted_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    /// Absolute instant after which the entry is never returned.
    ///
    /// `None` when the TTL reaches past what `Instant` can represent; such an
    /// entry never expires.
    pub fn expires_at(&self) -> Option<Instant> {
        self.inserted_at.checked_add(self.ttl)
    }

    /// Check if this entry is expired at `now`.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at().is_some_and(|expires_at| now >= expires_at)
    }
}

/// Configuration for the TTL cache.
#[derive(Debug, Clone, Serialize, Deserialize, Getters, derive_setters::Setters, derive_builder::Builder)]
#[setters(prefix = "with_")]
pub struct CacheConfig {
    /// TTL used by [`TtlCache::set_default`] (seconds)
    #[serde(default = "default_ttl")]
    default_ttl: u64,

    /// Whether caching is enabled
    #[serde(default = "default_enabled")]
    enabled: bool,
}

fn default_ttl() -> u64 {
    3600 // 1 hour
}

fn default_enabled() -> bool {
    true
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            default_ttl: default_ttl(),
            enabled: default_enabled(),
        }
    }
}

/// Thread-safe key/value cache with per-entry TTL.
///
/// Values are stored as JSON so one cache can hold any serializable type.
/// Expiry is checked lazily on read; there is no background sweeper, so
/// expired entries that are never read again stay in memory until
/// [`TtlCache::purge_expired`] or [`TtlCache::clear`] runs.
///
/// A miss never says why: an absent key, an expired entry and a value that
/// no longer deserializes all return `None`.
///
/// # Example
///
/// ```
/// use streamgate_cache::{CacheConfig, TtlCache};
///
/// let cache = TtlCache::new(CacheConfig::default());
/// cache.set("file:777:1", &"descriptor", 3600).unwrap();
///
/// let hit: Option<String> = cache.get("file:777:1");
/// assert_eq!(hit.as_deref(), Some("descriptor"));
/// ```
pub struct TtlCache {
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl TtlCache {
    /// Create a cache backed by the system clock.
    pub fn new(config: CacheConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit clock.
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> Self {
        tracing::debug!(
            default_ttl = config.default_ttl,
            enabled = config.enabled,
            "Creating new TtlCache"
        );
        Self {
            config,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Store a value, replacing whatever the key held before.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if the value cannot be serialized.
    #[tracing::instrument(skip(self, value))]
    pub fn set<T: Serialize>(&self, key: &str, value: &T, ttl_seconds: u64) -> StreamgateResult<()> {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, skipping insert");
            return Ok(());
        }

        let value = serde_json::to_value(value)
            .map_err(|e| JsonError::new(format!("Failed to serialize cache value: {}", e)))?;
        let entry = CacheEntry {
            value,
            inserted_at: self.clock.now(),
            ttl: Duration::from_secs(ttl_seconds),
        };

        let mut entries = self.entries.lock();
        let replaced = entries.insert(key.to_string(), entry).is_some();
        tracing::debug!(replaced, cache_size = entries.len(), "Inserted entry into cache");
        Ok(())
    }

    /// Store a value with the configured default TTL.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if the value cannot be serialized.
    pub fn set_default<T: Serialize>(&self, key: &str, value: &T) -> StreamgateResult<()> {
        self.set(key, value, self.config.default_ttl)
    }

    /// Look up a value.
    ///
    /// Returns `None` if the entry doesn't exist, is expired, does not
    /// deserialize into `T`, or the cache is disabled.
    #[tracing::instrument(skip(self))]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        if !self.config.enabled {
            tracing::debug!("Cache disabled, returning None");
            return None;
        }

        let now = self.clock.now();
        let value = {
            let mut entries = self.entries.lock();
            let entry = entries.get(key)?;
            if entry.is_expired_at(now) {
                tracing::debug!("Cache entry expired, removing");
                entries.remove(key);
                return None;
            }
            entry.value.clone()
        };

        match serde_json::from_value(value) {
            Ok(value) => {
                tracing::debug!("Cache hit");
                Some(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cached value has unexpected shape, treating as miss");
                None
            }
        }
    }

    /// Remove expired entries from cache.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - entries.len();
        if removed > 0 {
            tracing::info!(removed, remaining = entries.len(), "Purged expired cache entries");
        }
        removed
    }

    /// Clear all cache entries.
    pub fn clear(&self) {
        let mut entries = self.entries.lock();
        let count = entries.len();
        entries.clear();
        tracing::info!(cleared = count, "Cleared cache");
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Check if cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// The cache configuration.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl std::fmt::Debug for TtlCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("config", &self.config)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;

    fn cache_with_clock() -> (TtlCache, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new());
        let cache = TtlCache::with_clock(CacheConfig::default(), clock.clone());
        (cache, clock)
    }

    #[test]
    fn test_round_trip() {
        let (cache, _) = cache_with_clock();
        cache.set("k", &42u32, 10).unwrap();
        assert_eq!(cache.get::<u32>("k"), Some(42));
    }

    #[test]
    fn test_expires_at_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", &"v", 3600).unwrap();

        clock.advance(Duration::from_secs(3599));
        assert_eq!(cache.get::<String>("k").as_deref(), Some("v"));

        clock.advance(Duration::from_secs(1));
        assert_eq!(cache.get::<String>("k"), None);
    }

    #[test]
    fn test_set_overwrites_and_resets_ttl() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", &1u32, 10).unwrap();
        clock.advance(Duration::from_secs(8));
        cache.set("k", &2u32, 10).unwrap();
        clock.advance(Duration::from_secs(8));
        assert_eq!(cache.get::<u32>("k"), Some(2));
    }

    #[test]
    fn test_unrepresentable_ttl_never_expires() {
        let (cache, clock) = cache_with_clock();
        cache.set("k", &1u8, u64::MAX).unwrap();
        assert_eq!(cache.get::<u8>("k"), Some(1));

        clock.advance(Duration::from_secs(365 * 24 * 3600));
        assert_eq!(cache.purge_expired(), 0);
        assert_eq!(cache.get::<u8>("k"), Some(1));
    }

    #[test]
    fn test_default_ttl_from_config_can_be_huge() {
        let config = CacheConfig::default().with_default_ttl(u64::MAX);
        let cache = TtlCache::new(config);
        cache.set_default("k", &"v").unwrap();
        assert_eq!(cache.get::<String>("k").as_deref(), Some("v"));
    }

    #[test]
    fn test_wrong_type_is_a_miss() {
        let (cache, _) = cache_with_clock();
        cache.set("k", &"not a number", 10).unwrap();
        assert_eq!(cache.get::<u64>("k"), None);
    }

    #[test]
    fn test_purge_expired() {
        let (cache, clock) = cache_with_clock();
        cache.set("short", &1u8, 1).unwrap();
        cache.set("long", &2u8, 100).unwrap();
        clock.advance(Duration::from_secs(5));

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get::<u8>("long"), Some(2));
    }

    #[test]
    fn test_disabled_cache_always_misses() {
        let config = CacheConfig::default().with_enabled(false);
        let cache = TtlCache::new(config);
        cache.set("k", &1u8, 100).unwrap();
        assert!(cache.is_empty());
        assert_eq!(cache.get::<u8>("k"), None);
    }
}
