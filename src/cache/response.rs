//! TTL cache for upstream JSON responses.
//!
//! [`ResponseCache`] stores the last successful response for every
//! `(class, endpoint)` key. Freshness is decided at read time from the
//! entry's [`CacheClass`], so an expired entry is never dropped: it stays
//! available to [`ResponseCache::get_stale`] as the fallback of last
//! resort when the upstream API cannot be reached.
//!
//! # Growth
//!
//! There is no eviction beyond overwrite and [`ResponseCache::clear`]. The
//! endpoint set is bounded by the route layer and TTLs are short, so the
//! map stays small in practice.

use std::sync::Arc;

use moka::sync::Cache;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use crate::clock::Clock;
use crate::types::CacheClass;

/// A cached upstream response.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub class: CacheClass,
    pub cached_at: Instant,
    pub value: Arc<Value>,
}

impl CacheEntry {
    fn is_fresh(&self, class: CacheClass, now: Instant) -> bool {
        now.saturating_duration_since(self.cached_at) < class.ttl()
    }
}

/// Thread-safe response store with per-class freshness.
pub struct ResponseCache {
    entries: Cache<String, CacheEntry>,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create an empty cache reading time from `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Cache::builder().build(),
            clock,
        }
    }

    /// Look up a fresh value.
    ///
    /// Returns `None` when the key is absent or older than `class.ttl()`;
    /// an expired entry is left in place for [`get_stale`](Self::get_stale).
    pub fn get(&self, key: &str, class: CacheClass) -> Option<Value> {
        let entry = self.entries.get(key)?;
        if entry.is_fresh(class, self.clock.now()) {
            Some(entry.value.as_ref().clone())
        } else {
            debug!(key, %class, "cache entry expired");
            None
        }
    }

    /// Look up a value regardless of age.
    pub fn get_stale(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|e| e.value.as_ref().clone())
    }

    /// Insert or overwrite the entry for `key`, stamped with the current time.
    pub fn put(&self, key: impl Into<String>, class: CacheClass, value: Value) {
        let entry = CacheEntry {
            class,
            cached_at: self.clock.now(),
            value: Arc::new(value),
        };
        self.entries.insert(key.into(), entry);
    }

    /// Raw entry for `key`, for inspection.
    pub fn entry(&self, key: &str) -> Option<CacheEntry> {
        self.entries.get(key)
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.iter().count()
    }

    /// Whether the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

/// Cache key for an endpoint: `"{class}_{endpoint}"`.
///
/// The endpoint is used verbatim, query string included, so paginated
/// requests never share an entry.
pub fn cache_key(class: CacheClass, endpoint: &str) -> String {
    format!("{class}_{endpoint}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_includes_class_and_endpoint() {
        assert_eq!(
            cache_key(CacheClass::Home, "/anime/home"),
            "home_/anime/home"
        );
    }

    #[test]
    fn key_keeps_query_string() {
        let k1 = cache_key(CacheClass::Ongoing, "/anime/ongoing-anime?page=1");
        let k2 = cache_key(CacheClass::Ongoing, "/anime/ongoing-anime?page=2");
        assert_ne!(k1, k2);
        assert!(k2.ends_with("?page=2"));
    }

    #[test]
    fn key_differs_on_class() {
        assert_ne!(
            cache_key(CacheClass::Genre, "/anime/genre"),
            cache_key(CacheClass::Anime, "/anime/genre")
        );
    }
}
