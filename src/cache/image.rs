//! In-memory image store keyed by source URL.
//!
//! Entries expire lazily: an entry older than the configured TTL is
//! treated as absent by [`ImageCache::get_fresh`] but stays in the map
//! (and in [`ImageCache::stats`]) until it is overwritten or the cache is
//! cleared.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use dashmap::DashMap;
use tokio::time::Instant;

use crate::clock::Clock;
use crate::types::ImageCacheStats;

/// Default image lifetime: 6 hours.
pub const DEFAULT_IMAGE_TTL: Duration = Duration::from_secs(6 * 3600);

/// Content type assumed when the remote host sends none.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// A cached image.
#[derive(Debug, Clone)]
pub struct ImageCacheEntry {
    pub content: Bytes,
    pub content_type: String,
    pub cached_at: Instant,
    pub hits: u64,
}

/// Concurrent URL → image map.
pub struct ImageCache {
    entries: DashMap<String, ImageCacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ImageCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            clock,
        }
    }

    /// Return a fresh entry and count the hit.
    ///
    /// The hit counter is incremented under the entry's shard lock, so
    /// concurrent hits on the same URL are never lost.
    pub fn get_fresh(&self, url: &str) -> Option<ImageCacheEntry> {
        let now = self.clock.now();
        let mut entry = self.entries.get_mut(url)?;
        if now.saturating_duration_since(entry.cached_at) >= self.ttl {
            return None;
        }
        entry.hits += 1;
        Some(entry.clone())
    }

    /// Store a freshly fetched image with a zero hit count.
    pub fn insert(&self, url: impl Into<String>, content: Bytes, content_type: impl Into<String>) {
        let entry = ImageCacheEntry {
            content,
            content_type: content_type.into(),
            cached_at: self.clock.now(),
            hits: 0,
        };
        self.entries.insert(url.into(), entry);
    }

    /// Inspect an entry without counting a hit or checking freshness.
    pub fn peek(&self, url: &str) -> Option<ImageCacheEntry> {
        self.entries.get(url).map(|e| e.clone())
    }

    /// Aggregate count, size and hits over all entries.
    pub fn stats(&self) -> ImageCacheStats {
        self.entries
            .iter()
            .fold(ImageCacheStats::default(), |mut acc, e| {
                acc.count += 1;
                acc.total_bytes += e.content.len() as u64;
                acc.total_hits += e.hits;
                acc
            })
    }

    /// Lifetime of an entry.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.entries.clear();
    }
}
