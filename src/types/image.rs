//! Image proxy result and statistics types.

use std::fmt;

use bytes::Bytes;
use serde::Serialize;

/// Whether an image was served from the cache or fetched remotely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    /// Header value for `X-Cache-Status`.
    pub fn as_str(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An image ready to be served.
#[derive(Debug, Clone)]
pub struct FetchedImage {
    pub content: Bytes,
    pub content_type: String,
    pub status: CacheStatus,
}

/// Aggregate over every entry in the image cache, expired ones included.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImageCacheStats {
    pub count: usize,
    pub total_bytes: u64,
    pub total_hits: u64,
}

impl ImageCacheStats {
    /// Total cached size in mebibytes, rounded to two decimals.
    pub fn total_size_mb(&self) -> f64 {
        let mb = self.total_bytes as f64 / (1024.0 * 1024.0);
        (mb * 100.0).round() / 100.0
    }
}
