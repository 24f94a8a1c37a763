//! Caching subsystem.
//!
//! Two independent, process-lifetime caches:
//!
//! - [`ResponseCache`]: upstream JSON keyed on `"{class}_{endpoint}"`,
//!   with per-[`CacheClass`](crate::CacheClass) freshness and a stale read
//!   path used when the upstream API is unavailable.
//!
//! - [`ImageCache`]: raw image bytes keyed on source URL, with a single
//!   lifetime (6 hours by default) and per-entry hit counters.
//!
//! Neither cache evicts proactively; both are emptied only by `clear()`.

pub mod image;
pub mod response;

pub use image::{DEFAULT_CONTENT_TYPE, DEFAULT_IMAGE_TTL, ImageCache, ImageCacheEntry};
pub use response::{CacheEntry, ResponseCache, cache_key};
