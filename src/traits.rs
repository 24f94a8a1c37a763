//! Core ContentGateway trait

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;
use crate::types::{CacheClass, FetchedImage, ImageCacheStats};

/// The two contracts the route layer depends on.
///
/// Implemented by [`KitsuneGateway`](crate::KitsuneGateway); route handlers
/// only see this trait.
#[async_trait]
pub trait ContentGateway: Send + Sync {
    /// JSON for a logical upstream resource. Never fails: exhausted
    /// retries yield stale data or an `{"status": "error"}` payload.
    async fn fetch_json(&self, endpoint: &str, class: CacheClass) -> Value;

    /// Bytes for a remote image, cached by URL.
    async fn fetch_image(&self, url: &str) -> Result<FetchedImage>;

    /// Aggregate image cache statistics.
    fn image_stats(&self) -> ImageCacheStats;

    /// Lifetime of a cached image.
    fn image_ttl(&self) -> Duration;

    /// Drop every cached image.
    fn clear_images(&self);
}
