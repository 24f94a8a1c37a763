//! Gateway implementations

mod builder;
pub mod fetcher;
pub mod image;

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

pub use builder::{Kitsune, KitsuneBuilder};
pub use fetcher::Fetcher;
pub use image::ImageProxy;

use crate::types::{CacheClass, FetchedImage, ImageCacheStats};
use crate::{ContentGateway, Result};

/// The assembled service: JSON pipeline plus image proxy.
///
/// Built once at startup via [`Kitsune::builder()`] and shared (behind an
/// `Arc`) by every request handler.
pub struct KitsuneGateway {
    fetcher: Fetcher,
    images: ImageProxy,
}

impl KitsuneGateway {
    pub(crate) fn new(fetcher: Fetcher, images: ImageProxy) -> Self {
        Self { fetcher, images }
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    pub fn images(&self) -> &ImageProxy {
        &self.images
    }
}

#[async_trait]
impl ContentGateway for KitsuneGateway {
    async fn fetch_json(&self, endpoint: &str, class: CacheClass) -> Value {
        self.fetcher.fetch_json(endpoint, class).await
    }

    async fn fetch_image(&self, url: &str) -> Result<FetchedImage> {
        self.images.fetch_image(url).await
    }

    fn image_stats(&self) -> ImageCacheStats {
        self.images.stats()
    }

    fn image_ttl(&self) -> Duration {
        self.images.cache().ttl()
    }

    fn clear_images(&self) {
        self.images.clear();
    }
}
