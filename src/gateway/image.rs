//! Fetch-once, serve-many image proxy.
//!
//! Images come from arbitrary third-party hosts, not the upstream API, so
//! they use their own HTTP client and bypass the rate limiter and retry
//! policy entirely. Only successful fetches are cached.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Url, header};
use tracing::{debug, info, warn};

use crate::cache::{DEFAULT_CONTENT_TYPE, ImageCache};
use crate::telemetry;
use crate::types::{CacheStatus, FetchedImage, ImageCacheStats};
use crate::{KitsuneError, Result};

/// Per-request timeout for image fetches.
pub const DEFAULT_IMAGE_TIMEOUT: Duration = Duration::from_secs(10);

const IMAGE_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Image proxy with its own URL-keyed cache.
pub struct ImageProxy {
    http: Client,
    cache: Arc<ImageCache>,
}

impl ImageProxy {
    pub fn new(cache: Arc<ImageCache>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(IMAGE_USER_AGENT)
            .build()
            .map_err(|e| KitsuneError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, cache })
    }

    /// Serve `url` from cache, or fetch and cache it.
    ///
    /// Errors: [`KitsuneError::Timeout`] when the host is too slow,
    /// [`KitsuneError::Fetch`] for request or status failures, and
    /// [`KitsuneError::Internal`] for anything else (e.g. an invalid URL).
    pub async fn fetch_image(&self, url: &str) -> Result<FetchedImage> {
        if let Some(entry) = self.cache.get_fresh(url) {
            debug!(url, hits = entry.hits, "image cache hit");
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "cache" => "image").increment(1);
            return Ok(FetchedImage {
                content: entry.content,
                content_type: entry.content_type,
                status: CacheStatus::Hit,
            });
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "cache" => "image").increment(1);

        let parsed = Url::parse(url)
            .map_err(|e| KitsuneError::Internal(format!("invalid image URL {url:?}: {e}")))?;

        info!(url, "fetching image");
        let response = self
            .http
            .get(parsed)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(classify)?;

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        let content = response.bytes().await.map_err(classify)?;

        self.cache
            .insert(url, content.clone(), content_type.clone());

        Ok(FetchedImage {
            content,
            content_type,
            status: CacheStatus::Miss,
        })
    }

    /// Aggregate statistics over the image cache.
    pub fn stats(&self) -> ImageCacheStats {
        self.cache.stats()
    }

    /// Drop every cached image.
    pub fn clear(&self) {
        self.cache.clear();
        info!("image cache cleared");
    }

    pub fn cache(&self) -> &Arc<ImageCache> {
        &self.cache
    }
}

fn classify(err: reqwest::Error) -> KitsuneError {
    if err.is_timeout() {
        warn!(error = %err, "image fetch timed out");
        KitsuneError::Timeout(err.to_string())
    } else {
        warn!(error = %err, "image fetch failed");
        KitsuneError::Fetch(err.to_string())
    }
}
