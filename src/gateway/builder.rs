//! Builder for configuring gateway instances

use std::sync::Arc;
use std::time::Duration;

use super::{Fetcher, ImageProxy, KitsuneGateway};
use crate::Result;
use crate::cache::{DEFAULT_IMAGE_TTL, ImageCache, ResponseCache};
use crate::clock::{Clock, TokioClock};
use crate::gateway::image::DEFAULT_IMAGE_TIMEOUT;
use crate::upstream::{
    ApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, RateLimiter, RateLimiterConfig, RetryPolicy,
    Upstream,
};

/// Main entry point for creating gateway instances.
pub struct Kitsune;

impl Kitsune {
    /// Create a new builder for configuring the gateway.
    pub fn builder() -> KitsuneBuilder {
        KitsuneBuilder::new()
    }
}

/// Builder for configuring gateway instances.
///
/// ```rust
/// # use kitsune::{Kitsune, RetryPolicy};
/// # use std::time::Duration;
/// let gateway = Kitsune::builder()
///     .base_url("http://127.0.0.1:9000")
///     .max_requests_per_minute(30)
///     .retry(RetryPolicy::new().transient_delay(Duration::from_secs(1)))
///     .build()
///     .unwrap();
/// # drop(gateway);
/// ```
pub struct KitsuneBuilder {
    base_url: String,
    upstream_timeout: Duration,
    upstream: Option<Arc<dyn Upstream>>,
    limiter: RateLimiterConfig,
    retry: RetryPolicy,
    image_ttl: Duration,
    image_timeout: Duration,
    clock: Option<Arc<dyn Clock>>,
}

impl KitsuneBuilder {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            upstream_timeout: DEFAULT_TIMEOUT,
            upstream: None,
            limiter: RateLimiterConfig::default(),
            retry: RetryPolicy::default(),
            image_ttl: DEFAULT_IMAGE_TTL,
            image_timeout: DEFAULT_IMAGE_TIMEOUT,
            clock: None,
        }
    }

    /// Base URL of the upstream API.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Per-request timeout for upstream JSON fetches.
    pub fn upstream_timeout(mut self, timeout: Duration) -> Self {
        self.upstream_timeout = timeout;
        self
    }

    /// Use a custom transport instead of the reqwest [`ApiClient`].
    ///
    /// Overrides [`base_url`](Self::base_url) and
    /// [`upstream_timeout`](Self::upstream_timeout).
    pub fn upstream(mut self, upstream: Arc<dyn Upstream>) -> Self {
        self.upstream = Some(upstream);
        self
    }

    /// Outbound calls admitted per trailing minute.
    pub fn max_requests_per_minute(mut self, n: usize) -> Self {
        self.limiter.max_requests = n;
        self
    }

    /// Full rate limiter configuration.
    pub fn rate_limiter(mut self, config: RateLimiterConfig) -> Self {
        self.limiter = config;
        self
    }

    /// Retry budget and backoff schedule.
    pub fn retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Lifetime of cached images.
    pub fn image_ttl(mut self, ttl: Duration) -> Self {
        self.image_ttl = ttl;
        self
    }

    /// Per-request timeout for image fetches.
    pub fn image_timeout(mut self, timeout: Duration) -> Self {
        self.image_timeout = timeout;
        self
    }

    /// Time source shared by every component (default: tokio timer).
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Build the gateway.
    pub fn build(self) -> Result<KitsuneGateway> {
        let clock = self.clock.unwrap_or_else(|| Arc::new(TokioClock));

        let upstream = match self.upstream {
            Some(upstream) => upstream,
            None => Arc::new(ApiClient::with_base_url(
                self.base_url,
                self.upstream_timeout,
            )?),
        };

        let fetcher = Fetcher::new(
            upstream,
            Arc::new(ResponseCache::new(clock.clone())),
            Arc::new(RateLimiter::new(self.limiter, clock.clone())),
            self.retry,
            clock.clone(),
        );

        let images = ImageProxy::new(
            Arc::new(ImageCache::new(self.image_ttl, clock)),
            self.image_timeout,
        )?;

        Ok(KitsuneGateway::new(fetcher, images))
    }
}

impl Default for KitsuneBuilder {
    fn default() -> Self {
        Self::new()
    }
}
