//! Resilient JSON fetch pipeline.
//!
//! [`Fetcher::fetch_json`] composes the response cache, the rate limiter
//! and an [`Upstream`] transport:
//!
//! 1. a fresh cache entry is returned without touching the limiter or the
//!    network;
//! 2. on a miss the limiter is acquired once, then the upstream is tried up
//!    to `max_attempts` times with the backoff from [`RetryPolicy`];
//! 3. a success is cached and returned immediately;
//! 4. when every attempt fails, the expired entry for the same key is
//!    served if one exists, otherwise an `{"status": "error", ...}` payload.
//!
//! The pipeline never returns an error: callers always get JSON.
//!
//! Concurrent cold fetches of the same key are not coalesced; each caller
//! goes upstream.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{ResponseCache, cache_key};
use crate::clock::Clock;
use crate::telemetry;
use crate::types::{CacheClass, error_payload};
use crate::upstream::{RateLimiter, RetryPolicy, Upstream};
use crate::{KitsuneError, Result};

/// Cache + rate limit + retry wrapper around an [`Upstream`].
pub struct Fetcher {
    upstream: Arc<dyn Upstream>,
    cache: Arc<ResponseCache>,
    limiter: Arc<RateLimiter>,
    retry: RetryPolicy,
    clock: Arc<dyn Clock>,
}

impl Fetcher {
    pub fn new(
        upstream: Arc<dyn Upstream>,
        cache: Arc<ResponseCache>,
        limiter: Arc<RateLimiter>,
        retry: RetryPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            upstream,
            cache,
            limiter,
            retry,
            clock,
        }
    }

    /// Fetch JSON for `endpoint` (path plus optional query string).
    pub async fn fetch_json(&self, endpoint: &str, class: CacheClass) -> Value {
        let key = cache_key(class, endpoint);

        if let Some(value) = self.cache.get(&key, class) {
            debug!(endpoint, %class, "cache hit");
            metrics::counter!(telemetry::CACHE_HITS_TOTAL, "cache" => "json").increment(1);
            return value;
        }
        metrics::counter!(telemetry::CACHE_MISSES_TOTAL, "cache" => "json").increment(1);
        info!(endpoint, %class, upstream = self.upstream.name(), "upstream request");

        self.limiter.acquire().await;

        let err = match self.fetch_with_retry(endpoint).await {
            Ok(value) => {
                self.cache.put(key, class, value.clone());
                return value;
            }
            Err(e) => e,
        };

        if let Some(stale) = self.cache.get_stale(&key) {
            warn!(endpoint, %class, error = %err, "serving stale cache");
            metrics::counter!(telemetry::STALE_FALLBACKS_TOTAL).increment(1);
            return stale;
        }

        warn!(endpoint, %class, error = %err, "upstream unavailable, no cached copy");
        error_payload(err.to_string())
    }

    /// Run the attempt loop, returning the last error once the budget is spent.
    async fn fetch_with_retry(&self, endpoint: &str) -> Result<Value> {
        let attempts = self.retry.max_attempts.max(1);
        let mut last_err = None;

        for attempt in 0..attempts {
            match self.upstream.get_json(endpoint).await {
                Ok(value) => {
                    metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "status" => "ok")
                        .increment(1);
                    return Ok(value);
                }
                Err(e) => {
                    metrics::counter!(telemetry::UPSTREAM_REQUESTS_TOTAL, "status" => "error")
                        .increment(1);
                    if let Some(delay) = self.retry.delay_after(attempt, &e) {
                        let reason = if e.is_rate_limited() {
                            "rate_limited"
                        } else {
                            "transient"
                        };
                        metrics::counter!(telemetry::RETRIES_TOTAL, "reason" => reason)
                            .increment(1);
                        warn!(
                            endpoint,
                            attempt = attempt + 1,
                            max_attempts = attempts,
                            delay_ms = delay.as_millis() as u64,
                            error = %e,
                            "upstream attempt failed, backing off"
                        );
                        self.clock.sleep(delay).await;
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| KitsuneError::Internal("no attempt made".into())))
    }

    /// The response cache backing this fetcher.
    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    /// The rate limiter guarding the upstream.
    pub fn limiter(&self) -> &Arc<RateLimiter> {
        &self.limiter
    }
}
