//! Sliding-window limiter for outbound upstream calls.
//!
//! Keeps the timestamps of recently admitted calls. [`RateLimiter::acquire`]
//! prunes everything older than the window, and when the window is full it
//! sleeps until the oldest call has aged out before admitting the caller.
//!
//! # Scheduling
//!
//! The window lock is held across the sleep. Waiters are therefore admitted
//! one at a time in lock order, which is conservative but keeps the cap
//! trivially correct: at most `max_requests` timestamps are ever retained.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::warn;

use crate::clock::Clock;
use crate::telemetry;

/// Pruning is strict (`age > window`), so a zero wait at the window edge
/// would spin.
const MIN_WAIT: Duration = Duration::from_millis(1);

/// Limiter configuration.
///
/// ```rust
/// # use kitsune::upstream::RateLimiterConfig;
/// # use std::time::Duration;
/// let config = RateLimiterConfig::new().max_requests(30);
/// assert_eq!(config.window, Duration::from_secs(60));
/// ```
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Calls admitted per window. Default: 55 (the upstream allows 70).
    pub max_requests: usize,
    /// Length of the trailing window. Default: 60s.
    pub window: Duration,
    /// Extra wait added past the moment the oldest call leaves the window.
    /// Default: 1s.
    pub padding: Duration,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_requests: 55,
            window: Duration::from_secs(60),
            padding: Duration::from_secs(1),
        }
    }
}

impl RateLimiterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of calls admitted per window.
    pub fn max_requests(mut self, n: usize) -> Self {
        self.max_requests = n;
        self
    }

    /// Set the window length.
    pub fn window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Set the extra wait past the window edge.
    pub fn padding(mut self, padding: Duration) -> Self {
        self.padding = padding;
        self
    }
}

/// Sliding-window rate limiter shared by every upstream fetch.
pub struct RateLimiter {
    config: RateLimiterConfig,
    window: Mutex<VecDeque<Instant>>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(config: RateLimiterConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            window: Mutex::new(VecDeque::with_capacity(config.max_requests)),
            config,
            clock,
        }
    }

    /// Wait until a call may be made, then record it.
    pub async fn acquire(&self) {
        let mut window = self.window.lock().await;
        loop {
            let now = self.clock.now();
            prune(&mut window, now, self.config.window);

            if window.len() < self.config.max_requests.max(1) {
                window.push_back(now);
                return;
            }

            let oldest = window.front().copied().unwrap_or(now);
            let wait = (self.config.window + self.config.padding)
                .saturating_sub(now.saturating_duration_since(oldest))
                .max(MIN_WAIT);
            warn!(
                wait_ms = wait.as_millis() as u64,
                in_window = window.len(),
                "rate limit hit, waiting"
            );
            metrics::counter!(telemetry::RATE_LIMIT_WAITS_TOTAL).increment(1);
            self.clock.sleep(wait).await;
        }
    }

    /// Number of timestamps currently retained (pruning is lazy).
    pub async fn window_len(&self) -> usize {
        self.window.lock().await.len()
    }

    pub fn config(&self) -> &RateLimiterConfig {
        &self.config
    }
}

/// Drop timestamps more than `window` old.
fn prune(window: &mut VecDeque<Instant>, now: Instant, span: Duration) {
    while let Some(&t) = window.front() {
        if now.saturating_duration_since(t) > span {
            window.pop_front();
        } else {
            break;
        }
    }
}
