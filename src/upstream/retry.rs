//! Retry budget and backoff schedule for upstream fetches.
//!
//! Two kinds of failure back off differently:
//!
//! - rate-limit rejections (HTTP 403/429) wait `(attempt + 1) * rate_limit_step`,
//!   i.e. 6s, 12s, 18s with defaults, including after the final attempt;
//! - everything else waits a flat `transient_delay` (3s), except after the
//!   final attempt.
//!
//! Both share one attempt budget.

use std::time::Duration;

use crate::KitsuneError;

/// Configuration for retry behaviour.
///
/// ```rust
/// # use kitsune::RetryPolicy;
/// # use std::time::Duration;
/// let policy = RetryPolicy::new()
///     .max_attempts(3)
///     .transient_delay(Duration::from_millis(10))
///     .rate_limit_step(Duration::from_millis(20));
/// assert_eq!(policy.rate_limit_delay(1), Duration::from_millis(40));
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of attempts (including the initial request).
    /// 1 = no retry. Default: 3.
    pub max_attempts: u32,
    /// Flat delay after a transient failure. Default: 3s.
    pub transient_delay: Duration,
    /// Unit of the escalating rate-limit backoff. Default: 6s.
    pub rate_limit_step: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            transient_delay: Duration::from_secs(3),
            rate_limit_step: Duration::from_secs(6),
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single attempt, no backoff.
    pub fn disabled() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    /// Set maximum attempts (including the initial request).
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n;
        self
    }

    /// Set the flat delay used after transient failures.
    pub fn transient_delay(mut self, delay: Duration) -> Self {
        self.transient_delay = delay;
        self
    }

    /// Set the unit of the escalating rate-limit backoff.
    pub fn rate_limit_step(mut self, step: Duration) -> Self {
        self.rate_limit_step = step;
        self
    }

    /// Backoff after a rate-limit rejection on `attempt` (0-indexed).
    pub fn rate_limit_delay(&self, attempt: u32) -> Duration {
        self.rate_limit_step.saturating_mul(attempt.saturating_add(1))
    }

    /// Delay to wait after `err` on `attempt` (0-indexed), or `None` when
    /// the pipeline should move on without sleeping.
    pub fn delay_after(&self, attempt: u32, err: &KitsuneError) -> Option<Duration> {
        if err.is_rate_limited() {
            Some(self.rate_limit_delay(attempt))
        } else if attempt + 1 < self.max_attempts {
            Some(self.transient_delay)
        } else {
            None
        }
    }
}
