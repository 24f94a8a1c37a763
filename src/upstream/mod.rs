//! Everything that talks to the upstream anime API.
//!
//! - [`traits::Upstream`]: the transport seam the fetch pipeline calls.
//! - [`client::ApiClient`]: reqwest implementation with the browser-like
//!   header set the upstream expects.
//! - [`limiter::RateLimiter`]: sliding-window cap on outbound calls.
//! - [`retry::RetryPolicy`]: attempt budget and backoff durations.

pub mod client;
pub mod limiter;
pub mod retry;
pub mod traits;

pub use client::{ApiClient, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use limiter::{RateLimiter, RateLimiterConfig};
pub use retry::RetryPolicy;
pub use traits::Upstream;
