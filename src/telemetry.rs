//! Telemetry metric name constants.
//!
//! Centralised metric names for kitsune operations. Consumers install
//! their own `metrics` recorder (e.g. prometheus, statsd); without a
//! recorder installed, all metric calls are no-ops.
//!
//! # Metric naming conventions
//!
//! All metrics are prefixed with `kitsune_`. Counters end in `_total`.
//!
//! # Common labels
//!
//! - `cache`: which cache answered: "json" or "image"
//! - `status`: outcome: "ok" or "error"
//! - `reason`: why a retry happened: "rate_limited" or "transient"

/// Total cache hits.
///
/// Labels: `cache`.
pub const CACHE_HITS_TOTAL: &str = "kitsune_cache_hits_total";

/// Total cache misses.
///
/// Labels: `cache`.
pub const CACHE_MISSES_TOTAL: &str = "kitsune_cache_misses_total";

/// Total upstream API attempts.
///
/// Labels: `status` ("ok" | "error").
pub const UPSTREAM_REQUESTS_TOTAL: &str = "kitsune_upstream_requests_total";

/// Total retry backoffs taken (not counting the initial request).
///
/// Labels: `reason`.
pub const RETRIES_TOTAL: &str = "kitsune_retries_total";

/// Total fetches answered from an expired cache entry after retries ran out.
pub const STALE_FALLBACKS_TOTAL: &str = "kitsune_stale_fallbacks_total";

/// Total times a caller had to wait for the rate window to open.
pub const RATE_LIMIT_WAITS_TOTAL: &str = "kitsune_rate_limit_waits_total";
