//! Transport trait for the upstream API.
//!
//! The fetch pipeline only needs "GET this endpoint and parse the JSON
//! body". Keeping that behind a trait lets the pipeline be exercised with
//! scripted responses:
//!
//! ```ignore
//! struct AlwaysDown;
//!
//! #[async_trait]
//! impl Upstream for AlwaysDown {
//!     fn name(&self) -> &str { "down" }
//!     async fn get_json(&self, _endpoint: &str) -> Result<Value> {
//!         Err(KitsuneError::Http("connection refused".into()))
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::Result;

/// A JSON source addressed by endpoint path (query string included).
///
/// Implementations must map HTTP 403/429 to
/// [`KitsuneError::RateLimited`](crate::KitsuneError::RateLimited), other
/// non-2xx statuses to [`KitsuneError::Api`](crate::KitsuneError::Api), and
/// unparsable bodies to an error; the pipeline chooses its backoff from
/// that classification.
#[async_trait]
pub trait Upstream: Send + Sync {
    /// Name for logging/debugging.
    fn name(&self) -> &str;

    /// Perform one GET of `endpoint` and parse the body as JSON.
    async fn get_json(&self, endpoint: &str) -> Result<Value>;
}
