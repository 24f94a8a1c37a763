//! Kitsune - caching, rate-limited proxy for an anime content API
//!
//! This crate sits between a web front end and a rate-limit-sensitive
//! third-party anime API. It provides two contracts through the
//! [`ContentGateway`] trait:
//!
//! - **JSON fetch**: `fetch_json(endpoint, class)` serves from a per-class
//!   TTL cache, otherwise calls upstream behind a sliding-window rate
//!   limiter with bounded retries, falling back to stale data or an
//!   `{"status": "error"}` payload. It never fails.
//! - **Image proxy**: `fetch_image(url)` serves remote images from an
//!   in-memory cache keyed by URL, fetching each at most once per 6 hours.
//!
//! # Example
//!
//! ```rust,no_run
//! use kitsune::{CacheClass, ContentGateway, Kitsune};
//!
//! #[tokio::main]
//! async fn main() -> kitsune::Result<()> {
//!     let gateway = Kitsune::builder().build()?;
//!
//!     let home = gateway.fetch_json("/anime/home", CacheClass::Home).await;
//!     println!("{home}");
//!
//!     let page2 = gateway
//!         .fetch_json("/anime/ongoing-anime?page=2", CacheClass::Ongoing)
//!         .await;
//!     println!("{page2}");
//!     Ok(())
//! }
//! ```
//!
//! The HTTP route layer and the `kitsuned` daemon live behind the `server`
//! feature (on by default).

pub mod cache;
pub mod clock;
pub mod error;
pub mod gateway;
#[cfg(feature = "server")]
pub mod server;
pub mod telemetry;
pub mod traits;
pub mod types;
pub mod upstream;
mod version;

// Re-export main types at crate root
pub use error::{KitsuneError, Result};
pub use gateway::{Kitsune, KitsuneBuilder, KitsuneGateway};
pub use traits::ContentGateway;
pub use upstream::{RateLimiterConfig, RetryPolicy};
pub use version::{PKG_VERSION, version_string};

pub use types::{CacheClass, CacheStatus, FetchedImage, ImageCacheStats};
