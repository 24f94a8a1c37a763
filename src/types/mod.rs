//! Public types for the Kitsune API.

mod class;
mod image;
mod payload;

pub use class::CacheClass;
pub use image::{CacheStatus, FetchedImage, ImageCacheStats};
pub use payload::error_payload;
