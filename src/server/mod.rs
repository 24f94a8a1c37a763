//! HTTP server: routes, notification list and daemon configuration.
//!
//! This module provides:
//! - The axum router over a [`ContentGateway`](crate::ContentGateway) (`routes`)
//! - The in-memory notification list (`notifications`)
//! - Configuration types for `kitsuned` (`config`)

pub mod config;
pub mod notifications;
pub mod routes;

pub use notifications::{Notification, NotificationStore};
pub use routes::{AppState, router};
