//! HTTP routes.
//!
//! Thin glue over [`ContentGateway`]: each JSON route maps to one upstream
//! endpoint and cache class and returns the upstream body unmodified. When
//! the gateway gives up it returns an `{"status": "error"}` payload, which
//! is served with HTTP 200 like any other body.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header::{self, HeaderMap, HeaderValue};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};

use super::notifications::NotificationStore;
use crate::cache::DEFAULT_CONTENT_TYPE;
use crate::types::{CacheClass, FetchedImage};
use crate::{ContentGateway, KitsuneError};

/// Notifications returned by `GET /api/notifications`.
const RECENT_NOTIFICATIONS: usize = 10;

/// Browser cache lifetime advertised for proxied images.
const IMAGE_CACHE_CONTROL: &str = "public, max-age=86400";

/// Shared state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: Arc<dyn ContentGateway>,
    pub notifications: Arc<NotificationStore>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn ContentGateway>) -> Self {
        Self {
            gateway,
            notifications: Arc::new(NotificationStore::new()),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/home", get(home))
        .route("/api/schedule", get(schedule))
        .route("/api/all-anime", get(all_anime))
        .route("/api/genres", get(genres))
        .route("/api/anime/{id}", get(anime))
        .route("/api/episode/{id}", get(episode))
        .route("/api/genre/{id}", get(genre))
        .route("/api/server/{id}", get(server))
        .route("/api/batch/{slug}", get(batch))
        .route("/api/search/{keyword}", get(search))
        .route("/ongoing", get(ongoing))
        .route("/completed", get(completed))
        .route("/api/proxy-image", get(proxy_image).options(proxy_image_preflight))
        .route("/api/image-cache/stats", get(image_cache_stats))
        .route("/api/image-cache/clear", post(clear_image_cache))
        .route("/api/notifications", get(notifications))
        .route("/api/notifications/clear", post(clear_notifications))
        .with_state(state)
}

async fn passthrough(state: &AppState, endpoint: &str, class: CacheClass) -> Json<Value> {
    Json(state.gateway.fetch_json(endpoint, class).await)
}

// ===== Fixed endpoints =====

async fn home(State(state): State<AppState>) -> Json<Value> {
    passthrough(&state, "/anime/home", CacheClass::Home).await
}

async fn schedule(State(state): State<AppState>) -> Json<Value> {
    passthrough(&state, "/anime/schedule", CacheClass::Schedule).await
}

async fn all_anime(State(state): State<AppState>) -> Json<Value> {
    passthrough(&state, "/anime/unlimited", CacheClass::Unlimited).await
}

async fn genres(State(state): State<AppState>) -> Json<Value> {
    passthrough(&state, "/anime/genre", CacheClass::Genre).await
}

// ===== Parameterised endpoints =====

async fn anime(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    passthrough(&state, &format!("/anime/anime/{id}"), CacheClass::Anime).await
}

async fn episode(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    passthrough(&state, &format!("/anime/episode/{id}"), CacheClass::Episode).await
}

async fn genre(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    passthrough(&state, &format!("/anime/genre/{id}"), CacheClass::Genre).await
}

async fn server(State(state): State<AppState>, Path(id): Path<String>) -> Json<Value> {
    passthrough(&state, &format!("/anime/server/{id}"), CacheClass::Server).await
}

async fn batch(State(state): State<AppState>, Path(slug): Path<String>) -> Json<Value> {
    passthrough(&state, &format!("/anime/batch/{slug}"), CacheClass::Batch).await
}

async fn search(State(state): State<AppState>, Path(keyword): Path<String>) -> Response {
    if keyword.trim().is_empty() {
        let body = json!({ "status": "error", "message": "search keyword required" });
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }
    passthrough(&state, &format!("/anime/search/{keyword}"), CacheClass::Search)
        .await
        .into_response()
}

// ===== Paginated endpoints =====

#[derive(Debug, Deserialize)]
struct PageQuery {
    page: Option<String>,
}

impl PageQuery {
    /// Page number; missing or non-numeric input falls back to 1.
    fn page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1)
    }
}

async fn ongoing(State(state): State<AppState>, Query(q): Query<PageQuery>) -> Json<Value> {
    let endpoint = format!("/anime/ongoing-anime?page={}", q.page());
    passthrough(&state, &endpoint, CacheClass::Ongoing).await
}

async fn completed(State(state): State<AppState>, Query(q): Query<PageQuery>) -> Json<Value> {
    let endpoint = format!("/anime/complete-anime?page={}", q.page());
    passthrough(&state, &endpoint, CacheClass::Completed).await
}

// ===== Image proxy =====

#[derive(Debug, Deserialize)]
struct ImageQuery {
    url: Option<String>,
}

async fn proxy_image(State(state): State<AppState>, Query(q): Query<ImageQuery>) -> Response {
    let Some(url) = q.url.filter(|u| !u.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "URL parameter required".into());
    };

    match state.gateway.fetch_image(&url).await {
        Ok(image) => image_response(image),
        Err(KitsuneError::Timeout(_)) => {
            error_response(StatusCode::GATEWAY_TIMEOUT, "Request timeout".into())
        }
        Err(KitsuneError::Fetch(msg)) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to fetch image: {msg}"),
        ),
        Err(e) => error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Internal error: {e}"),
        ),
    }
}

fn image_response(image: FetchedImage) -> Response {
    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&image.content_type)
        .unwrap_or(HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(header::CONTENT_TYPE, content_type);
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert("x-cache-status", HeaderValue::from_static(image.status.as_str()));
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static(IMAGE_CACHE_CONTROL));
    (headers, image.content).into_response()
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn proxy_image_preflight() -> impl IntoResponse {
    [
        (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
        (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, OPTIONS"),
        (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
    ]
}

async fn image_cache_stats(State(state): State<AppState>) -> Json<Value> {
    let stats = state.gateway.image_stats();
    Json(json!({
        "status": "success",
        "data": {
            "total_cached_images": stats.count,
            "total_size_mb": stats.total_size_mb(),
            "total_hits": stats.total_hits,
            "cache_duration_hours": state.gateway.image_ttl().as_secs() / 3600,
        }
    }))
}

async fn clear_image_cache(State(state): State<AppState>) -> Json<Value> {
    state.gateway.clear_images();
    Json(json!({ "status": "success", "message": "Image cache cleared" }))
}

// ===== Notifications =====

async fn notifications(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "success",
        "data": {
            "notifications": state.notifications.recent(RECENT_NOTIFICATIONS),
            "unread_count": 0,
        }
    }))
}

async fn clear_notifications(State(state): State<AppState>) -> Json<Value> {
    state.notifications.clear();
    Json(json!({ "status": "success" }))
}
