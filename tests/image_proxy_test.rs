//! Wiremock integration tests for the [`ImageProxy`].

use std::sync::Arc;
use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use kitsune::cache::{DEFAULT_IMAGE_TTL, ImageCache};
use kitsune::clock::ManualClock;
use kitsune::gateway::ImageProxy;
use kitsune::{CacheStatus, KitsuneError};

struct Setup {
    proxy: ImageProxy,
    clock: Arc<ManualClock>,
    server: MockServer,
}

async fn setup(timeout: Duration) -> Setup {
    let server = MockServer::start().await;
    let clock = Arc::new(ManualClock::new());
    let cache = Arc::new(ImageCache::new(DEFAULT_IMAGE_TTL, clock.clone()));
    let proxy = ImageProxy::new(cache, timeout).unwrap();
    Setup {
        proxy,
        clock,
        server,
    }
}

async fn mount_png(server: &MockServer, route: &str, body: &'static [u8]) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(body),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn miss_then_hit_counts_hits() {
    let s = setup(Duration::from_secs(5)).await;
    Mock::given(method("GET"))
        .and(path("/poster.png"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "image/png")
                .set_body_bytes(b"PNGDATA".to_vec()),
        )
        .expect(1)
        .mount(&s.server)
        .await;
    let url = format!("{}/poster.png", s.server.uri());

    let first = s.proxy.fetch_image(&url).await.unwrap();
    assert_eq!(first.status, CacheStatus::Miss);
    assert_eq!(first.content.as_ref(), b"PNGDATA");
    assert_eq!(first.content_type, "image/png");
    assert_eq!(s.proxy.cache().peek(&url).unwrap().hits, 0);

    let second = s.proxy.fetch_image(&url).await.unwrap();
    assert_eq!(second.status, CacheStatus::Hit);
    assert_eq!(second.content, first.content);
    assert_eq!(s.proxy.cache().peek(&url).unwrap().hits, 1);
}

#[tokio::test]
async fn sends_own_user_agent() {
    let s = setup(Duration::from_secs(5)).await;
    Mock::given(method("GET"))
        .and(path("/ua.jpg"))
        .and(header(
            "user-agent",
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"x".to_vec()))
        .expect(1)
        .mount(&s.server)
        .await;

    s.proxy
        .fetch_image(&format!("{}/ua.jpg", s.server.uri()))
        .await
        .unwrap();
}

#[tokio::test]
async fn missing_content_type_defaults_to_jpeg() {
    let s = setup(Duration::from_secs(5)).await;
    Mock::given(method("GET"))
        .and(path("/raw"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"JPEG".to_vec()))
        .mount(&s.server)
        .await;

    let image = s
        .proxy
        .fetch_image(&format!("{}/raw", s.server.uri()))
        .await
        .unwrap();
    assert_eq!(image.content_type, "image/jpeg");
}

#[tokio::test]
async fn expired_image_is_refetched() {
    let s = setup(Duration::from_secs(5)).await;
    Mock::given(method("GET"))
        .and(path("/cover.png"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"v".to_vec()))
        .expect(2)
        .mount(&s.server)
        .await;
    let url = format!("{}/cover.png", s.server.uri());

    s.proxy.fetch_image(&url).await.unwrap();
    s.clock.advance(DEFAULT_IMAGE_TTL - Duration::from_secs(1));
    assert_eq!(
        s.proxy.fetch_image(&url).await.unwrap().status,
        CacheStatus::Hit
    );

    s.clock.advance(Duration::from_secs(2));
    let again = s.proxy.fetch_image(&url).await.unwrap();
    assert_eq!(again.status, CacheStatus::Miss);
    // A refetch starts a new entry.
    assert_eq!(s.proxy.cache().peek(&url).unwrap().hits, 0);
}

#[tokio::test]
async fn not_found_is_fetch_error_and_not_cached() {
    let s = setup(Duration::from_secs(5)).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .expect(2)
        .mount(&s.server)
        .await;
    let url = format!("{}/gone.jpg", s.server.uri());

    let err = s.proxy.fetch_image(&url).await.unwrap_err();
    assert!(matches!(err, KitsuneError::Fetch(_)));
    assert_eq!(s.proxy.stats().count, 0);

    // No negative caching: the next request goes out again.
    assert!(s.proxy.fetch_image(&url).await.is_err());
}

#[tokio::test]
async fn slow_host_is_timeout() {
    let s = setup(Duration::from_millis(50)).await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"late".to_vec())
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&s.server)
        .await;

    let err = s
        .proxy
        .fetch_image(&format!("{}/slow.jpg", s.server.uri()))
        .await
        .unwrap_err();
    assert!(matches!(err, KitsuneError::Timeout(_)));
}

#[tokio::test]
async fn invalid_url_is_internal_error() {
    let s = setup(Duration::from_secs(5)).await;
    let err = s.proxy.fetch_image("not a url").await.unwrap_err();
    assert!(matches!(err, KitsuneError::Internal(_)));
}

#[tokio::test]
async fn stats_aggregate_and_clear() {
    let s = setup(Duration::from_secs(5)).await;
    mount_png(&s.server, "/a.png", b"12345").await;
    mount_png(&s.server, "/b.png", b"678").await;
    let a = format!("{}/a.png", s.server.uri());
    let b = format!("{}/b.png", s.server.uri());

    s.proxy.fetch_image(&a).await.unwrap();
    s.proxy.fetch_image(&b).await.unwrap();
    s.proxy.fetch_image(&a).await.unwrap();
    s.proxy.fetch_image(&a).await.unwrap();

    let stats = s.proxy.stats();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.total_bytes, 8);
    assert_eq!(stats.total_hits, 2);

    s.proxy.clear();
    assert_eq!(s.proxy.stats().count, 0);
    assert_eq!(
        s.proxy.fetch_image(&a).await.unwrap().status,
        CacheStatus::Miss
    );
}
