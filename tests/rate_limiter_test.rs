//! Tests for the sliding-window [`RateLimiter`].

use std::sync::Arc;
use std::time::Duration;

use kitsune::clock::{Clock, ManualClock};
use kitsune::upstream::{RateLimiter, RateLimiterConfig};

fn limiter(config: RateLimiterConfig) -> (Arc<RateLimiter>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    (Arc::new(RateLimiter::new(config, clock.clone())), clock)
}

#[tokio::test]
async fn under_limit_never_waits() {
    let (limiter, clock) = limiter(RateLimiterConfig::default());
    for _ in 0..55 {
        limiter.acquire().await;
    }
    assert!(clock.sleeps().is_empty());
    assert_eq!(limiter.window_len().await, 55);
}

#[tokio::test]
async fn fifty_sixth_call_waits_for_window() {
    let (limiter, clock) = limiter(RateLimiterConfig::default());
    for _ in 0..56 {
        limiter.acquire().await;
        assert!(limiter.window_len().await <= 55);
    }

    assert_eq!(clock.sleeps(), vec![Duration::from_secs(61)]);
    // The first 55 aged out during the wait.
    assert_eq!(limiter.window_len().await, 1);
}

#[tokio::test]
async fn wait_accounts_for_elapsed_time() {
    let (limiter, clock) = limiter(RateLimiterConfig::default());
    for _ in 0..55 {
        limiter.acquire().await;
    }
    clock.advance(Duration::from_secs(30));

    limiter.acquire().await;

    assert_eq!(clock.sleeps(), vec![Duration::from_secs(31)]);
}

#[tokio::test]
async fn old_calls_are_pruned() {
    let (limiter, clock) = limiter(RateLimiterConfig::default());
    for _ in 0..55 {
        limiter.acquire().await;
    }
    clock.advance(Duration::from_secs(61));

    limiter.acquire().await;

    assert!(clock.sleeps().is_empty());
    assert_eq!(limiter.window_len().await, 1);
}

#[tokio::test]
async fn sliding_not_fixed_bucket() {
    let (limiter, clock) = limiter(RateLimiterConfig::new().max_requests(2));
    limiter.acquire().await; // t=0
    clock.advance(Duration::from_secs(40));
    limiter.acquire().await; // t=40
    clock.advance(Duration::from_secs(25));

    // t=65: the t=0 call has left the window, the t=40 one has not.
    limiter.acquire().await;
    assert!(clock.sleeps().is_empty());
    assert_eq!(limiter.window_len().await, 2);

    // Full again: wait until the t=40 call is out (61 - 25 = 36s).
    limiter.acquire().await;
    assert_eq!(clock.sleeps(), vec![Duration::from_secs(36)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_callers_respect_cap() {
    let (limiter, clock) = limiter(RateLimiterConfig::default());
    let start = clock.now();

    let mut handles = Vec::new();
    for _ in 0..60 {
        let limiter = Arc::clone(&limiter);
        handles.push(tokio::spawn(async move {
            limiter.acquire().await;
            limiter.window_len().await
        }));
    }
    for h in handles {
        let len = h.await.unwrap();
        assert!(len <= 55);
    }

    // Exactly one caller found the window full.
    assert_eq!(clock.sleeps().len(), 1);
    assert_eq!(clock.now() - start, Duration::from_secs(61));
    assert_eq!(limiter.window_len().await, 5);
}
