//! Shared test doubles: a scripted upstream and a gateway wired to it.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use kitsune::cache::ResponseCache;
use kitsune::clock::ManualClock;
use kitsune::gateway::Fetcher;
use kitsune::upstream::{RateLimiter, RateLimiterConfig, RetryPolicy, Upstream};
use kitsune::{KitsuneError, Result};

/// One scripted upstream answer.
#[derive(Debug, Clone)]
pub enum Outcome {
    Json(Value),
    Status(u16),
    Transport(&'static str),
    Malformed,
}

impl Outcome {
    fn into_result(self) -> Result<Value> {
        match self {
            Outcome::Json(v) => Ok(v),
            Outcome::Status(s) => Err(KitsuneError::from_status(s, "scripted")),
            Outcome::Transport(msg) => Err(KitsuneError::Http(msg.to_string())),
            Outcome::Malformed => {
                let err = serde_json::from_str::<Value>("<html>").unwrap_err();
                Err(KitsuneError::Json(err))
            }
        }
    }
}

/// Upstream that replays a script, then repeats `fallback` forever.
pub struct ScriptedUpstream {
    script: Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    calls: AtomicU32,
    endpoints: Mutex<Vec<String>>,
}

impl ScriptedUpstream {
    pub fn new(script: Vec<Outcome>, fallback: Outcome) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback,
            calls: AtomicU32::new(0),
            endpoints: Mutex::new(Vec::new()),
        }
    }

    pub fn always(outcome: Outcome) -> Self {
        Self::new(vec![], outcome)
    }

    /// Queue more answers ahead of the fallback.
    pub fn push(&self, outcome: Outcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::Relaxed)
    }

    pub fn endpoints(&self) -> Vec<String> {
        self.endpoints.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for ScriptedUpstream {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.endpoints.lock().unwrap().push(endpoint.to_string());
        let next = self.script.lock().unwrap().pop_front();
        next.unwrap_or_else(|| self.fallback.clone()).into_result()
    }
}

/// A fetcher on virtual time with default limits and backoff.
pub struct Harness {
    pub fetcher: Fetcher,
    pub upstream: Arc<ScriptedUpstream>,
    pub clock: Arc<ManualClock>,
    pub cache: Arc<ResponseCache>,
    pub limiter: Arc<RateLimiter>,
}

impl Harness {
    pub fn new(upstream: ScriptedUpstream) -> Self {
        Self::with_retry(upstream, RetryPolicy::default())
    }

    pub fn with_retry(upstream: ScriptedUpstream, retry: RetryPolicy) -> Self {
        let clock = Arc::new(ManualClock::new());
        let upstream = Arc::new(upstream);
        let cache = Arc::new(ResponseCache::new(clock.clone()));
        let limiter = Arc::new(RateLimiter::new(RateLimiterConfig::default(), clock.clone()));
        let fetcher = Fetcher::new(
            upstream.clone(),
            cache.clone(),
            limiter.clone(),
            retry,
            clock.clone(),
        );
        Self {
            fetcher,
            upstream,
            clock,
            cache,
            limiter,
        }
    }
}
