//! reqwest client for the upstream anime API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde_json::Value;

use super::traits::Upstream;
use crate::{KitsuneError, Result};

/// Default upstream base URL.
pub const DEFAULT_BASE_URL: &str = "https://www.sankavollerei.com";

/// Per-request timeout for JSON fetches.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Client for the upstream API.
///
/// Sends the header set of a desktop browser; the upstream rejects bare
/// clients more eagerly.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Client for [`DEFAULT_BASE_URL`] with the default timeout.
    pub fn new() -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, DEFAULT_TIMEOUT)
    }

    /// Client for a custom base URL (for testing with wiremock).
    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .default_headers(default_headers(&base_url)?)
            .build()
            .map_err(|e| KitsuneError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn default_headers(base_url: &str) -> Result<HeaderMap> {
    let origin = HeaderValue::from_str(base_url)
        .map_err(|e| KitsuneError::Configuration(format!("invalid base URL {base_url:?}: {e}")))?;
    let referer = HeaderValue::from_str(&format!("{base_url}/"))
        .map_err(|e| KitsuneError::Configuration(format!("invalid base URL {base_url:?}: {e}")))?;

    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static("application/json, text/plain, */*"),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("id-ID,id;q=0.9,en-US;q=0.8,en;q=0.7"),
    );
    headers.insert(header::REFERER, referer);
    headers.insert(header::ORIGIN, origin);
    Ok(headers)
}

#[async_trait]
impl Upstream for ApiClient {
    fn name(&self) -> &str {
        "api"
    }

    async fn get_json(&self, endpoint: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, endpoint);

        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return Err(KitsuneError::from_status(
                status.as_u16(),
                format!("{reason} for url ({url})"),
            ));
        }

        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}
