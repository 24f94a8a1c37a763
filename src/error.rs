//! Kitsune error types

/// Kitsune error types
#[derive(Debug, thiserror::Error)]
pub enum KitsuneError {
    // Upstream/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Upstream answered 403 or 429. Retried with an escalating backoff.
    #[error("rate limited by upstream ({status})")]
    RateLimited { status: u16 },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Image proxy errors
    #[error("request timeout: {0}")]
    Timeout(String),

    #[error("failed to fetch image: {0}")]
    Fetch(String),

    #[error("internal error: {0}")]
    Internal(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl KitsuneError {
    /// Whether this error calls for the long, escalating rate-limit backoff
    /// rather than the flat transient delay.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, KitsuneError::RateLimited { .. })
    }

    /// Classify a non-success HTTP status from the upstream API.
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        match status {
            403 | 429 => KitsuneError::RateLimited { status },
            _ => KitsuneError::Api {
                status,
                message: message.into(),
            },
        }
    }
}

impl From<reqwest::Error> for KitsuneError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            KitsuneError::Timeout(err.to_string())
        } else if let Some(status) = err.status() {
            KitsuneError::from_status(status.as_u16(), err.to_string())
        } else if err.is_decode() {
            KitsuneError::Http(format!("malformed body: {err}"))
        } else {
            KitsuneError::Http(err.to_string())
        }
    }
}

/// Result type alias for Kitsune operations
pub type Result<T> = std::result::Result<T, KitsuneError>;
