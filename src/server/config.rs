//! Configuration loading for kitsuned.
//!
//! Configuration is loaded from TOML files with the following resolution order:
//! 1. `--config <path>` (CLI flag, must exist)
//! 2. `~/.kitsune/config.toml` (user)
//! 3. `/etc/kitsune/config.toml` (system)
//! 4. built-in defaults
//!
//! Every field has a default, so an empty file is a valid configuration.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::gateway::KitsuneBuilder;
use crate::upstream::{DEFAULT_BASE_URL, RateLimiterConfig, RetryPolicy};
use crate::{Kitsune, KitsuneError, Result};

/// Daemon configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub retry: RetryConfig,
    #[serde(default)]
    pub images: ImagesConfig,
}

/// Server network configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to bind to (default: 127.0.0.1:8080).
    #[serde(default = "default_address")]
    pub address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
        }
    }
}

fn default_address() -> String {
    "127.0.0.1:8080".to_string()
}

/// Upstream API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds (default: 15).
    #[serde(default = "default_upstream_timeout")]
    pub timeout_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_upstream_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_upstream_timeout() -> u64 {
    15
}

/// Outbound rate limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Upstream calls per trailing minute (default: 55).
    #[serde(default = "default_max_rpm")]
    pub max_requests_per_minute: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_requests_per_minute: default_max_rpm(),
        }
    }
}

fn default_max_rpm() -> usize {
    55
}

/// Retry schedule.
#[derive(Debug, Clone, Deserialize)]
pub struct RetryConfig {
    /// Attempts including the first (default: 3).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Flat delay after transient failures (default: 3000).
    #[serde(default = "default_transient_delay_ms")]
    pub transient_delay_ms: u64,
    /// Step of the escalating 403/429 backoff (default: 6000).
    #[serde(default = "default_rate_limit_step_ms")]
    pub rate_limit_step_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            transient_delay_ms: default_transient_delay_ms(),
            rate_limit_step_ms: default_rate_limit_step_ms(),
        }
    }
}

fn default_max_attempts() -> u32 {
    3
}

fn default_transient_delay_ms() -> u64 {
    3000
}

fn default_rate_limit_step_ms() -> u64 {
    6000
}

impl From<RetryConfig> for RetryPolicy {
    fn from(c: RetryConfig) -> Self {
        RetryPolicy::new()
            .max_attempts(c.max_attempts)
            .transient_delay(Duration::from_millis(c.transient_delay_ms))
            .rate_limit_step(Duration::from_millis(c.rate_limit_step_ms))
    }
}

/// Image proxy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ImagesConfig {
    /// Cache lifetime in seconds (default: 21600, 6 hours).
    #[serde(default = "default_image_ttl")]
    pub ttl_secs: u64,
    /// Per-request timeout in seconds (default: 10).
    #[serde(default = "default_image_timeout")]
    pub timeout_secs: u64,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_image_ttl(),
            timeout_secs: default_image_timeout(),
        }
    }
}

fn default_image_ttl() -> u64 {
    6 * 3600
}

fn default_image_timeout() -> u64 {
    10
}

impl Config {
    /// Load configuration from the standard locations.
    ///
    /// Resolution order:
    /// 1. Explicit path (if provided; an error if missing)
    /// 2. `~/.kitsune/config.toml`
    /// 3. `/etc/kitsune/config.toml`
    /// 4. Defaults
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        match Self::resolve_config_path(explicit_path)? {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Parse a specific file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            KitsuneError::Configuration(format!("Failed to read config file {path:?}: {e}"))
        })?;
        toml::from_str(&content).map_err(|e| {
            KitsuneError::Configuration(format!("Failed to parse config file {path:?}: {e}"))
        })
    }

    /// Resolve the config file path; `None` means "use defaults".
    fn resolve_config_path(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            if path.exists() {
                return Ok(Some(path.to_path_buf()));
            }
            return Err(KitsuneError::Configuration(format!(
                "Config file not found: {path:?}"
            )));
        }

        // User config
        if let Some(home) = dirs::home_dir() {
            let user_config = home.join(".kitsune").join("config.toml");
            if user_config.exists() {
                return Ok(Some(user_config));
            }
        }

        // System config
        let system_config = PathBuf::from("/etc/kitsune/config.toml");
        if system_config.exists() {
            return Ok(Some(system_config));
        }

        Ok(None)
    }

    /// Gateway builder configured from this file.
    pub fn builder(&self) -> KitsuneBuilder {
        Kitsune::builder()
            .base_url(&self.upstream.base_url)
            .upstream_timeout(Duration::from_secs(self.upstream.timeout_secs))
            .rate_limiter(
                RateLimiterConfig::new().max_requests(self.limits.max_requests_per_minute),
            )
            .retry(self.retry.clone().into())
            .image_ttl(Duration::from_secs(self.images.ttl_secs))
            .image_timeout(Duration::from_secs(self.images.timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_expected_values() {
        let config = Config::default();
        assert_eq!(config.server.address, "127.0.0.1:8080");
        assert_eq!(config.upstream.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.upstream.timeout_secs, 15);
        assert_eq!(config.limits.max_requests_per_minute, 55);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.images.ttl_secs, 21600);
    }

    #[test]
    fn parse_minimal_config() {
        let toml = r#"
            [server]
            address = "0.0.0.0:8080"
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.server.address, "0.0.0.0:8080");
        // Defaults preserved
        assert_eq!(config.limits.max_requests_per_minute, 55);
        assert_eq!(config.retry.rate_limit_step_ms, 6000);
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
            [server]
            address = "127.0.0.1:3000"

            [upstream]
            base_url = "http://localhost:9000"
            timeout_secs = 5

            [limits]
            max_requests_per_minute = 20

            [retry]
            max_attempts = 5
            transient_delay_ms = 100
            rate_limit_step_ms = 200

            [images]
            ttl_secs = 60
            timeout_secs = 2
        "#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.upstream.base_url, "http://localhost:9000");
        assert_eq!(config.limits.max_requests_per_minute, 20);
        assert_eq!(config.images.timeout_secs, 2);

        let policy: RetryPolicy = config.retry.into();
        assert_eq!(policy.max_attempts, 5);
        assert_eq!(policy.transient_delay, Duration::from_millis(100));
        assert_eq!(policy.rate_limit_delay(1), Duration::from_millis(400));
    }

    #[test]
    fn config_not_found_returns_error() {
        let result = Config::load(Some(Path::new("/nonexistent/config.toml")));
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("Config file not found"));
    }
}
