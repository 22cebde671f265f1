//! Client configuration
//!
//! `ClientConfig` holds every knob of the API client. It can be built in
//! code, or loaded from a YAML or JSON file; every field has a default.

use crate::cache::CacheConfig;
use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig, DEFAULT_REQUESTS_PER_MINUTE};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_API_ENDPOINT: &str = "https://www.boardgamegeek.com/xmlapi2";

/// Default cache URI
pub const DEFAULT_CACHE_URI: &str = "memory:///?ttl=3600";

// ============================================================================
// Client Config
// ============================================================================

/// Configuration of a [`BoardGameGeek`](crate::BoardGameGeek) client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the XML API
    pub api_endpoint: String,

    /// Talk plain HTTP instead of HTTPS
    pub disable_ssl: bool,

    /// Cache URI (`memory:///?ttl=..` or `file:///dir?ttl=..`), `None` disables caching
    pub cache: Option<String>,

    /// Per-attempt timeout in seconds
    pub timeout_seconds: u64,

    /// Total attempts per request
    pub retries: u32,

    /// Delay between attempts in seconds
    pub retry_delay_seconds: u64,

    /// Outbound request budget per minute
    pub requests_per_minute: u32,

    /// User agent sent with every request
    pub user_agent: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            disable_ssl: false,
            cache: Some(DEFAULT_CACHE_URI.to_string()),
            timeout_seconds: 15,
            retries: 3,
            retry_delay_seconds: 5,
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Load a config file; `.json` files are read as JSON, anything else as YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read config file {}: {e}", path.display()))
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parse a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check values that would make the client unusable
    pub fn validate(&self) -> Result<()> {
        if self.api_endpoint.trim().is_empty() {
            return Err(Error::config("api_endpoint must not be empty"));
        }
        url::Url::parse(&self.api_endpoint)?;
        if self.requests_per_minute == 0 {
            return Err(Error::config("requests_per_minute must be at least 1"));
        }
        if let Some(ref cache) = self.cache {
            CacheConfig::from_uri(cache)?;
        }
        Ok(())
    }

    /// Endpoint with the scheme forced to `http` when SSL is disabled
    pub fn endpoint(&self) -> String {
        let endpoint = self.api_endpoint.trim_end_matches('/');
        match (self.disable_ssl, endpoint.strip_prefix("https://")) {
            (true, Some(rest)) => format!("http://{rest}"),
            _ => endpoint.to_string(),
        }
    }

    /// Parsed cache configuration
    pub fn cache_config(&self) -> Result<Option<CacheConfig>> {
        self.cache.as_deref().map(CacheConfig::from_uri).transpose()
    }

    /// Transport configuration derived from this config
    pub fn http_config(&self) -> Result<HttpClientConfig> {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.endpoint())
            .timeout(Duration::from_secs(self.timeout_seconds))
            .retries(self.retries)
            .retry_delay(Duration::from_secs(self.retry_delay_seconds))
            .rate_limit(RateLimiterConfig::per_minute(self.requests_per_minute));

        builder = match self.cache_config()? {
            Some(cache) => builder.cache(cache),
            None => builder.no_cache(),
        };
        if let Some(ref agent) = self.user_agent {
            builder = builder.user_agent(agent);
        }
        Ok(builder.build())
    }
}
