//! HTTP client with caching, retry and rate limiting
//!
//! Provides the resilient transport used by every API call:
//! - Response cache lookup before any network traffic
//! - Rate limiting shared by all fetches through one client
//! - Fixed-delay retries on "still processing" (202), timeouts and
//!   transient server errors
//! - Parsing of the body into an element tree

use super::rate_limit::{RateLimiter, RateLimiterConfig};
use super::request::{RequestDescriptor, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT};
use crate::cache::{CacheConfig, CacheKey, CacheStore, DEFAULT_CACHE_TTL};
use crate::decode::{DocumentParser, XmlElement, XmlParser};
use crate::error::{is_retryable_status, Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Anything that can turn a request descriptor into a parsed document.
///
/// The paginated aggregator only depends on this trait, so tests can drive
/// it with canned pages.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch and parse one page
    async fn fetch(&self, request: &RequestDescriptor) -> Result<XmlElement>;
}

/// Classification of an HTTP status code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseStatus {
    /// 200: body is ready
    Ok,
    /// 202: the server queued the request, ask again later
    Processing,
    /// 404: no such resource
    NotFound,
    /// Throttling or transient server failure, worth another attempt
    Retryable,
    /// Anything else
    Failed,
}

impl ResponseStatus {
    /// Classify a status code
    pub fn classify(status: u16) -> Self {
        match status {
            202 => ResponseStatus::Processing,
            200..=299 => ResponseStatus::Ok,
            404 => ResponseStatus::NotFound,
            s if is_retryable_status(s) => ResponseStatus::Retryable,
            _ => ResponseStatus::Failed,
        }
    }
}

/// Configuration for the HTTP client
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL prepended to relative request paths
    pub base_url: Option<String>,
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Total number of attempts per fetch
    pub retries: u32,
    /// Delay between attempts
    pub retry_delay: Duration,
    /// Rate limiter configuration
    pub rate_limit: Option<RateLimiterConfig>,
    /// User agent string
    pub user_agent: String,
    /// Response cache, `None` disables caching
    pub cache: Option<CacheConfig>,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
            rate_limit: Some(RateLimiterConfig::default()),
            user_agent: format!("bgg-xmlapi/{}", env!("CARGO_PKG_VERSION")),
            cache: Some(CacheConfig::default()),
        }
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    /// Set the per-attempt timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the total number of attempts
    pub fn retries(mut self, retries: u32) -> Self {
        self.config.retries = retries;
        self
    }

    /// Set the delay between attempts
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.config.retry_delay = delay;
        self
    }

    /// Limit outbound requests per minute
    pub fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.config.rate_limit = Some(RateLimiterConfig::per_minute(rpm));
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the response cache
    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.config.cache = Some(cache);
        self
    }

    /// Disable caching
    pub fn no_cache(mut self) -> Self {
        self.config.cache = None;
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client with caching, retry and rate limiting
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
    rate_limiter: Option<RateLimiter>,
    cache: Option<Arc<dyn CacheStore>>,
    cache_ttl: Duration,
    parser: Arc<dyn DocumentParser>,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let rate_limiter = config.rate_limit.as_ref().map(RateLimiter::new);
        let (cache, cache_ttl) = match &config.cache {
            Some(cache) => (Some(cache.open()?), cache.ttl),
            None => (None, DEFAULT_CACHE_TTL),
        };

        Ok(Self {
            client,
            config,
            rate_limiter,
            cache,
            cache_ttl,
            parser: Arc::new(XmlParser::new()),
        })
    }

    /// Use an already opened cache store, e.g. one shared between clients
    #[must_use]
    pub fn with_cache_store(mut self, store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        self.cache = Some(store);
        self.cache_ttl = ttl;
        self
    }

    /// Replace the document parser
    #[must_use]
    pub fn with_parser(mut self, parser: Arc<dyn DocumentParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Check if rate limiting is enabled
    pub fn has_rate_limiter(&self) -> bool {
        self.rate_limiter.is_some()
    }

    /// The shared rate limiter, if any
    pub fn rate_limiter(&self) -> Option<&RateLimiter> {
        self.rate_limiter.as_ref()
    }

    /// The response cache, if any
    pub fn cache(&self) -> Option<&Arc<dyn CacheStore>> {
        self.cache.as_ref()
    }

    /// Descriptor for `path` carrying this client's timeout and retry policy
    pub fn request(&self, path: &str) -> RequestDescriptor {
        RequestDescriptor::new(self.build_url(path))
            .timeout(self.config.timeout)
            .retries(self.config.retries)
            .retry_delay(self.config.retry_delay)
    }

    /// Fetch one document: cache, then network with retries, then parse.
    ///
    /// Only bodies that parsed are stored in the cache.
    #[tracing::instrument(skip(self, request), fields(url = %request.url))]
    pub async fn fetch(&self, request: &RequestDescriptor) -> Result<XmlElement> {
        let key = self.cache.as_ref().map(|_| request.cache_key());

        if let Some(document) = self.cached_document(key.as_ref()).await {
            return Ok(document);
        }

        let body = self.fetch_body(request).await?;
        let document = self.parser.parse(&body)?;

        if let (Some(cache), Some(key)) = (&self.cache, &key) {
            if let Err(e) = cache.put(key, &body, self.cache_ttl).await {
                warn!(key = %key, error = %e, "Failed to store response in cache");
            }
        }

        Ok(document)
    }

    async fn cached_document(&self, key: Option<&CacheKey>) -> Option<XmlElement> {
        let (cache, key) = (self.cache.as_ref()?, key?);
        let body = match cache.get(key).await {
            Ok(body) => body?,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache lookup failed, fetching");
                return None;
            }
        };

        match self.parser.parse(&body) {
            Ok(document) => {
                debug!(key = %key, "Cache hit");
                Some(document)
            }
            Err(e) => {
                warn!(key = %key, error = %e, "Discarding unparsable cached response");
                if let Err(e) = cache.remove(key).await {
                    warn!(key = %key, error = %e, "Failed to remove cache entry");
                }
                None
            }
        }
    }

    /// Run the attempt loop and return the raw body
    async fn fetch_body(&self, request: &RequestDescriptor) -> Result<String> {
        let attempts = request.attempts();
        let mut last_error = None;

        for attempt in 1..=attempts {
            if attempt > 1 {
                debug!(attempt, delay = ?request.retry_delay, "Waiting before retry");
                tokio::time::sleep(request.retry_delay).await;
            }

            if let Some(ref limiter) = self.rate_limiter {
                limiter.acquire().await;
            }

            match self.attempt(request, attempts).await {
                Ok(body) => return Ok(body),
                Err(error) if error.is_retryable() => {
                    warn!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt, attempts, request.url, error
                    );
                    last_error = Some(error);
                }
                Err(error) => return Err(error),
            }
        }

        Err(last_error.unwrap_or(Error::TransientUnavailable { attempts }))
    }

    /// One request; [`Error::is_retryable`] decides whether another follows
    async fn attempt(&self, request: &RequestDescriptor, attempts: u32) -> Result<String> {
        #[allow(clippy::cast_possible_truncation)]
        let timeout_error = || Error::Timeout {
            timeout_ms: request.timeout.as_millis() as u64,
            attempts,
        };

        let response = match self
            .client
            .get(&request.url)
            .query(&request.params)
            .timeout(request.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Err(timeout_error()),
            Err(e) => return Err(Error::Http(e)),
        };

        let status = response.status().as_u16();
        match ResponseStatus::classify(status) {
            ResponseStatus::Ok => match response.text().await {
                Ok(body) => {
                    debug!(status, bytes = body.len(), "Request succeeded");
                    Ok(body)
                }
                Err(e) if e.is_timeout() => Err(timeout_error()),
                Err(e) => Err(Error::Http(e)),
            },
            ResponseStatus::Processing => Err(Error::TransientUnavailable { attempts }),
            ResponseStatus::NotFound => Err(Error::not_found(response.url().as_str())),
            ResponseStatus::Retryable | ResponseStatus::Failed => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::http_status(status, body))
            }
        }
    }

    /// Build full URL from path
    fn build_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }

        match &self.config.base_url {
            Some(base) => {
                let base = base.trim_end_matches('/');
                let path = path.trim_start_matches('/');
                format!("{base}/{path}")
            }
            None => path.to_string(),
        }
    }
}

#[async_trait]
impl Fetcher for HttpClient {
    async fn fetch(&self, request: &RequestDescriptor) -> Result<XmlElement> {
        HttpClient::fetch(self, request).await
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .field("has_rate_limiter", &self.rate_limiter.is_some())
            .field("has_cache", &self.cache.is_some())
            .finish_non_exhaustive()
    }
}
