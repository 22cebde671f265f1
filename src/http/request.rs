//! Request descriptors
//!
//! One logical GET: endpoint, flat query parameters and the retry policy
//! used for it. Pagination derives successive descriptors by overriding
//! only the page parameter.

use crate::cache::CacheKey;
use crate::types::StringMap;
use std::time::Duration;

/// Default per-attempt timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default number of attempts per fetch
pub const DEFAULT_RETRIES: u32 = 3;

/// Default delay between attempts
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Query parameter carrying the page number
pub const PAGE_PARAM: &str = "page";

/// Immutable description of one logical fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// Absolute endpoint URL
    pub url: String,
    /// Query parameters
    pub params: StringMap,
    /// Timeout for a single attempt
    pub timeout: Duration,
    /// Total number of attempts (at least one is always made)
    pub retries: u32,
    /// Delay between attempts
    pub retry_delay: Duration,
}

impl RequestDescriptor {
    /// Create a descriptor with default timeout and retry policy
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            params: StringMap::new(),
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Add a query parameter
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.params.insert(key.into(), value.to_string());
        self
    }

    /// Add every pair from an iterator of query parameters
    #[must_use]
    pub fn params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Set the per-attempt timeout
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the total number of attempts
    #[must_use]
    pub fn retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Set the delay between attempts
    #[must_use]
    pub fn retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Copy of this descriptor requesting the given page
    #[must_use]
    pub fn with_page(&self, page: u32) -> Self {
        let mut next = self.clone();
        next.params.insert(PAGE_PARAM.to_string(), page.to_string());
        next
    }

    /// Look up a query parameter
    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Number of attempts actually made, never zero
    pub fn attempts(&self) -> u32 {
        self.retries.max(1)
    }

    /// Cache identity of this request
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new("GET", &self.url, &self.params)
    }
}
