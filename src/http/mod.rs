//! HTTP transport module
//!
//! Provides the resilient transport behind every API call.
//!
//! # Features
//!
//! - **Response Cache**: Consulted before the network, filled after a parse
//! - **Rate Limiting**: Rolling one-minute window shared per client
//! - **Retries**: Fixed delay between attempts on 202, timeouts and 5xx
//! - **Fetcher Trait**: Seam used by the paginated aggregator

mod client;
mod rate_limit;
mod request;

pub use client::{Fetcher, HttpClient, HttpClientConfig, HttpClientConfigBuilder, ResponseStatus};
pub use rate_limit::{RateLimiter, RateLimiterConfig, DEFAULT_REQUESTS_PER_MINUTE};
pub use request::{
    RequestDescriptor, DEFAULT_RETRIES, DEFAULT_RETRY_DELAY, DEFAULT_TIMEOUT, PAGE_PARAM,
};
