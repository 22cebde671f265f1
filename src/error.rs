//! Error types for the BGG XML API client
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for the BGG XML API client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Caller Errors
    // ============================================================================
    /// The request cannot be sent as given
    #[error("Invalid request: {message}")]
    InvalidRequest {
        /// What is wrong with the request
        message: String,
    },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    /// Invalid client configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the configuration
        message: String,
    },

    /// YAML config could not be parsed
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// JSON config or cache entry could not be parsed
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Upstream Outcomes
    // ============================================================================
    /// The server answered 404
    #[error("Resource not found: {url}")]
    NotFound {
        /// Requested URL
        url: String,
    },

    /// The server kept answering 202 (or a transient status) until attempts ran out
    #[error("Server still processing the request after {attempts} attempts")]
    TransientUnavailable {
        /// Attempts made
        attempts: u32,
    },

    /// Every attempt timed out
    #[error("Request timeout after {timeout_ms}ms ({attempts} attempts)")]
    Timeout {
        /// Per-attempt timeout
        timeout_ms: u64,
        /// Attempts made
        attempts: u32,
    },

    /// The body is not XML at all, e.g. an HTML error page
    #[error("Response is not XML: {snippet}")]
    NonXmlResponse {
        /// Start of the body
        snippet: String,
    },

    /// The body is broken XML
    #[error("Malformed response: {message}")]
    MalformedResponse {
        /// Parser message
        message: String,
    },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    /// Transport failure from the HTTP client
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Unexpected HTTP status
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// Status code
        status: u16,
        /// Response body
        body: String,
    },

    /// A URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Cache Errors
    // ============================================================================
    /// Cache backend failure
    #[error("Cache error: {message}")]
    Cache {
        /// What failed
        message: String,
    },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    /// File system failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(url: impl Into<String>) -> Self {
        Self::NotFound { url: url.into() }
    }

    /// Create a malformed response error
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse {
            message: message.into(),
        }
    }

    /// Create a non-XML response error, keeping only the start of the body
    pub fn non_xml(body: &str) -> Self {
        let snippet: String = body.trim().chars().take(80).collect();
        Self::NonXmlResponse { snippet }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a cache error
    pub fn cache(message: impl Into<String>) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Check if this error is worth another attempt
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::TransientUnavailable { .. } | Error::Timeout { .. } => true,
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::HttpStatus { status, .. } => is_retryable_status(*status),
            _ => false,
        }
    }

    /// Check if this error means "the upstream has no such resource".
    ///
    /// The API answers some lookups for unknown names with an HTML page
    /// instead of XML, so a non-XML body counts as missing as well.
    pub fn is_missing_resource(&self) -> bool {
        matches!(self, Error::NotFound { .. } | Error::NonXmlResponse { .. })
    }

    /// Check if the response body could not be used at all
    pub fn is_malformed(&self) -> bool {
        matches!(
            self,
            Error::MalformedResponse { .. } | Error::NonXmlResponse { .. }
        )
    }
}

/// Check if an HTTP status code is retryable
pub(crate) fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

/// Result type alias for the BGG XML API client
pub type Result<T> = std::result::Result<T, Error>;

/// Turn "no such resource" outcomes into `Ok(None)`, keeping every other error.
pub(crate) fn missing_as_none<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_missing_resource() => {
            tracing::debug!(error = %e, "Treating response as missing resource");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::invalid_request("no user name specified");
        assert_eq!(err.to_string(), "Invalid request: no user name specified");

        let err = Error::TransientUnavailable { attempts: 3 };
        assert_eq!(
            err.to_string(),
            "Server still processing the request after 3 attempts"
        );

        let err = Error::http_status(404, "Not found");
        assert_eq!(err.to_string(), "HTTP 404: Not found");
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::TransientUnavailable { attempts: 1 }.is_retryable());
        assert!(Error::Timeout {
            timeout_ms: 1000,
            attempts: 1
        }
        .is_retryable());
        assert!(Error::http_status(429, "").is_retryable());
        assert!(Error::http_status(500, "").is_retryable());
        assert!(Error::http_status(503, "").is_retryable());

        assert!(!Error::http_status(400, "").is_retryable());
        assert!(!Error::http_status(401, "").is_retryable());
        assert!(!Error::not_found("https://example.com").is_retryable());
        assert!(!Error::malformed("bad").is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_missing_resource_and_malformed_are_distinct() {
        let html = Error::non_xml("<!DOCTYPE html><html><body>Oops</body></html>");
        assert!(html.is_missing_resource());
        assert!(html.is_malformed());

        let broken = Error::malformed("unexpected end of document");
        assert!(!broken.is_missing_resource());
        assert!(broken.is_malformed());

        assert!(Error::not_found("x").is_missing_resource());
    }

    #[test]
    fn test_non_xml_snippet_is_bounded() {
        let body = "x".repeat(500);
        match Error::non_xml(&body) {
            Error::NonXmlResponse { snippet } => assert_eq!(snippet.len(), 80),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_as_none() {
        assert_eq!(missing_as_none(Ok(5)).unwrap(), Some(5));
        assert_eq!(
            missing_as_none::<u32>(Err(Error::not_found("x"))).unwrap(),
            None
        );
        assert!(missing_as_none::<u32>(Err(Error::malformed("x"))).is_err());
    }
}
