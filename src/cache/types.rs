//! Cache types and traits
//!
//! Defines request identity, persisted entries, the store trait and the
//! URI-style cache configuration.

use super::file::FileCache;
use super::memory::MemoryCache;
use crate::error::{Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default time-to-live for cached responses
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

// ============================================================================
// Cache Key
// ============================================================================

/// Identity of a request: method, URL and the full parameter set.
///
/// Parameters are sorted before hashing, so insertion order never matters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for a request
    pub fn new<'a, I>(method: &str, url: &str, params: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut pairs: Vec<(&String, &String)> = params.into_iter().collect();
        pairs.sort();

        // Every field is length-prefixed, so no two field splits collide
        let mut hasher = Sha256::new();
        let mut field = |bytes: &[u8]| {
            hasher.update((bytes.len() as u64).to_be_bytes());
            hasher.update(bytes);
        };
        field(method.to_ascii_uppercase().as_bytes());
        field(url.as_bytes());
        for (key, value) in pairs {
            field(key.as_bytes());
            field(value.as_bytes());
        }

        Self(format!("{:x}", hasher.finalize()))
    }

    /// Hex digest of the key
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Cache Entry
// ============================================================================

/// A cached response body with its expiry instant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Request identity
    pub key: CacheKey,
    /// Raw response body
    pub body: String,
    /// When the entry stops being served
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    /// Create an entry expiring `ttl` from now
    pub fn new(key: CacheKey, body: impl Into<String>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::weeks(5200));
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self {
            key,
            body: body.into(),
            expires_at,
        }
    }

    /// Check if this entry is expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

// ============================================================================
// Cache Store
// ============================================================================

/// Key-value store for response bodies with TTL expiry.
///
/// Implementations must be safe to share between concurrent fetches.
#[async_trait]
pub trait CacheStore: Send + Sync + fmt::Debug {
    /// Look up a body; expired entries are misses
    async fn get(&self, key: &CacheKey) -> Result<Option<String>>;

    /// Store a body for `ttl`, replacing any previous entry
    async fn put(&self, key: &CacheKey, body: &str, ttl: Duration) -> Result<()>;

    /// Remove a single entry
    async fn remove(&self, key: &CacheKey) -> Result<()>;

    /// Remove every entry
    async fn clear(&self) -> Result<()>;
}

// ============================================================================
// Cache Configuration
// ============================================================================

/// Storage backend selected by the cache URI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheBackend {
    /// Process-local map
    Memory,
    /// One JSON file per entry under a directory
    File {
        /// Cache directory
        dir: PathBuf,
    },
}

/// Cache configuration parsed from a URI such as
/// `memory:///?ttl=3600` or `file:///var/cache/bgg?ttl=600`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Storage backend
    pub backend: CacheBackend,
    /// Time-to-live for new entries
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self::memory(DEFAULT_CACHE_TTL)
    }
}

impl CacheConfig {
    /// In-memory cache with the given TTL
    pub fn memory(ttl: Duration) -> Self {
        Self {
            backend: CacheBackend::Memory,
            ttl,
        }
    }

    /// File cache in `dir` with the given TTL
    pub fn file(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            backend: CacheBackend::File { dir: dir.into() },
            ttl,
        }
    }

    /// Parse a cache URI
    pub fn from_uri(uri: &str) -> Result<Self> {
        let url = Url::parse(uri).map_err(|e| Error::config(format!("invalid cache URI '{uri}': {e}")))?;

        let ttl = match url.query_pairs().find(|(k, _)| k == "ttl") {
            Some((_, value)) => {
                let seconds: u64 = value.parse().map_err(|_| {
                    Error::config(format!("invalid cache ttl '{value}' in '{uri}'"))
                })?;
                Duration::from_secs(seconds)
            }
            None => DEFAULT_CACHE_TTL,
        };

        match url.scheme() {
            "memory" => Ok(Self::memory(ttl)),
            "file" => {
                let dir = url
                    .to_file_path()
                    .map_err(|()| Error::config(format!("invalid cache directory in '{uri}'")))?;
                Ok(Self::file(dir, ttl))
            }
            other => Err(Error::config(format!(
                "unsupported cache backend '{other}' (expected memory or file)"
            ))),
        }
    }

    /// Open the configured store
    pub fn open(&self) -> Result<Arc<dyn CacheStore>> {
        match &self.backend {
            CacheBackend::Memory => Ok(Arc::new(MemoryCache::new())),
            CacheBackend::File { dir } => Ok(Arc::new(FileCache::open(dir)?)),
        }
    }
}

impl FromStr for CacheConfig {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_uri(s)
    }
}
