//! Response cache module
//!
//! Caches raw response bodies keyed by request identity, with TTL expiry.
//!
//! # Overview
//!
//! The cache module provides:
//! - `CacheStore` - Async key-value trait shared by all backends
//! - `MemoryCache` - Process-local store, bounded only by TTL
//! - `FileCache` - Persistent store, one JSON file per entry
//! - `CacheConfig` - Backend and TTL selected from a URI
//!
//! Caching is advisory: a miss or a failing backend only costs a network
//! round trip, never a different result.

mod file;
mod memory;
mod types;

pub use file::FileCache;
pub use memory::MemoryCache;
pub use types::{CacheBackend, CacheConfig, CacheEntry, CacheKey, CacheStore, DEFAULT_CACHE_TTL};
