//! File-backed cache
//!
//! Provides a persistent cache with one JSON document per entry and
//! atomic writes (temp file + rename), so concurrent readers never see a
//! partially written entry.

use super::types::{CacheEntry, CacheKey, CacheStore};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Persistent cache stored as `<dir>/<key>.json`
#[derive(Debug)]
pub struct FileCache {
    /// Cache directory
    dir: PathBuf,
    /// Counter for unique temp file names
    writes: AtomicU64,
}

impl FileCache {
    /// Open (and create if needed) a cache directory
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            Error::cache(format!(
                "Failed to create cache directory {}: {e}",
                dir.display()
            ))
        })?;
        Ok(Self {
            dir,
            writes: AtomicU64::new(0),
        })
    }

    /// Cache directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn entry_path(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(format!("{}.json", key.as_str()))
    }

    async fn discard(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove cache entry");
            }
        }
    }
}

#[async_trait]
impl CacheStore for FileCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>> {
        let path = self.entry_path(key);
        let contents = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(Error::cache(format!(
                    "Failed to read cache entry {}: {e}",
                    path.display()
                )))
            }
        };

        let entry: CacheEntry = match serde_json::from_str(&contents) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Discarding unreadable cache entry");
                self.discard(&path).await;
                return Ok(None);
            }
        };

        if entry.key != *key || entry.is_expired() {
            tracing::debug!(key = %key, "Cache entry expired, removing");
            self.discard(&path).await;
            return Ok(None);
        }

        Ok(Some(entry.body))
    }

    async fn put(&self, key: &CacheKey, body: &str, ttl: Duration) -> Result<()> {
        let entry = CacheEntry::new(key.clone(), body, ttl);
        let contents = serde_json::to_string(&entry).map_err(|e| Error::Cache {
            message: format!("Failed to serialize cache entry: {e}"),
        })?;

        // Write to temp file first, then rename for atomicity
        let path = self.entry_path(key);
        let n = self.writes.fetch_add(1, Ordering::Relaxed);
        let temp_path = self
            .dir
            .join(format!("{}.{}.{n}.tmp", key.as_str(), std::process::id()));

        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| Error::Cache {
                message: format!("Failed to write cache entry: {e}"),
            })?;

        tokio::fs::rename(&temp_path, &path)
            .await
            .map_err(|e| Error::Cache {
                message: format!("Failed to rename cache entry: {e}"),
            })?;

        Ok(())
    }

    async fn remove(&self, key: &CacheKey) -> Result<()> {
        self.discard(&self.entry_path(key)).await;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut dir = tokio::fs::read_dir(&self.dir).await?;
        let mut cleared = 0usize;
        while let Some(item) = dir.next_entry().await? {
            let path = item.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                self.discard(&path).await;
                cleared += 1;
            }
        }
        tracing::info!(cleared, dir = %self.dir.display(), "Cleared file cache");
        Ok(())
    }
}
