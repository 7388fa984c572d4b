//! File-based cache store.
//!
//! One JSON document per key under a cache directory, e.g.
//! `cache/2024-01-10.json`. Historical rates never change so files are
//! never expired or cleaned up.

use crate::error::{FxError, Result};
use crate::services::CacheStore;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File-based cache store.
pub struct FileStore {
    cache_dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `cache_dir`, creating the directory if needed.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Result<Self> {
        let cache_dir = cache_dir.into();
        fs::create_dir_all(&cache_dir).map_err(|e| {
            FxError::Storage(format!(
                "Failed to create cache directory {}: {}",
                cache_dir.display(),
                e
            ))
        })?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Get the cache file path for a key.
    fn get_path(&self, key: &str) -> PathBuf {
        // Sanitize key for filesystem
        let safe_key = key.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        self.cache_dir.join(format!("{}.json", safe_key))
    }
}

impl CacheStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.get_path(key);

        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            // Undecodable bytes are a damaged entry, not an unreadable medium.
            Err(e) if e.kind() == ErrorKind::InvalidData => Ok(Some(String::new())),
            Err(e) => Err(FxError::Storage(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn put(&self, key: &str, document: &str) -> Result<()> {
        let path = self.get_path(key);

        fs::write(&path, document).map_err(|e| {
            FxError::Storage(format!("Failed to write {}: {}", path.display(), e))
        })?;
        debug!("Cached {} to disk", key);
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.get_path(key).exists()
    }
}
