use crate::error::Result;
use dashmap::DashMap;

/// Persistent key -> document store backing the rate cache.
///
/// Keys are ISO calendar dates; documents are serialized rate tables.
/// Entries are never expired.
pub trait CacheStore: Send + Sync {
    /// Read a document. `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write (or overwrite) a document.
    fn put(&self, key: &str, document: &str) -> Result<()>;

    /// Check if a document exists for the key.
    fn exists(&self, key: &str) -> bool;
}

/// A thread-safe in-memory store.
#[derive(Default)]
pub struct MemoryStore {
    data: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: DashMap::new(),
        }
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl CacheStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).map(|entry| entry.value().clone()))
    }

    fn put(&self, key: &str, document: &str) -> Result<()> {
        self.data.insert(key.to_string(), document.to_string());
        Ok(())
    }

    fn exists(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }
}
