//! Key-value persistence for session state and preferences.
//!
//! The portal never reads ambient globals for "who is signed in" or "which
//! language is active". Both are read from a [`KeyValueStore`] handed to the
//! request, so the same logic runs against the HTTP session in production and
//! an in-memory map in tests and tools.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

/// Errors from a storage backend.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// The backend could not be reached or is in a broken state.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A stored value could not be encoded or decoded.
    #[error("storage value for `{key}` is malformed: {message}")]
    Malformed { key: String, message: String },
}

/// String key to string value storage.
///
/// Values are opaque text; callers that store structured data serialize it
/// themselves. Missing keys read as `Ok(None)`.
pub trait KeyValueStore: Send + Sync {
    /// Read a value.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: String)
    -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Remove a value. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// In-memory [`KeyValueStore`].
///
/// Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().map_or(0, |map| map.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_map<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> R,
    ) -> Result<R, StorageError> {
        let mut map = self
            .entries
            .lock()
            .map_err(|_| StorageError::Unavailable("memory storage lock poisoned".to_string()))?;
        Ok(f(&mut map))
    }
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>, StorageError>> + Send {
        let result = self.with_map(|map| map.get(key).cloned());
        async move { result }
    }

    fn set(
        &self,
        key: &str,
        value: String,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        let result = self.with_map(|map| {
            map.insert(key.to_owned(), value);
        });
        async move { result }
    }

    fn remove(&self, key: &str) -> impl Future<Output = Result<(), StorageError>> + Send {
        let result = self.with_map(|map| {
            map.remove(key);
        });
        async move { result }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = MemoryStorage::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1".to_string()).await.unwrap();
        store.set("k", "v2".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);

        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let a = MemoryStorage::new();
        let b = a.clone();
        a.set("schoolcom-language", "es".to_string()).await.unwrap();
        assert_eq!(
            b.get("schoolcom-language").await.unwrap().as_deref(),
            Some("es")
        );
    }
}
