//! In-memory key-value store.
//!
//! Used by tests and by callers that do not need persistence. Lock
//! poisoning is reported as an error rather than a panic.

use std::collections::HashMap;
use std::sync::RwLock;

use super::traits::{KeyValueStore, StorageError, StorageErrorCode, StorageResult};

/// In-memory implementation of [`KeyValueStore`].
#[derive(Default)]
pub struct InMemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

fn lock_error(context: &str) -> StorageError {
    StorageError::new(
        StorageErrorCode::Internal,
        format!("InMemoryKeyValueStore: lock poisoned during {}", context),
    )
}

impl InMemoryKeyValueStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries. Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Check if the store is empty. Returns true if the lock is poisoned.
    pub fn is_empty(&self) -> bool {
        self.entries.read().map(|e| e.is_empty()).unwrap_or(true)
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| lock_error("get"))?;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| lock_error("set"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        let mut entries = self.entries.write().map_err(|_| lock_error("remove"))?;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = InMemoryKeyValueStore::new();
        assert!(store.is_empty());

        store.set("device_salt", "abc").await.unwrap();
        assert_eq!(store.get("device_salt").await.unwrap(), Some("abc".to_string()));
        assert_eq!(store.len(), 1);

        store.set("device_salt", "def").await.unwrap();
        assert_eq!(store.get("device_salt").await.unwrap(), Some("def".to_string()));

        store.remove("device_salt").await.unwrap();
        assert_eq!(store.get("device_salt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_remove_missing_is_ok() {
        let store = InMemoryKeyValueStore::new();
        assert!(store.remove("missing").await.is_ok());
    }
}
