//! JSON-file key-value store.
//!
//! All entries live in a single JSON object on disk. Writes go to a sibling
//! temporary file that is then renamed over the original, so a crash never
//! leaves a half-written file behind. A process-local mutex serializes
//! read-modify-write cycles; concurrent processes are not coordinated.

use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::traits::{KeyValueStore, StorageError, StorageErrorCode, StorageResult};

type Entries = BTreeMap<String, String>;

/// File-backed implementation of [`KeyValueStore`].
pub struct FileKeyValueStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileKeyValueStore {
    /// Use `path` as the backing file. The file is created on first write.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StorageResult<Entries> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Entries::new()),
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StorageError::new(
                    StorageErrorCode::Corrupted,
                    format!("{} is not a valid store: {}", self.path.display(), e),
                )
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Entries::new()),
            Err(e) => Err(StorageError::read(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn persist(&self, entries: &Entries) -> StorageResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::write(format!("failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| StorageError::new(StorageErrorCode::Internal, e.to_string()))?;

        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)
            .map_err(|e| StorageError::write(format!("failed to write {}: {}", tmp.display(), e)))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| {
            StorageError::write(format!("failed to replace {}: {}", self.path.display(), e))
        })
    }

    fn update(&self, context: &str, f: impl FnOnce(&mut Entries)) -> StorageResult<()> {
        let _guard = self.write_lock.lock().map_err(|_| {
            StorageError::new(
                StorageErrorCode::Internal,
                format!("FileKeyValueStore: lock poisoned during {}", context),
            )
        })?;
        let mut entries = self.load()?;
        f(&mut entries);
        self.persist(&entries)
    }
}

impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.update("set", |entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    async fn remove(&self, key: &str) -> StorageResult<()> {
        self.update("remove", |entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.json");

        let store = FileKeyValueStore::new(&path);
        store.set("encrypted_secret", "aa:bb:cc").await.unwrap();
        drop(store);

        let reopened = FileKeyValueStore::new(&path);
        assert_eq!(
            reopened.get("encrypted_secret").await.unwrap(),
            Some("aa:bb:cc".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_file_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("nested").join("vault.json"));
        assert_eq!(store.get("device_salt").await.unwrap(), None);

        store.set("device_salt", "salt").await.unwrap();
        assert!(store.path().exists());
    }

    #[tokio::test]
    async fn test_remove_entry() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("vault.json"));
        store.set("a", "1").await.unwrap();
        store.set("b", "2").await.unwrap();
        store.remove("a").await.unwrap();

        assert_eq!(store.get("a").await.unwrap(), None);
        assert_eq!(store.get("b").await.unwrap(), Some("2".to_string()));
    }

    #[tokio::test]
    async fn test_corrupted_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vault.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileKeyValueStore::new(&path);
        let err = store.get("a").await.unwrap_err();
        assert_eq!(err.code, StorageErrorCode::Corrupted);
    }
}
