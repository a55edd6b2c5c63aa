//! Core trait for the vault's key-value persistence.

use std::future::Future;

/// What went wrong in a [`KeyValueStore`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StorageErrorCode {
    /// Could not read the backing file or map
    ReadFailed,
    /// Could not persist a change
    WriteFailed,
    /// Contents are not a flat string map
    Corrupted,
    /// Poisoned lock or similar
    Internal,
}

/// Store failure. The message never contains stored values.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct StorageError {
    pub code: StorageErrorCode,
    pub message: String,
}

impl StorageError {
    pub fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn read(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::ReadFailed, message)
    }

    pub fn write(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::WriteFailed, message)
    }
}

impl From<StorageError> for crate::SparkhubError {
    fn from(err: StorageError) -> Self {
        crate::SparkhubError::Storage(err.message)
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Minimal string-to-string store.
///
/// Values are opaque to the store. Callers serialize and parse; the store
/// never interprets what it holds.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> impl Future<Output = StorageResult<Option<String>>> + Send;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> impl Future<Output = StorageResult<()>> + Send;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> impl Future<Output = StorageResult<()>> + Send;
}
