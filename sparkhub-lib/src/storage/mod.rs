//! Key-value persistence used by the secret vault.
//!
//! Implementations:
//! - [`InMemoryKeyValueStore`] for tests and ephemeral use
//! - [`FileKeyValueStore`] for a JSON file on disk (used by the CLI)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sparkhub_lib::storage::{FileKeyValueStore, KeyValueStore};
//!
//! let store = FileKeyValueStore::new("/tmp/vault.json");
//! store.set("device_salt", "sparkhub-salt-...").await?;
//! let salt = store.get("device_salt").await?;
//! ```

mod file;
mod memory;
mod traits;

pub use file::FileKeyValueStore;
pub use memory::InMemoryKeyValueStore;
pub use traits::{KeyValueStore, StorageError, StorageErrorCode, StorageResult};
