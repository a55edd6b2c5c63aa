//! In-memory address registry.
//!
//! Both directions are indexed, and every mutation happens under one write
//! lock so the two maps never disagree.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{AddressRegistry, UsernameRecord};
use crate::{Result, SparkhubError};

#[derive(Default)]
struct Tables {
    by_username: HashMap<String, UsernameRecord>,
    by_address: HashMap<String, String>,
}

/// In-memory implementation of [`AddressRegistry`].
#[derive(Default)]
pub struct InMemoryAddressRegistry {
    tables: RwLock<Tables>,
}

fn lock_error(context: &str) -> SparkhubError {
    SparkhubError::Storage(format!(
        "InMemoryAddressRegistry: lock poisoned during {}",
        context
    ))
}

impl InMemoryAddressRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered usernames. Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.tables
            .read()
            .map(|t| t.by_username.len())
            .unwrap_or(0)
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl AddressRegistry for InMemoryAddressRegistry {
    async fn lookup_address(&self, username: &str) -> Result<Option<String>> {
        let tables = self.tables.read().map_err(|_| lock_error("lookup_address"))?;
        Ok(tables.by_username.get(username).map(|r| r.address.clone()))
    }

    async fn lookup_username(&self, address: &str) -> Result<Option<String>> {
        let tables = self.tables.read().map_err(|_| lock_error("lookup_username"))?;
        Ok(tables.by_address.get(address).cloned())
    }

    async fn get_record(&self, username: &str) -> Result<Option<UsernameRecord>> {
        let tables = self.tables.read().map_err(|_| lock_error("get_record"))?;
        Ok(tables.by_username.get(username).cloned())
    }

    async fn insert_record(&self, record: &UsernameRecord) -> Result<()> {
        let mut tables = self.tables.write().map_err(|_| lock_error("insert_record"))?;

        if tables.by_username.contains_key(&record.username) {
            return Err(SparkhubError::UsernameTaken {
                username: record.username.clone(),
            });
        }
        if let Some(existing) = tables.by_address.get(&record.address) {
            return Err(SparkhubError::AddressClaimed {
                address: record.address.clone(),
                existing_username: existing.clone(),
            });
        }

        tables
            .by_address
            .insert(record.address.clone(), record.username.clone());
        tables
            .by_username
            .insert(record.username.clone(), record.clone());
        Ok(())
    }

    async fn update_address(
        &self,
        username: &str,
        address: &str,
        updated_at: i64,
    ) -> Result<Option<UsernameRecord>> {
        let mut tables = self.tables.write().map_err(|_| lock_error("update_address"))?;

        if let Some(holder) = tables.by_address.get(address) {
            if holder != username {
                return Err(SparkhubError::AddressClaimed {
                    address: address.to_string(),
                    existing_username: holder.clone(),
                });
            }
        }

        let Some(record) = tables.by_username.get_mut(username) else {
            return Ok(None);
        };
        let previous = std::mem::replace(&mut record.address, address.to_string());
        record.updated_at = updated_at;
        let updated = record.clone();

        tables.by_address.remove(&previous);
        tables
            .by_address
            .insert(address.to_string(), username.to_string());
        Ok(Some(updated))
    }
}
