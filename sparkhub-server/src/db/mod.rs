//! Database layer for the SparkHub server.

mod models;
mod pool;
mod queries;

pub use models::UserRow;
pub use pool::create_pool;
pub use queries::*;

use async_trait::async_trait;
use sparkhub_lib::registry::{AddressRegistry, UsernameRecord};
use sparkhub_lib::Result;
use sqlx::SqlitePool;

/// SQLite-backed [`AddressRegistry`].
///
/// Uniqueness is enforced by the `users` table; claim races surface as
/// unique-constraint violations and are reported as conflicts.
#[derive(Clone)]
pub struct SqliteAddressRegistry {
    pool: SqlitePool,
}

impl SqliteAddressRegistry {
    /// Wrap an existing pool. Migrations must already have run.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl AddressRegistry for SqliteAddressRegistry {
    async fn lookup_address(&self, username: &str) -> Result<Option<String>> {
        Ok(get_user_by_username(&self.pool, username)
            .await?
            .map(|row| row.address))
    }

    async fn lookup_username(&self, address: &str) -> Result<Option<String>> {
        Ok(get_user_by_address(&self.pool, address)
            .await?
            .map(|row| row.username))
    }

    async fn get_record(&self, username: &str) -> Result<Option<UsernameRecord>> {
        Ok(get_user_by_username(&self.pool, username)
            .await?
            .map(UsernameRecord::from))
    }

    async fn insert_record(&self, record: &UsernameRecord) -> Result<()> {
        insert_user(&self.pool, record).await?;
        Ok(())
    }

    async fn update_address(
        &self,
        username: &str,
        address: &str,
        updated_at: i64,
    ) -> Result<Option<UsernameRecord>> {
        Ok(update_user_address(&self.pool, username, address, updated_at)
            .await?
            .map(UsernameRecord::from))
    }
}
