//! Database models for the SparkHub server.

use sparkhub_lib::registry::UsernameRecord;

/// Database row for a registered username.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    /// Row id
    pub id: i64,

    /// Username (1-50 chars)
    pub username: String,

    /// Spark address
    pub address: String,

    /// Creation timestamp (Unix seconds)
    pub created_at: i64,

    /// Last update timestamp (Unix seconds)
    pub updated_at: i64,
}

impl From<UserRow> for UsernameRecord {
    fn from(row: UserRow) -> Self {
        UsernameRecord {
            username: row.username,
            address: row.address,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
