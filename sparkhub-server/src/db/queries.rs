//! Database queries for the SparkHub server.

use sparkhub_lib::registry::UsernameRecord;
use sparkhub_lib::{Result, SparkhubError};
use sqlx::SqlitePool;

use crate::db::models::UserRow;

fn storage_error(e: sqlx::Error) -> SparkhubError {
    SparkhubError::Storage(format!("database error: {}", e))
}

/// Map a unique-constraint violation to the registry conflict it represents.
///
/// SQLite reports the column as `UNIQUE constraint failed: users.<column>`.
/// `existing_username` is left empty for address conflicts; the registry
/// looks it up.
fn map_write_error(e: sqlx::Error, username: &str, address: &str) -> SparkhubError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let message = db_err.message();
            if message.contains("users.username") {
                return SparkhubError::UsernameTaken {
                    username: username.to_string(),
                };
            }
            if message.contains("users.address") {
                return SparkhubError::AddressClaimed {
                    address: address.to_string(),
                    existing_username: String::new(),
                };
            }
        }
    }
    storage_error(e)
}

/// Insert a new user row. Never replaces an existing row.
///
/// Returns `UsernameTaken` or `AddressClaimed` on unique constraint violation.
pub async fn insert_user(pool: &SqlitePool, record: &UsernameRecord) -> Result<UserRow> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (username, address, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?4)
        RETURNING *
        "#,
    )
    .bind(&record.username)
    .bind(&record.address)
    .bind(record.created_at)
    .bind(record.updated_at)
    .fetch_one(pool)
    .await
    .map_err(|e| map_write_error(e, &record.username, &record.address))
}

/// Get a user by username (exact match).
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE username = ?1")
        .bind(username)
        .fetch_optional(pool)
        .await
        .map_err(storage_error)
}

/// Get a user by Spark address (exact match).
pub async fn get_user_by_address(pool: &SqlitePool, address: &str) -> Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>("SELECT * FROM users WHERE address = ?1")
        .bind(address)
        .fetch_optional(pool)
        .await
        .map_err(storage_error)
}

/// Point `username` at a new address.
///
/// Returns `None` when the username has no row, and `AddressClaimed` if the
/// address is held by another row.
pub async fn update_user_address(
    pool: &SqlitePool,
    username: &str,
    address: &str,
    updated_at: i64,
) -> Result<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET address = ?1, updated_at = ?2
        WHERE username = ?3
        RETURNING *
        "#,
    )
    .bind(address)
    .bind(updated_at)
    .bind(username)
    .fetch_optional(pool)
    .await
    .map_err(|e| map_write_error(e, username, address))
}

/// Number of registered users.
pub async fn count_users(pool: &SqlitePool) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await
        .map_err(storage_error)
}
