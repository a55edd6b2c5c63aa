//! Username ⇄ Spark address registry.
//!
//! The registry is a bijection: every username maps to one address and every
//! address to at most one username. Backends enforce uniqueness on both
//! columns; [`AddressRegistry::claim`] turns both pre-checks and insert-time
//! uniqueness violations into a [`ClaimOutcome::Conflict`].
//!
//! # Example
//!
//! ```rust,ignore
//! use sparkhub_lib::registry::{AddressRegistry, ClaimOutcome, InMemoryAddressRegistry};
//!
//! let registry = InMemoryAddressRegistry::new();
//! match registry.claim("alice", "spark1...").await? {
//!     ClaimOutcome::Claimed(record) => println!("claimed {}", record.username),
//!     ClaimOutcome::Conflict(conflict) => println!("{}", conflict),
//! }
//! ```

mod memory;

pub use memory::InMemoryAddressRegistry;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{Result, SparkhubError};

/// Maximum username length, in characters.
pub const MAX_USERNAME_LEN: usize = 50;

/// One registry row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsernameRecord {
    /// Registered username.
    pub username: String,
    /// Spark address the username resolves to.
    pub address: String,
    /// Creation time (unix seconds).
    pub created_at: i64,
    /// Last change of `address` (unix seconds).
    pub updated_at: i64,
}

impl UsernameRecord {
    /// New record stamped with the current time.
    pub fn new(username: impl Into<String>, address: impl Into<String>) -> Self {
        let now = chrono::Utc::now().timestamp();
        Self {
            username: username.into(),
            address: address.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Why a claim was refused.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimConflict {
    /// The username already has a record.
    UsernameTaken {
        /// The requested username
        username: String,
    },
    /// The address belongs to a different username.
    AddressClaimed {
        /// The requested address
        address: String,
        /// Username currently holding the address
        existing_username: String,
    },
}

impl fmt::Display for ClaimConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UsernameTaken { username } => write!(f, "Username {} already exists", username),
            Self::AddressClaimed { .. } => write!(
                f,
                "Spark address is already associated with another username"
            ),
        }
    }
}

impl From<ClaimConflict> for SparkhubError {
    fn from(conflict: ClaimConflict) -> Self {
        match conflict {
            ClaimConflict::UsernameTaken { username } => SparkhubError::UsernameTaken { username },
            ClaimConflict::AddressClaimed {
                address,
                existing_username,
            } => SparkhubError::AddressClaimed {
                address,
                existing_username,
            },
        }
    }
}

/// Result of [`AddressRegistry::claim`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClaimOutcome {
    /// The pair was stored.
    Claimed(UsernameRecord),
    /// The pair was refused; the registry is unchanged.
    Conflict(ClaimConflict),
}

/// Validate a username/address pair before it reaches storage.
pub fn validate_claim(username: &str, address: &str) -> Result<()> {
    let len = username.chars().count();
    if len == 0 || len > MAX_USERNAME_LEN {
        return Err(SparkhubError::invalid_data(
            "username",
            format!("must be between 1 and {} characters", MAX_USERNAME_LEN),
        ));
    }
    if address.is_empty() {
        return Err(SparkhubError::invalid_data("address", "must not be empty"));
    }
    Ok(())
}

/// Persistent username ⇄ address mapping.
///
/// Backends implement the four storage primitives. `insert_record` and
/// `update_address` must report uniqueness violations as
/// [`SparkhubError::UsernameTaken`] or [`SparkhubError::AddressClaimed`];
/// `existing_username` may be left empty when the backend cannot tell,
/// in which case `claim` looks it up.
#[async_trait]
pub trait AddressRegistry: Send + Sync {
    /// Address registered for `username`.
    async fn lookup_address(&self, username: &str) -> Result<Option<String>>;

    /// Username registered for `address`.
    async fn lookup_username(&self, address: &str) -> Result<Option<String>>;

    /// Full record for `username`.
    async fn get_record(&self, username: &str) -> Result<Option<UsernameRecord>>;

    /// Insert a new record. Never replaces an existing row.
    async fn insert_record(&self, record: &UsernameRecord) -> Result<()>;

    /// Point an existing `username` at `address`, refreshing `updated_at`.
    ///
    /// Returns `None` when `username` has no record.
    async fn update_address(
        &self,
        username: &str,
        address: &str,
        updated_at: i64,
    ) -> Result<Option<UsernameRecord>>;

    /// Claim `username` for `address`.
    ///
    /// The username is checked first and the address second; callers rely on
    /// this order to get the holder's name in an address conflict. A row
    /// inserted concurrently between the checks and the insert is reported
    /// exactly like a pre-check conflict.
    async fn claim(&self, username: &str, address: &str) -> Result<ClaimOutcome> {
        validate_claim(username, address)?;

        if self.lookup_address(username).await?.is_some() {
            return Ok(ClaimOutcome::Conflict(ClaimConflict::UsernameTaken {
                username: username.to_string(),
            }));
        }

        if let Some(existing_username) = self.lookup_username(address).await? {
            return Ok(ClaimOutcome::Conflict(ClaimConflict::AddressClaimed {
                address: address.to_string(),
                existing_username,
            }));
        }

        let record = UsernameRecord::new(username, address);
        match self.insert_record(&record).await {
            Ok(()) => {
                #[cfg(feature = "tracing")]
                tracing::info!(username, "username claimed");
                Ok(ClaimOutcome::Claimed(record))
            }
            Err(SparkhubError::UsernameTaken { username }) => {
                Ok(ClaimOutcome::Conflict(ClaimConflict::UsernameTaken { username }))
            }
            Err(SparkhubError::AddressClaimed {
                address,
                existing_username,
            }) => {
                let existing_username = holder_of(self, &address, existing_username).await?;
                Ok(ClaimOutcome::Conflict(ClaimConflict::AddressClaimed {
                    address,
                    existing_username,
                }))
            }
            Err(e) => Err(e),
        }
    }

    /// Re-associate an existing `username` with a new `address`.
    ///
    /// Fails with `NotFound` for unknown usernames and `AddressClaimed` when
    /// the address belongs to someone else. Re-asserting the current address
    /// only refreshes `updated_at`.
    async fn reassign(&self, username: &str, address: &str) -> Result<UsernameRecord> {
        validate_claim(username, address)?;

        if let Some(existing_username) = self.lookup_username(address).await? {
            if existing_username != username {
                return Err(SparkhubError::AddressClaimed {
                    address: address.to_string(),
                    existing_username,
                });
            }
        }

        let now = chrono::Utc::now().timestamp();
        match self.update_address(username, address, now).await {
            Ok(Some(record)) => Ok(record),
            Ok(None) => Err(SparkhubError::not_found("username", username)),
            Err(SparkhubError::AddressClaimed {
                address,
                existing_username,
            }) => {
                let existing_username = holder_of(self, &address, existing_username).await?;
                Err(SparkhubError::AddressClaimed {
                    address,
                    existing_username,
                })
            }
            Err(e) => Err(e),
        }
    }
}

/// Name the holder of `address` when the backend could not.
async fn holder_of<R: AddressRegistry + ?Sized>(
    registry: &R,
    address: &str,
    reported: String,
) -> Result<String> {
    if !reported.is_empty() {
        return Ok(reported);
    }
    Ok(registry.lookup_username(address).await?.unwrap_or_default())
}
