//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use sparkhub_lib::prelude::*;
//! ```

// Error handling
pub use crate::errors::{SparkhubError, SparkhubErrorCode};
pub use crate::Result;

// Addresses
pub use crate::address::{AddressCodec, SparkNetwork};

// Registry
pub use crate::registry::{
    AddressRegistry, ClaimConflict, ClaimOutcome, InMemoryAddressRegistry, UsernameRecord,
};

// Vault
pub use crate::crypto::ScryptParams;
pub use crate::storage::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
pub use crate::vault::{EncryptedSecret, SecretVault};

// Wallet
pub use crate::wallet::{HttpWalletExecutor, ReadyWallet, WalletConfig, WalletEvent, WalletExecutor};

// LNURL
pub use crate::lnurl::{
    CallbackOutcome, LightningAddress, LnurlClient, LnurlConfig, PaymentResolver, RejectReason,
};
