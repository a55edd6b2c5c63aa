//! SparkHub library.
//!
//! Building blocks for a Lightning Address service on top of Spark:
//!
//! - **Secret vault**: password-sealed storage for a wallet seed, using
//!   scrypt and AES-256-GCM with a per-device salt
//! - **Address codec**: bech32m Spark addresses to identity public keys
//! - **Address registry**: a username ⇄ Spark address bijection
//! - **Payment resolver**: LNURL-pay metadata and invoice callbacks
//!
//! Storage and the wallet are injected through traits; the crate holds no
//! global state.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use sparkhub_lib::prelude::*;
//!
//! let registry = Arc::new(InMemoryAddressRegistry::new());
//! registry.claim("alice", "spark1pgss...").await?;
//!
//! let wallet = ReadyWallet::init(Arc::new(HttpWalletExecutor::new(config)?)).await?;
//! let resolver = PaymentResolver::new(
//!     LnurlConfig::new("sparkhub.example"),
//!     registry,
//!     wallet,
//!     AddressCodec::default(),
//! );
//! let outcome = resolver.callback(Some("alice"), Some("5000"), None).await?;
//! ```

pub mod address;
pub mod crypto;
pub mod errors;
pub mod lnurl;
pub mod prelude;
pub mod registry;
pub mod storage;
pub mod vault;
pub mod wallet;

/// Test utilities: address fixtures and vault vectors.
///
/// This module is only available with the `test-utils` feature or in test builds.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use address::{AddressCodec, SparkNetwork};
pub use errors::{SparkhubError, SparkhubErrorCode};
pub use lnurl::{CallbackOutcome, LnurlConfig, PaymentResolver};
pub use registry::{AddressRegistry, ClaimConflict, ClaimOutcome, UsernameRecord};
pub use vault::{EncryptedSecret, SecretVault};
pub use wallet::{ReadyWallet, WalletEvent, WalletExecutor};

/// Common result alias for SparkHub operations.
pub type Result<T> = std::result::Result<T, SparkhubError>;
