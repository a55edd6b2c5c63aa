//! Cryptographic building blocks for the secret vault.
//!
//! - [`kdf`]: scrypt key derivation from a password and a device salt
//! - [`cipher`]: AES-256-GCM sealing with a 16-byte IV and detached tag

pub mod cipher;
pub mod kdf;

pub use cipher::{random_iv, CipherError, Sealed, SecretCipher, IV_LEN, TAG_LEN};
pub use kdf::{derive_key, hash_string, KdfError, ScryptParams, KEY_LEN};
