//! Password-sealed storage for a wallet seed phrase.
//!
//! The vault combines scrypt key derivation with AES-256-GCM. The key is
//! derived from the user's password and a per-installation [device salt]
//! that is generated once and kept in the same key-value store as the sealed
//! secret. Neither the password nor the plaintext outlives a call.
//!
//! [device salt]: SecretVault::device_salt
//!
//! # Example
//!
//! ```rust,ignore
//! use sparkhub_lib::storage::InMemoryKeyValueStore;
//! use sparkhub_lib::vault::SecretVault;
//!
//! let vault = SecretVault::new(InMemoryKeyValueStore::new());
//! vault.save_secret("abandon ability able ...", "hunter2").await?;
//! let seed = vault.load_secret("hunter2").await?;
//! ```
//!
//! Callers must not run overlapping seal/unseal calls against the same store;
//! the underlying writes are not transactional.

mod sealed;
mod selftest;

pub use sealed::EncryptedSecret;
pub use selftest::{run_self_test, SelfTestReport};

use rand::RngCore;
use zeroize::{Zeroize, Zeroizing};

use crate::crypto::{derive_key, random_iv, KdfError, ScryptParams, SecretCipher, KEY_LEN};
use crate::storage::KeyValueStore;
use crate::{Result, SparkhubError};

/// Store key holding the sealed secret.
pub const SECRET_KEY: &str = "encrypted_secret";

/// Store key holding the device salt.
pub const DEVICE_SALT_KEY: &str = "device_salt";

const DEVICE_SALT_PREFIX: &str = "sparkhub-salt-";
const DEVICE_SALT_RANDOM_BYTES: usize = 32;

/// Salt fed to the KDF when no device salt is stored, so that unsealing
/// costs the same whether or not one exists.
const ABSENT_SALT: &str = "sparkhub-salt-absent";

/// Generate a new device salt: `sparkhub-salt-<64 hex chars>`.
pub fn generate_device_salt() -> String {
    let mut bytes = [0u8; DEVICE_SALT_RANDOM_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    format!("{}{}", DEVICE_SALT_PREFIX, hex::encode(bytes))
}

/// Seals and unseals a secret under a password.
pub struct SecretVault<S> {
    store: S,
    params: ScryptParams,
    #[cfg(test)]
    derivations: std::sync::atomic::AtomicUsize,
}

impl<S: KeyValueStore> SecretVault<S> {
    /// Create a vault over `store` with the default scrypt parameters.
    pub fn new(store: S) -> Self {
        Self {
            store,
            params: ScryptParams::default(),
            #[cfg(test)]
            derivations: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Override the scrypt parameters.
    ///
    /// Secrets sealed under one parameter set cannot be unsealed under another.
    pub fn with_params(mut self, params: ScryptParams) -> Self {
        self.params = params;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Return the device salt, creating and persisting it on first use.
    pub async fn device_salt(&self) -> Result<String> {
        if let Some(salt) = self.store.get(DEVICE_SALT_KEY).await? {
            if !salt.is_empty() {
                return Ok(salt);
            }
        }

        let salt = generate_device_salt();
        self.store.set(DEVICE_SALT_KEY, &salt).await?;

        #[cfg(feature = "tracing")]
        tracing::debug!("generated new device salt");

        Ok(salt)
    }

    /// Seal `plaintext` under `password`.
    ///
    /// Creates the device salt if none exists yet.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn seal(&self, plaintext: &str, password: &str) -> Result<EncryptedSecret> {
        let salt = self.device_salt().await?;
        let key = self
            .derive(password, &salt)
            .map_err(|e| SparkhubError::Internal(e.to_string()))?;

        let iv = random_iv();
        let sealed = SecretCipher::new(&key)
            .seal(&iv, plaintext.as_bytes())
            .map_err(|_| SparkhubError::CryptoFailure)?;

        Ok(EncryptedSecret {
            iv,
            tag: sealed.tag,
            ciphertext: sealed.ciphertext,
        })
    }

    /// Unseal an encoded secret with `password`.
    ///
    /// Every parse, derivation, authentication or UTF-8 failure is reported
    /// as [`SparkhubError::CryptoFailure`]. A missing device salt is reported
    /// the same way, since no secret can have been sealed without one.
    ///
    /// The key is derived before anything else is checked, so a malformed
    /// value or a missing salt takes as long to reject as a wrong password.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip_all))]
    pub async fn unseal(&self, encoded: &str, password: &str) -> Result<Zeroizing<String>> {
        let stored_salt = self
            .store
            .get(DEVICE_SALT_KEY)
            .await?
            .filter(|salt| !salt.is_empty());
        let salt = stored_salt.as_deref().unwrap_or(ABSENT_SALT);

        let key = self.derive(password, salt);
        let (Some(_), Ok(key)) = (stored_salt.as_ref(), key) else {
            return Err(SparkhubError::CryptoFailure);
        };
        let secret: EncryptedSecret = encoded.parse()?;

        self.open(&secret, &key)
    }

    fn derive(
        &self,
        password: &str,
        salt: &str,
    ) -> std::result::Result<Zeroizing<[u8; KEY_LEN]>, KdfError> {
        #[cfg(test)]
        self.derivations
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        derive_key(password, salt, &self.params)
    }

    fn open(&self, secret: &EncryptedSecret, key: &[u8; KEY_LEN]) -> Result<Zeroizing<String>> {
        let mut bytes = SecretCipher::new(key)
            .open(&secret.iv, &secret.ciphertext, &secret.tag)
            .map_err(|_| SparkhubError::CryptoFailure)?;

        match String::from_utf8(std::mem::take(&mut *bytes)) {
            Ok(text) => Ok(Zeroizing::new(text)),
            Err(err) => {
                err.into_bytes().zeroize();
                Err(SparkhubError::CryptoFailure)
            }
        }
    }

    /// Whether a non-empty sealed secret is stored. Never decrypts.
    pub async fn has_secret(&self) -> Result<bool> {
        Ok(self
            .store
            .get(SECRET_KEY)
            .await?
            .is_some_and(|value| !value.is_empty()))
    }

    /// Seal `plaintext` and persist it, replacing any previous secret.
    pub async fn save_secret(&self, plaintext: &str, password: &str) -> Result<()> {
        let sealed = self.seal(plaintext, password).await?;
        self.store.set(SECRET_KEY, &sealed.to_string()).await?;
        Ok(())
    }

    /// Load and unseal the persisted secret.
    pub async fn load_secret(&self, password: &str) -> Result<Zeroizing<String>> {
        let encoded = match self.store.get(SECRET_KEY).await? {
            Some(value) if !value.is_empty() => value,
            _ => return Err(SparkhubError::not_found("secret", SECRET_KEY)),
        };
        self.unseal(&encoded, password).await
    }

    /// Delete the persisted secret, and the device salt when asked to.
    pub async fn remove_secret(&self, clear_device_salt: bool) -> Result<()> {
        self.store.remove(SECRET_KEY).await?;
        if clear_device_salt {
            self.store.remove(DEVICE_SALT_KEY).await?;
        }
        Ok(())
    }

    /// Forget the device salt. A new one is generated on the next seal.
    ///
    /// Any secret sealed under the old salt becomes permanently unreadable.
    pub async fn reset_device_salt(&self) -> Result<()> {
        self.store.remove(DEVICE_SALT_KEY).await?;
        #[cfg(feature = "tracing")]
        tracing::warn!("device salt reset; existing sealed secrets are now unreadable");
        Ok(())
    }
}
