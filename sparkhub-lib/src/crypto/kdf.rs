//! Password-based key derivation (scrypt).
//!
//! Passwords are NFC-normalized before hashing so that visually identical
//! input typed on different platforms derives the same key.

use scrypt::Params;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use zeroize::Zeroizing;

/// Length of every key this module derives, in bytes.
pub const KEY_LEN: usize = 32;

/// Key derivation error types.
#[derive(Debug, thiserror::Error)]
pub enum KdfError {
    #[error("Invalid scrypt parameters: {0}")]
    InvalidParams(String),
    #[error("Key derivation failed")]
    DerivationFailed,
}

/// Result type for key derivation.
pub type KdfResult<T> = Result<T, KdfError>;

/// scrypt cost parameters.
///
/// The defaults (`N = 2^10, r = 8, p = 1`, 32-byte output) must not change:
/// every sealed secret already on disk was derived with them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryptParams {
    /// log2 of the CPU/memory cost `N`.
    #[serde(default = "default_log_n")]
    pub log_n: u8,
    /// Block size.
    #[serde(default = "default_r")]
    pub r: u32,
    /// Parallelization.
    #[serde(default = "default_p")]
    pub p: u32,
    /// Output length in bytes. Only 32 is accepted.
    #[serde(default = "default_output_len")]
    pub output_len: usize,
}

fn default_log_n() -> u8 {
    10
}

fn default_r() -> u32 {
    8
}

fn default_p() -> u32 {
    1
}

fn default_output_len() -> usize {
    KEY_LEN
}

impl Default for ScryptParams {
    fn default() -> Self {
        Self {
            log_n: default_log_n(),
            r: default_r(),
            p: default_p(),
            output_len: default_output_len(),
        }
    }
}

impl ScryptParams {
    /// Parameters used by [`hash_string`].
    pub fn light() -> Self {
        Self {
            log_n: 6,
            ..Self::default()
        }
    }

    /// Set the cost exponent.
    pub fn with_log_n(mut self, log_n: u8) -> Self {
        self.log_n = log_n;
        self
    }

    fn to_scrypt(self) -> KdfResult<Params> {
        if self.output_len != KEY_LEN {
            return Err(KdfError::InvalidParams(format!(
                "output length must be {} bytes, got {}",
                KEY_LEN, self.output_len
            )));
        }
        Params::new(self.log_n, self.r, self.p, self.output_len)
            .map_err(|e| KdfError::InvalidParams(e.to_string()))
    }
}

fn normalize(input: &str) -> Zeroizing<String> {
    Zeroizing::new(input.nfc().collect())
}

/// Derive a 32-byte key from `password` and `salt`.
///
/// Deterministic for identical inputs.
pub fn derive_key(
    password: &str,
    salt: &str,
    params: &ScryptParams,
) -> KdfResult<Zeroizing<[u8; KEY_LEN]>> {
    let scrypt_params = params.to_scrypt()?;
    let password = normalize(password);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    scrypt::scrypt(
        password.as_bytes(),
        salt.as_bytes(),
        &scrypt_params,
        key.as_mut(),
    )
    .map_err(|_| KdfError::DerivationFailed)?;

    Ok(key)
}

/// Hash a string with light scrypt parameters and return lowercase hex.
///
/// Intended for stable, non-secret identifiers, not for sealing.
pub fn hash_string(input: &str, salt: &str) -> KdfResult<String> {
    let key = derive_key(input, salt, &ScryptParams::light())?;
    Ok(hex::encode(key.as_ref()))
}
