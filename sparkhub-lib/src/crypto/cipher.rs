//! AES-256-GCM with a 128-bit IV and a detached 128-bit tag.
//!
//! # Security Properties
//!
//! - **Confidentiality**: AES-256 in counter mode
//! - **Integrity**: the GCM tag covers the ciphertext; any flipped bit fails `open`
//! - **Fail closed**: `open` never hands back partial plaintext
//!
//! The 16-byte IV is hashed through GHASH to form the initial counter, which
//! keeps ciphertexts interoperable with existing sealed secrets.

use aes_gcm::aead::consts::U16;
use aes_gcm::aead::{AeadInPlace, KeyInit};
use aes_gcm::aes::Aes256;
use aes_gcm::{AesGcm, Key, Nonce, Tag};
use rand::RngCore;
use zeroize::Zeroizing;

use super::kdf::KEY_LEN;

/// IV length in bytes.
pub const IV_LEN: usize = 16;

/// Authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// Cipher error types.
///
/// `OpenFailed` is intentionally the only decryption error.
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    #[error("Encryption failed")]
    SealFailed,
    #[error("Decryption failed")]
    OpenFailed,
}

/// Result type for cipher operations.
pub type CipherResult<T> = Result<T, CipherError>;

/// Output of a seal operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sealed {
    /// Encrypted bytes, same length as the plaintext.
    pub ciphertext: Vec<u8>,
    /// GCM authentication tag.
    pub tag: [u8; TAG_LEN],
}

/// Authenticated cipher bound to one derived key.
pub struct SecretCipher {
    cipher: Aes256Gcm16,
}

impl SecretCipher {
    /// Create a cipher from a 256-bit key.
    pub fn new(key: &[u8; KEY_LEN]) -> Self {
        Self {
            cipher: Aes256Gcm16::new(Key::<Aes256Gcm16>::from_slice(key)),
        }
    }

    /// Encrypt `plaintext` under `iv`.
    pub fn seal(&self, iv: &[u8; IV_LEN], plaintext: &[u8]) -> CipherResult<Sealed> {
        let mut buffer = plaintext.to_vec();
        let tag = self
            .cipher
            .encrypt_in_place_detached(Nonce::<U16>::from_slice(iv), b"", &mut buffer)
            .map_err(|_| CipherError::SealFailed)?;

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(tag.as_slice());

        Ok(Sealed {
            ciphertext: buffer,
            tag: tag_bytes,
        })
    }

    /// Verify `tag` and decrypt `ciphertext`.
    pub fn open(
        &self,
        iv: &[u8; IV_LEN],
        ciphertext: &[u8],
        tag: &[u8; TAG_LEN],
    ) -> CipherResult<Zeroizing<Vec<u8>>> {
        let mut buffer = Zeroizing::new(ciphertext.to_vec());
        self.cipher
            .decrypt_in_place_detached(
                Nonce::<U16>::from_slice(iv),
                b"",
                buffer.as_mut_slice(),
                Tag::<U16>::from_slice(tag),
            )
            .map_err(|_| CipherError::OpenFailed)?;
        Ok(buffer)
    }
}

/// Generate a fresh random IV.
pub fn random_iv() -> [u8; IV_LEN] {
    let mut iv = [0u8; IV_LEN];
    rand::thread_rng().fill_bytes(&mut iv);
    iv
}
