//! bech32m Spark address to identity public key.
//!
//! The address payload is a stream of 5-bit words. Decoding repacks them
//! MSB-first into bytes, drops any trailing partial byte and hex-encodes the
//! result. Current addresses wrap the 33-byte key in a two-byte field header,
//! so the hex is trimmed from the front to the final 66 characters.

use bech32::Variant;

use super::network::SparkNetwork;
use crate::{Result, SparkhubError};

/// Hex length of a compressed secp256k1 public key.
pub const PUBKEY_HEX_LEN: usize = 66;

/// Decodes Spark addresses for one network.
#[derive(Clone, Copy, Debug, Default)]
pub struct AddressCodec {
    network: SparkNetwork,
}

impl AddressCodec {
    /// Codec accepting addresses of `network`.
    pub fn new(network: SparkNetwork) -> Self {
        Self { network }
    }

    /// The network whose prefixes this codec accepts.
    pub fn network(&self) -> SparkNetwork {
        self.network
    }

    fn decode_words(&self, address: &str) -> Option<Vec<u8>> {
        let (hrp, words, variant) = bech32::decode(address).ok()?;
        if variant != Variant::Bech32m || !self.network.accepts_prefix(&hrp) {
            return None;
        }
        Some(words.iter().map(|w| w.to_u8()).collect())
    }

    /// Decode `address` to the receiver's public key as lowercase hex.
    ///
    /// Fails with [`SparkhubError::InvalidAddress`] on checksum, variant or
    /// prefix mismatch, or when the payload holds no whole byte.
    ///
    /// Hex longer than 66 characters loses leading characters one at a time
    /// until 66 remain, which can split a byte when the excess is odd. Hex
    /// shorter than 66 characters is returned unchanged. Both behaviours are
    /// kept for compatibility with invoices already issued.
    pub fn decode_to_pubkey_hex(&self, address: &str) -> Result<String> {
        let words = self
            .decode_words(address)
            .ok_or(SparkhubError::InvalidAddress)?;

        let bytes = repack_words(&words);
        if bytes.is_empty() {
            return Err(SparkhubError::InvalidAddress);
        }

        let hex = hex::encode(bytes);
        let excess = hex.len().saturating_sub(PUBKEY_HEX_LEN);
        Ok(hex[excess..].to_string())
    }

    /// Whether `input` is a checksummed address of this codec's network.
    pub fn is_recognized_address(&self, input: &str) -> bool {
        self.decode_words(input).is_some()
    }
}

/// Repack 5-bit words into bytes, MSB first, discarding leftover bits.
fn repack_words(words: &[u8]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(words.len() * 5 / 8);
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;

    for &word in words {
        acc = ((acc << 5) | u32::from(word & 0x1f)) & 0xfff;
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            bytes.push((acc >> bits) as u8);
        }
    }

    bytes
}
