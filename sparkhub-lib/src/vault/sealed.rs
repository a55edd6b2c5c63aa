//! Wire form of a sealed secret: `<ivHex>:<tagHex>:<ciphertextHex>`.

use std::fmt;
use std::str::FromStr;

use crate::crypto::{IV_LEN, TAG_LEN};
use crate::SparkhubError;

const DELIMITER: char = ':';

/// A secret sealed under a password-derived key.
///
/// `iv` is fresh for every seal, so sealing the same plaintext twice never
/// yields the same encoding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptedSecret {
    /// Random IV used for this seal.
    pub iv: [u8; IV_LEN],
    /// GCM authentication tag.
    pub tag: [u8; TAG_LEN],
    /// Encrypted bytes.
    pub ciphertext: Vec<u8>,
}

impl fmt::Display for EncryptedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}{}",
            hex::encode(self.iv),
            DELIMITER,
            hex::encode(self.tag),
            DELIMITER,
            hex::encode(&self.ciphertext)
        )
    }
}

impl FromStr for EncryptedSecret {
    type Err = SparkhubError;

    /// Parse the three-segment encoding.
    ///
    /// Every malformation maps to [`SparkhubError::CryptoFailure`]; the
    /// caller cannot tell a bad segment count from bad hex.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split(DELIMITER);
        let (Some(iv_hex), Some(tag_hex), Some(ct_hex), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(SparkhubError::CryptoFailure);
        };

        let mut iv = [0u8; IV_LEN];
        hex::decode_to_slice(iv_hex, &mut iv).map_err(|_| SparkhubError::CryptoFailure)?;

        let mut tag = [0u8; TAG_LEN];
        hex::decode_to_slice(tag_hex, &mut tag).map_err(|_| SparkhubError::CryptoFailure)?;

        let ciphertext = hex::decode(ct_hex).map_err(|_| SparkhubError::CryptoFailure)?;

        Ok(Self {
            iv,
            tag,
            ciphertext,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENCODED: &str =
        "000102030405060708090a0b0c0d0e0f:027b758b4897eaa37727e5a8b259b1e0:73983d58227e3918344ad7f0d197a5b01ce820ed";

    #[test]
    fn test_parse_and_display() {
        let secret: EncryptedSecret = ENCODED.parse().unwrap();
        assert_eq!(secret.iv[15], 0x0f);
        assert_eq!(secret.ciphertext.len(), 20);
        assert_eq!(secret.to_string(), ENCODED);
    }

    #[test]
    fn test_uppercase_hex_accepted() {
        let secret: EncryptedSecret = ENCODED.to_uppercase().parse().unwrap();
        assert_eq!(secret.to_string(), ENCODED);
    }

    #[test]
    fn test_malformed_inputs_collapse_to_crypto_failure() {
        let cases = [
            "",
            "abcd",
            "00:11",
            "000102030405060708090a0b0c0d0e0f:027b758b4897eaa37727e5a8b259b1e0:7398:00",
            // short IV
            "0001:027b758b4897eaa37727e5a8b259b1e0:73983d58",
            // non-hex tag
            "000102030405060708090a0b0c0d0e0f:zz7b758b4897eaa37727e5a8b259b1e0:73983d58",
            // odd-length ciphertext
            "000102030405060708090a0b0c0d0e0f:027b758b4897eaa37727e5a8b259b1e0:739",
        ];
        for case in cases {
            let err = case.parse::<EncryptedSecret>().unwrap_err();
            assert!(matches!(err, SparkhubError::CryptoFailure), "{case}");
        }
    }
}
