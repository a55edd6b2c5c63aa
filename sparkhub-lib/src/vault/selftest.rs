//! Startup self-check of the seal/unseal path.
//!
//! Seals a fixed payload under a fixed salt, then verifies that the
//! ciphertext differs from the plaintext, that the right password opens it
//! and that a wrong password does not.

use std::time::{Duration, Instant};

use crate::crypto::{derive_key, random_iv, ScryptParams, SecretCipher};
use crate::{Result, SparkhubError};

const PAYLOAD: &str = "really long data string bla bla bla bla bla bla bla bla bla bla bla bla bla";
const PASSWORD: &str = "password";
const WRONG_PASSWORD: &str = "passwordBad";
const SALT: &str = "53B63311-D2D5-4C62-9F7F-28F25447B825";

/// Outcome of a successful self-test.
#[derive(Clone, Debug)]
pub struct SelfTestReport {
    /// Length of the sealed payload in bytes.
    pub ciphertext_len: usize,
    /// Wall time spent, dominated by the two key derivations.
    pub elapsed: Duration,
}

fn check(condition: bool, what: &str) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(SparkhubError::Internal(format!("vault self-test failed: {}", what)))
    }
}

/// Run the self-test with `params`.
pub fn run_self_test(params: &ScryptParams) -> Result<SelfTestReport> {
    let started = Instant::now();

    let key = derive_key(PASSWORD, SALT, params).map_err(|e| SparkhubError::Internal(e.to_string()))?;
    let cipher = SecretCipher::new(&key);
    let iv = random_iv();
    let sealed = cipher
        .seal(&iv, PAYLOAD.as_bytes())
        .map_err(|_| SparkhubError::CryptoFailure)?;
    check(sealed.ciphertext != PAYLOAD.as_bytes(), "ciphertext equals plaintext")?;

    let opened = cipher
        .open(&iv, &sealed.ciphertext, &sealed.tag)
        .map_err(|_| SparkhubError::CryptoFailure)?;
    check(opened.as_slice() == PAYLOAD.as_bytes(), "round trip mismatch")?;

    let wrong_key =
        derive_key(WRONG_PASSWORD, SALT, params).map_err(|e| SparkhubError::Internal(e.to_string()))?;
    let rejected = SecretCipher::new(&wrong_key)
        .open(&iv, &sealed.ciphertext, &sealed.tag)
        .is_err();
    check(rejected, "wrong password was accepted")?;

    Ok(SelfTestReport {
        ciphertext_len: sealed.ciphertext.len(),
        elapsed: started.elapsed(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_test_passes_with_defaults() {
        let report = run_self_test(&ScryptParams::default()).unwrap();
        assert_eq!(report.ciphertext_len, PAYLOAD.len());
    }

    #[test]
    fn test_self_test_reports_bad_params() {
        let params = ScryptParams {
            output_len: 16,
            ..ScryptParams::default()
        };
        assert!(matches!(
            run_self_test(&params),
            Err(SparkhubError::Internal(_))
        ));
    }
}
