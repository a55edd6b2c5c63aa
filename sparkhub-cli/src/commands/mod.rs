//! CLI command implementations

pub mod decode;
pub mod hash;
pub mod invoice;
pub mod selftest;
pub mod vault;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sparkhub_lib::storage::FileKeyValueStore;
use sparkhub_lib::vault::SecretVault;
use zeroize::Zeroizing;

/// Environment variable consulted before prompting for the vault password.
pub const PASSWORD_ENV: &str = "SPARKHUB_VAULT_PASSWORD";

/// Path of the vault file inside the storage directory
pub fn vault_path(storage_dir: &Path) -> PathBuf {
    storage_dir.join("vault.json")
}

/// Open the vault stored under `storage_dir`
pub fn open_vault(storage_dir: &Path) -> SecretVault<FileKeyValueStore> {
    SecretVault::new(FileKeyValueStore::new(vault_path(storage_dir)))
}

/// Read the vault password from the environment or the terminal.
///
/// With `confirm`, an interactively entered password must be typed twice.
pub fn read_password(prompt: &str, confirm: bool) -> Result<Zeroizing<String>> {
    if let Ok(password) = std::env::var(PASSWORD_ENV) {
        if password.is_empty() {
            anyhow::bail!("{} is set but empty", PASSWORD_ENV);
        }
        return Ok(Zeroizing::new(password));
    }

    let password =
        Zeroizing::new(rpassword::prompt_password(prompt).context("Failed to read password")?);
    if password.is_empty() {
        anyhow::bail!("Password cannot be empty");
    }

    if confirm {
        let again = Zeroizing::new(
            rpassword::prompt_password("Confirm password: ")
                .context("Failed to read password confirmation")?,
        );
        if *password != *again {
            anyhow::bail!("Passwords do not match");
        }
    }

    Ok(password)
}
