//! Seed vault commands

use std::io::BufRead;
use std::path::Path;

use anyhow::{Context, Result};
use sparkhub_lib::storage::KeyValueStore;
use sparkhub_lib::vault::DEVICE_SALT_KEY;
use sparkhub_lib::SparkhubError;
use zeroize::Zeroizing;

use super::{open_vault, read_password, vault_path};
use crate::ui;

/// Seal a seed phrase and store it
pub async fn save(storage_dir: &Path, from_stdin: bool, force: bool, verbose: bool) -> Result<()> {
    ui::header("Save Seed Phrase");

    let vault = open_vault(storage_dir);
    if vault.has_secret().await?
        && !ui::confirm_destructive("A seed is already stored. Replace it?", force)?
    {
        ui::info("Cancelled");
        return Ok(());
    }

    let seed = if from_stdin {
        let mut line = Zeroizing::new(String::new());
        std::io::stdin()
            .lock()
            .read_line(&mut line)
            .context("Failed to read seed from stdin")?;
        Zeroizing::new(ui::normalize_seed(&line))
    } else {
        Zeroizing::new(ui::seed_input("Seed phrase")?)
    };
    if seed.is_empty() {
        anyhow::bail!("Seed phrase cannot be empty");
    }

    let password = read_password("Vault password: ", true)?;

    if verbose {
        ui::info("Deriving key and sealing...");
    }
    let spinner = ui::busy("Sealing seed...");
    let result = vault.save_secret(&seed, &password).await;
    spinner.finish_and_clear();
    result?;

    ui::success(&format!("Seed sealed to {}", vault_path(storage_dir).display()));
    ui::warning("Without the password the seed cannot be recovered.");
    Ok(())
}

/// Unseal and print the stored seed phrase
pub async fn show(storage_dir: &Path, _verbose: bool) -> Result<()> {
    let vault = open_vault(storage_dir);
    if !vault.has_secret().await? {
        ui::error("No seed stored");
        ui::info("Run 'sparkhub vault save' to store one");
        return Ok(());
    }

    let password = read_password("Vault password: ", false)?;
    match vault.load_secret(&password).await {
        Ok(seed) => {
            ui::warning("Anyone who sees this can spend your funds.");
            ui::reveal_secret(seed.as_str());
            Ok(())
        }
        Err(SparkhubError::CryptoFailure) => {
            anyhow::bail!("Failed to decrypt data: wrong password or corrupted vault")
        }
        Err(e) => Err(e.into()),
    }
}

/// Show vault state without decrypting
pub async fn status(storage_dir: &Path, _verbose: bool) -> Result<()> {
    let vault = open_vault(storage_dir);
    let has_secret = vault.has_secret().await?;
    let has_salt = vault
        .store()
        .get(DEVICE_SALT_KEY)
        .await?
        .is_some_and(|salt| !salt.is_empty());

    ui::header("Vault Status");
    ui::field("File", &vault_path(storage_dir).display().to_string());
    ui::field("Seed stored", if has_secret { "yes" } else { "no" });
    ui::field("Device salt", if has_salt { "present" } else { "not created" });

    if has_secret && !has_salt {
        ui::warning("A seed is stored but the device salt is missing; it cannot be unsealed.");
    }
    Ok(())
}

/// Delete the stored seed, optionally with the device salt
pub async fn remove(storage_dir: &Path, clear_salt: bool, yes: bool, _verbose: bool) -> Result<()> {
    let vault = open_vault(storage_dir);
    if !ui::confirm_destructive("Delete the stored seed?", yes)? {
        ui::info("Cancelled");
        return Ok(());
    }

    vault.remove_secret(clear_salt).await?;
    ui::success(if clear_salt {
        "Seed and device salt removed"
    } else {
        "Seed removed"
    });
    Ok(())
}

/// Forget the device salt
pub async fn reset_salt(storage_dir: &Path, yes: bool, _verbose: bool) -> Result<()> {
    let vault = open_vault(storage_dir);
    if vault.has_secret().await? {
        ui::warning("The stored seed will become permanently unreadable.");
    }
    if !ui::confirm_destructive("Reset the device salt?", yes)? {
        ui::info("Cancelled");
        return Ok(());
    }

    vault.reset_device_salt().await?;
    ui::success("Device salt reset; a new one is created on the next save");
    Ok(())
}
