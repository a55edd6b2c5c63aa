//! Vault self-test command

use anyhow::{Context, Result};
use sparkhub_lib::crypto::ScryptParams;
use sparkhub_lib::vault::run_self_test;

use crate::ui;

pub async fn run(log_n: Option<u8>, _verbose: bool) -> Result<()> {
    ui::header("Vault Self-Test");

    let params = match log_n {
        Some(log_n) => ScryptParams::default().with_log_n(log_n),
        None => ScryptParams::default(),
    };
    ui::field("scrypt", &format!("N=2^{} r={} p={}", params.log_n, params.r, params.p));

    let spinner = ui::busy("Sealing and unsealing...");
    let report = tokio::task::spawn_blocking(move || run_self_test(&params))
        .await
        .context("Self-test task panicked")?;
    spinner.finish_and_clear();

    let report = report?;
    ui::field("Ciphertext", &format!("{} bytes", report.ciphertext_len));
    ui::field("Elapsed", &format!("{} ms", report.elapsed.as_millis()));
    ui::success("Encryption round trip OK; wrong password rejected");
    Ok(())
}
