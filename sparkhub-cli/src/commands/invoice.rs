//! Lightning Address invoice command

use anyhow::{Context, Result};
use sparkhub_lib::lnurl::{LightningAddress, LnurlClient};

use crate::ui;

pub async fn run(
    address: &str,
    amount_sats: u64,
    comment: Option<&str>,
    insecure: bool,
    json: bool,
) -> Result<()> {
    let address = LightningAddress::parse(address)?;

    let mut client = LnurlClient::new()?;
    if insecure {
        client = client.insecure();
    }

    let spinner = ui::busy(&format!("Resolving {}...", address));
    let pay_request = client.fetch_pay_request(&address).await;
    spinner.finish_and_clear();
    let pay_request =
        pay_request.with_context(|| format!("Failed to resolve {}", address))?;

    tracing::debug!(callback = %pay_request.callback, "pay request fetched");

    let invoice = client
        .request_invoice(&pay_request, amount_sats, comment)
        .await
        .context("Failed to obtain invoice")?;

    if json {
        ui::json(&serde_json::json!({
            "address": address.to_string(),
            "amountSats": amount_sats,
            "invoice": invoice,
        }));
        return Ok(());
    }

    ui::header("Invoice");
    ui::field("To", &address.to_string());
    ui::field("Amount", &format!("{} sats", amount_sats));
    if let Some(comment) = comment {
        ui::field("Comment", comment);
    }
    ui::invoice(&invoice);
    Ok(())
}
