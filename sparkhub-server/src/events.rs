//! Wallet event logging.

use sparkhub_lib::{ReadyWallet, WalletEvent};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Spawn a task that logs wallet notifications until the wallet goes away.
///
/// Returns `None` when the wallet produces no events.
pub fn spawn_event_logger(wallet: &ReadyWallet) -> Option<JoinHandle<()>> {
    let mut events = wallet.subscribe()?;

    Some(tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => log_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "wallet event logger fell behind");
                }
                Err(RecvError::Closed) => break,
            }
        }
    }))
}

fn log_event(event: &WalletEvent) {
    match event {
        WalletEvent::TransferClaimed {
            transfer_id,
            updated_balance,
        } => info!(
            "Transfer {} claimed. New balance: {}",
            transfer_id, updated_balance
        ),
    }
}
