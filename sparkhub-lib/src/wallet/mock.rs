//! Mock wallet for tests.
//!
//! Issues deterministic fake invoices, records every request and lets tests
//! inject failures and events.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;

use super::{WalletEvent, WalletExecutor, EVENT_CHANNEL_CAPACITY};
use crate::{Result, SparkhubError};

const MOCK_ADDRESS: &str = "spark1pgssxlr63wd3gyt99uzn9nwmjdncg6lfw6vamkuqf3u7aafuyzds9ny3u9ftwa";

/// One recorded invoice request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvoiceRequest {
    /// Receiver identity key
    pub receiver_pubkey_hex: String,
    /// Amount in sats
    pub amount_sats: u64,
    /// Invoice memo
    pub memo: String,
}

/// Mock [`WalletExecutor`].
pub struct MockWallet {
    fail_init: bool,
    simulate_failure: AtomicBool,
    initialized: AtomicBool,
    requests: Mutex<Vec<InvoiceRequest>>,
    events: broadcast::Sender<WalletEvent>,
}

impl Default for MockWallet {
    fn default() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            fail_init: false,
            simulate_failure: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            requests: Mutex::new(Vec::new()),
            events,
        }
    }
}

impl MockWallet {
    /// A wallet that works.
    pub fn new() -> Self {
        Self::default()
    }

    /// A wallet whose `init` fails.
    pub fn failing_init() -> Self {
        Self {
            fail_init: true,
            ..Self::default()
        }
    }

    /// Toggle invoice failures.
    pub fn set_failure(&self, fail: bool) {
        self.simulate_failure.store(fail, Ordering::SeqCst);
    }

    /// Whether `init` ran successfully.
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Invoice requests seen so far.
    pub fn requests(&self) -> Vec<InvoiceRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Push an event to subscribers. Returns the number of receivers.
    pub fn emit(&self, event: WalletEvent) -> usize {
        self.events.send(event).unwrap_or(0)
    }
}

/// Deterministic fake BOLT11 string for a request.
fn fake_invoice(pubkey: &str, amount_sats: u64, memo: &str) -> String {
    let mut hash: u64 = 5381;
    for byte in pubkey.bytes().chain(memo.bytes()) {
        hash = hash.wrapping_mul(33).wrapping_add(byte as u64);
    }
    format!("lnbc{}n1mock{:016x}", amount_sats * 10, hash)
}

#[async_trait]
impl WalletExecutor for MockWallet {
    async fn init(&self) -> Result<()> {
        if self.fail_init {
            return Err(SparkhubError::Upstream("Simulated init failure".to_string()));
        }
        self.initialized.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn create_invoice_for_pubkey(
        &self,
        receiver_pubkey_hex: &str,
        amount_sats: u64,
        memo: &str,
    ) -> Result<String> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(InvoiceRequest {
                receiver_pubkey_hex: receiver_pubkey_hex.to_string(),
                amount_sats,
                memo: memo.to_string(),
            });
        }

        if self.simulate_failure.load(Ordering::SeqCst) {
            return Err(SparkhubError::Upstream("Simulated failure".to_string()));
        }

        Ok(fake_invoice(receiver_pubkey_hex, amount_sats, memo))
    }

    async fn get_address(&self) -> Result<String> {
        Ok(MOCK_ADDRESS.to_string())
    }

    fn subscribe(&self) -> Option<broadcast::Receiver<WalletEvent>> {
        Some(self.events.subscribe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invoices_are_deterministic() {
        let wallet = MockWallet::new();
        let a = wallet.create_invoice_for_pubkey("02aa", 5, "hi").await.unwrap();
        let b = wallet.create_invoice_for_pubkey("02aa", 5, "hi").await.unwrap();
        let c = wallet.create_invoice_for_pubkey("02bb", 5, "hi").await.unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a.starts_with("lnbc50n1"));
    }

    #[tokio::test]
    async fn test_events_reach_subscribers() {
        let wallet = MockWallet::new();
        let mut rx = wallet.subscribe().unwrap();

        let delivered = wallet.emit(WalletEvent::TransferClaimed {
            transfer_id: "t-9".to_string(),
            updated_balance: 1500,
        });
        assert_eq!(delivered, 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(
            event,
            WalletEvent::TransferClaimed {
                transfer_id: "t-9".to_string(),
                updated_balance: 1500,
            }
        );
    }
}
