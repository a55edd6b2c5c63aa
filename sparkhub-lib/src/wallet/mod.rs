//! Wallet collaborator.
//!
//! The wallet issues Lightning invoices on behalf of Spark identities and
//! reports transfers it has claimed. It is an injected dependency with an
//! explicit lifecycle: a [`ReadyWallet`] can only be obtained from a wallet
//! whose `init` succeeded.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   create_invoice_for_pubkey   ┌──────────────────┐
//! │ PaymentResolver  │ ────────────────────────────▶ │   ReadyWallet    │
//! └──────────────────┘                               │  ┌────────────┐  │
//!                                                    │  │ Executor   │  │
//! ┌──────────────────┐   broadcast<WalletEvent>      │  │ - Http     │  │
//! │  event observer  │ ◀──────────────────────────── │  │ - Mock     │  │
//! └──────────────────┘                               │  └────────────┘  │
//!                                                    └──────────────────┘
//! ```

mod config;
mod http;

#[cfg(any(test, feature = "test-utils"))]
mod mock;

pub use config::{network_from_env, wallet_config_from_env, WalletConfig};
pub use http::HttpWalletExecutor;

#[cfg(any(test, feature = "test-utils"))]
pub use mock::{InvoiceRequest, MockWallet};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::Result;

/// Capacity of wallet event channels.
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Notification pushed by the wallet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum WalletEvent {
    /// An incoming transfer was claimed.
    #[serde(rename_all = "camelCase")]
    TransferClaimed {
        /// Transfer identifier
        transfer_id: String,
        /// Wallet balance after the claim, in sats
        updated_balance: u64,
    },
}

/// Operations the server needs from a Spark wallet.
#[async_trait]
pub trait WalletExecutor: Send + Sync {
    /// Bring the wallet online. Called exactly once by [`ReadyWallet::init`].
    async fn init(&self) -> Result<()>;

    /// Issue a Lightning invoice paying `receiver_pubkey_hex`.
    ///
    /// Returns the BOLT11-encoded invoice.
    async fn create_invoice_for_pubkey(
        &self,
        receiver_pubkey_hex: &str,
        amount_sats: u64,
        memo: &str,
    ) -> Result<String>;

    /// The wallet's own Spark address.
    async fn get_address(&self) -> Result<String>;

    /// Subscribe to wallet notifications, if the executor produces any.
    fn subscribe(&self) -> Option<broadcast::Receiver<WalletEvent>> {
        None
    }
}

/// A wallet whose initialization succeeded.
#[derive(Clone)]
pub struct ReadyWallet {
    executor: Arc<dyn WalletExecutor>,
}

impl std::fmt::Debug for ReadyWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReadyWallet").finish_non_exhaustive()
    }
}

impl ReadyWallet {
    /// Initialize `executor` and wrap it.
    ///
    /// Failure here is meant to be fatal for a server.
    pub async fn init(executor: Arc<dyn WalletExecutor>) -> Result<Self> {
        #[cfg(feature = "tracing")]
        tracing::info!("Wallet initializing...");

        executor.init().await?;

        #[cfg(feature = "tracing")]
        tracing::info!("Wallet initialized successfully");

        Ok(Self { executor })
    }

    /// Issue an invoice for `receiver_pubkey_hex`. Single attempt.
    pub async fn create_invoice_for_pubkey(
        &self,
        receiver_pubkey_hex: &str,
        amount_sats: u64,
        memo: &str,
    ) -> Result<String> {
        self.executor
            .create_invoice_for_pubkey(receiver_pubkey_hex, amount_sats, memo)
            .await
    }

    /// The wallet's own Spark address.
    pub async fn get_address(&self) -> Result<String> {
        self.executor.get_address().await
    }

    /// Subscribe to wallet notifications.
    pub fn subscribe(&self) -> Option<broadcast::Receiver<WalletEvent>> {
        self.executor.subscribe()
    }
}
