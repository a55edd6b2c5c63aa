//! Resolver wired to in-memory collaborators.

use std::sync::Arc;

use crate::address::AddressCodec;
use crate::lnurl::{LnurlConfig, PaymentResolver};
use crate::registry::InMemoryAddressRegistry;
use crate::wallet::{MockWallet, ReadyWallet};

/// A resolver with handles to its registry and wallet.
pub struct TestHarness {
    /// Registry backing the resolver
    pub registry: Arc<InMemoryAddressRegistry>,
    /// Wallet backing the resolver
    pub wallet: Arc<MockWallet>,
    /// The resolver under test
    pub resolver: PaymentResolver,
}

impl TestHarness {
    /// Mainnet harness for `domain`.
    pub async fn new(domain: &str) -> Self {
        Self::with_config(LnurlConfig::new(domain), AddressCodec::default()).await
    }

    /// Harness with custom LNURL parameters and codec.
    ///
    /// # Panics
    ///
    /// Never in practice: the mock wallet's `init` only fails when built with
    /// [`MockWallet::failing_init`].
    pub async fn with_config(config: LnurlConfig, codec: AddressCodec) -> Self {
        let registry = Arc::new(InMemoryAddressRegistry::new());
        let wallet = Arc::new(MockWallet::new());
        let ready = ReadyWallet::init(wallet.clone())
            .await
            .expect("mock wallet init");
        let resolver = PaymentResolver::new(config, registry.clone(), ready, codec);

        Self {
            registry,
            wallet,
            resolver,
        }
    }
}
