//! Wallet sidecar configuration.
//!
//! # Environment Variables
//!
//! - `SPARKHUB_WALLET_URL` - Sidecar REST base URL (required)
//! - `SPARKHUB_WALLET_API_KEY` - Bearer token sent with every request
//! - `SPARKHUB_WALLET_TIMEOUT` - Request timeout in seconds (default: 30)
//! - `SPARKHUB_WALLET_EVENT_POLL` - Event poll interval in seconds, 0 disables (default: 5)
//! - `SPARKHUB_NETWORK` - `mainnet`, `testnet`, `regtest`, `signet` or `local`

use serde::{Deserialize, Serialize};

use crate::address::SparkNetwork;

/// Configuration for the wallet sidecar executor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WalletConfig {
    /// REST base URL (e.g., "http://localhost:8787").
    pub base_url: String,

    /// Optional bearer token.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Network the wallet runs on.
    #[serde(default)]
    pub network: SparkNetwork,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Interval between event polls in seconds. 0 disables polling.
    #[serde(default = "default_event_poll")]
    pub event_poll_secs: u64,
}

fn default_timeout() -> u64 {
    30
}

fn default_event_poll() -> u64 {
    5
}

impl WalletConfig {
    /// Create a configuration for the sidecar at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            network: SparkNetwork::default(),
            timeout_secs: default_timeout(),
            event_poll_secs: default_event_poll(),
        }
    }

    /// Set the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the network.
    pub fn with_network(mut self, network: SparkNetwork) -> Self {
        self.network = network;
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set the event poll interval.
    pub fn with_event_poll(mut self, secs: u64) -> Self {
        self.event_poll_secs = secs;
        self
    }
}

/// Load wallet configuration from environment variables.
///
/// Returns `None` when `SPARKHUB_WALLET_URL` is unset. Unparseable optional
/// values fall back to their defaults.
pub fn wallet_config_from_env() -> Option<WalletConfig> {
    let url = std::env::var("SPARKHUB_WALLET_URL").ok()?;
    let mut config = WalletConfig::new(url);

    if let Ok(key) = std::env::var("SPARKHUB_WALLET_API_KEY") {
        if !key.is_empty() {
            config = config.with_api_key(key);
        }
    }

    if let Ok(timeout) = std::env::var("SPARKHUB_WALLET_TIMEOUT") {
        if let Ok(secs) = timeout.parse::<u64>() {
            config = config.with_timeout(secs);
        }
    }

    if let Ok(poll) = std::env::var("SPARKHUB_WALLET_EVENT_POLL") {
        if let Ok(secs) = poll.parse::<u64>() {
            config = config.with_event_poll(secs);
        }
    }

    if let Some(network) = network_from_env() {
        config = config.with_network(network);
    }

    Some(config)
}

/// Read `SPARKHUB_NETWORK`.
pub fn network_from_env() -> Option<SparkNetwork> {
    std::env::var("SPARKHUB_NETWORK")
        .ok()
        .and_then(|s| s.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = WalletConfig::new("http://localhost:8787")
            .with_api_key("secret")
            .with_network(SparkNetwork::Regtest)
            .with_timeout(10)
            .with_event_poll(0);

        assert_eq!(config.base_url, "http://localhost:8787");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.network, SparkNetwork::Regtest);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.event_poll_secs, 0);
    }

    #[test]
    fn test_serde_defaults() {
        let config: WalletConfig =
            serde_json::from_str(r#"{"base_url":"http://wallet"}"#).unwrap();
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.event_poll_secs, 5);
        assert_eq!(config.network, SparkNetwork::Mainnet);
        assert!(config.api_key.is_none());
    }
}
