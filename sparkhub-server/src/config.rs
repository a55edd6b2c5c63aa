//! Configuration for the SparkHub server.

use std::env;

use sparkhub_lib::wallet::{network_from_env, wallet_config_from_env, WalletConfig};
use sparkhub_lib::SparkNetwork;

/// Default SQLite database.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://sparkhub.db";

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Public domain of the Lightning Addresses, e.g. `sparkhub.example`.
    pub domain: String,

    /// SQLite connection URL.
    pub database_url: String,

    /// HTTP port.
    pub port: u16,

    /// Pool size.
    pub db_max_connections: u32,

    /// Spark network the server resolves addresses for.
    pub network: SparkNetwork,

    /// Wallet sidecar connection.
    pub wallet: WalletConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `SPARKHUB_DOMAIN`: public domain
    /// - `SPARKHUB_WALLET_URL`: wallet sidecar base URL
    ///
    /// Optional:
    /// - `DATABASE_URL` (default: `sqlite://sparkhub.db`)
    /// - `PORT` (default: 3000)
    /// - `SPARKHUB_DB_MAX_CONNECTIONS` (default: 5)
    /// - `SPARKHUB_NETWORK` (default: mainnet)
    /// - `SPARKHUB_WALLET_API_KEY`, `SPARKHUB_WALLET_TIMEOUT`, `SPARKHUB_WALLET_EVENT_POLL`
    pub fn from_env() -> Result<Self, ConfigError> {
        let domain =
            env::var("SPARKHUB_DOMAIN").map_err(|_| ConfigError::MissingEnv("SPARKHUB_DOMAIN"))?;
        if domain.trim().is_empty() {
            return Err(ConfigError::Invalid("SPARKHUB_DOMAIN", domain));
        }

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let port = parse_or("PORT", 3000)?;
        let db_max_connections = parse_or("SPARKHUB_DB_MAX_CONNECTIONS", 5)?;

        let network = match env::var("SPARKHUB_NETWORK") {
            Ok(raw) => network_from_env().ok_or(ConfigError::Invalid("SPARKHUB_NETWORK", raw))?,
            Err(_) => SparkNetwork::default(),
        };

        let wallet = wallet_config_from_env()
            .ok_or(ConfigError::MissingEnv("SPARKHUB_WALLET_URL"))?
            .with_network(network);

        Ok(Self {
            domain: domain.trim().to_string(),
            database_url,
            port,
            db_max_connections,
            network,
            wallet,
        })
    }

    /// HTTP bind address.
    pub fn http_addr(&self) -> std::net::SocketAddr {
        ([0, 0, 0, 0], self.port).into()
    }
}

fn parse_or<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key, raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_addr() {
        let config = Config {
            domain: "sparkhub.example".to_string(),
            database_url: DEFAULT_DATABASE_URL.to_string(),
            port: 3000,
            db_max_connections: 5,
            network: SparkNetwork::Mainnet,
            wallet: WalletConfig::new("http://localhost:8787"),
        };
        assert_eq!(config.http_addr().port(), 3000);
    }

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::MissingEnv("SPARKHUB_DOMAIN").to_string(),
            "missing required environment variable: SPARKHUB_DOMAIN"
        );
        assert_eq!(
            ConfigError::Invalid("PORT", "abc".to_string()).to_string(),
            "invalid value for PORT: \"abc\""
        );
    }
}
