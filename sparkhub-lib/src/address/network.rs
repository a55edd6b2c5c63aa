//! Spark network selection and address prefixes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::SparkhubError;

/// Spark network selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SparkNetwork {
    /// Spark mainnet.
    #[default]
    Mainnet,
    /// Spark testnet.
    Testnet,
    /// Spark regtest.
    Regtest,
    /// Spark signet.
    Signet,
    /// Local development network.
    Local,
}

impl SparkNetwork {
    /// All networks.
    pub const ALL: [SparkNetwork; 5] = [
        Self::Mainnet,
        Self::Testnet,
        Self::Regtest,
        Self::Signet,
        Self::Local,
    ];

    /// Network name as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Regtest => "regtest",
            Self::Signet => "signet",
            Self::Local => "local",
        }
    }

    /// Current bech32m human-readable prefix.
    pub fn address_prefix(&self) -> &'static str {
        match self {
            Self::Mainnet => "spark",
            Self::Testnet => "sparkt",
            Self::Regtest => "sparkrt",
            Self::Signet => "sparks",
            Self::Local => "sparkl",
        }
    }

    /// Prefix used by older wallets, still accepted on decode.
    pub fn legacy_address_prefix(&self) -> &'static str {
        match self {
            Self::Mainnet => "sp",
            Self::Testnet => "spt",
            Self::Regtest => "sprt",
            Self::Signet => "sps",
            Self::Local => "spl",
        }
    }

    /// Whether `hrp` (lowercase) belongs to this network.
    pub fn accepts_prefix(&self, hrp: &str) -> bool {
        hrp == self.address_prefix() || hrp == self.legacy_address_prefix()
    }
}

impl fmt::Display for SparkNetwork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SparkNetwork {
    type Err = SparkhubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mainnet" | "main" => Ok(Self::Mainnet),
            "testnet" | "test" => Ok(Self::Testnet),
            "regtest" => Ok(Self::Regtest),
            "signet" => Ok(Self::Signet),
            "local" => Ok(Self::Local),
            other => Err(SparkhubError::invalid_data(
                "network",
                format!("unknown network '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_network() {
        assert_eq!("mainnet".parse::<SparkNetwork>().unwrap(), SparkNetwork::Mainnet);
        assert_eq!("REGTEST".parse::<SparkNetwork>().unwrap(), SparkNetwork::Regtest);
        assert_eq!("test".parse::<SparkNetwork>().unwrap(), SparkNetwork::Testnet);
        assert!("bitcoin".parse::<SparkNetwork>().is_err());
    }

    #[test]
    fn test_prefixes_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for network in SparkNetwork::ALL {
            assert!(seen.insert(network.address_prefix()));
            assert!(seen.insert(network.legacy_address_prefix()));
        }
    }

    #[test]
    fn test_accepts_prefix() {
        assert!(SparkNetwork::Mainnet.accepts_prefix("spark"));
        assert!(SparkNetwork::Mainnet.accepts_prefix("sp"));
        assert!(!SparkNetwork::Mainnet.accepts_prefix("sparkrt"));
        assert!(!SparkNetwork::Mainnet.accepts_prefix("bc"));
    }
}
