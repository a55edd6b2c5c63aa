//! Spark address handling.

mod codec;
mod network;

pub use codec::{AddressCodec, PUBKEY_HEX_LEN};
pub use network::SparkNetwork;
