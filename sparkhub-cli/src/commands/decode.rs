//! Address decoding command

use anyhow::Result;
use sparkhub_lib::{AddressCodec, SparkNetwork};

use crate::ui;

pub fn run(address: &str, network: SparkNetwork, json: bool) -> Result<()> {
    let codec = AddressCodec::new(network);
    if !codec.is_recognized_address(address) {
        anyhow::bail!("Not a {} Spark address: {}", network, address);
    }

    let pubkey = codec.decode_to_pubkey_hex(address)?;

    if json {
        ui::json(&serde_json::json!({
            "address": address,
            "network": network.as_str(),
            "identityPubkey": pubkey,
        }));
    } else {
        ui::header("Spark Address");
        ui::field("Network", network.as_str());
        ui::field("Identity key", &pubkey);
    }
    Ok(())
}
