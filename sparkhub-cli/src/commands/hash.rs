//! Stable hash command

use anyhow::Result;
use sparkhub_lib::crypto::hash_string;

pub fn run(input: &str, salt: &str) -> Result<()> {
    let digest = hash_string(input, salt)?;
    println!("{}", digest);
    Ok(())
}
