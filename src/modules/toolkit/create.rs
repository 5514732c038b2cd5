//! CREATE address calculation

use alloy::primitives::Address;
use anyhow::{Context, Result};

use super::ToolResult;

/// Address of the contract `deployer` creates with `nonce`
pub fn create_address(deployer: Address, nonce: u64) -> Address {
    deployer.create(nonce)
}

/// `create <deployer> <nonce>`
pub fn create(deployer: &str, nonce: &str) -> Result<ToolResult> {
    let deployer: Address = deployer
        .trim()
        .parse()
        .with_context(|| format!("invalid deployer address `{}`", deployer))?;
    let nonce: u64 = nonce
        .trim()
        .parse()
        .with_context(|| format!("invalid nonce `{}`", nonce))?;

    Ok(ToolResult::new("CREATE Address")
        .add("deployer", deployer.to_checksum(None))
        .add("nonce", nonce.to_string())
        .add("address", create_address(deployer, nonce).to_checksum(None)))
}
