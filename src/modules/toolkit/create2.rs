//! CREATE2 address calculation

use alloy::primitives::{keccak256, Address, B256, U256};
use anyhow::{Context, Result};

use super::{strip_hex_prefix, ToolResult};

/// Address of the contract `deployer` creates with `salt` and `init_code_hash`
pub fn create2_address(deployer: Address, salt: B256, init_code_hash: B256) -> Address {
    deployer.create2(salt, init_code_hash)
}

/// 32-byte hex, or a decimal number left-padded to 32 bytes
fn parse_salt(salt: &str) -> Result<B256> {
    let salt = salt.trim();
    if let Ok(word) = salt.parse::<B256>() {
        return Ok(word);
    }
    let number: U256 = salt
        .parse()
        .with_context(|| format!("invalid salt `{}`", salt))?;
    Ok(B256::from(number.to_be_bytes::<32>()))
}

/// A 32-byte hash is taken as-is; anything else is init code to hash
fn parse_init_code(init_code: &str) -> Result<B256> {
    let bytes = hex::decode(strip_hex_prefix(init_code.trim()))
        .with_context(|| format!("invalid init code `{}`", init_code))?;
    if bytes.len() == 32 {
        Ok(B256::from_slice(&bytes))
    } else {
        Ok(keccak256(&bytes))
    }
}

/// `create2 <deployer> <salt> <init code or init code hash>`
pub fn create2(deployer: &str, salt: &str, init_code: &str) -> Result<ToolResult> {
    let deployer: Address = deployer
        .trim()
        .parse()
        .with_context(|| format!("invalid deployer address `{}`", deployer))?;
    let salt = parse_salt(salt)?;
    let init_code_hash = parse_init_code(init_code)?;

    Ok(ToolResult::new("CREATE2 Address")
        .add("deployer", deployer.to_checksum(None))
        .add("salt", salt.to_string())
        .add("initCodeHash", init_code_hash.to_string())
        .add("address", create2_address(deployer, salt, init_code_hash).to_checksum(None)))
}
