//! Vanity address generator

use anyhow::{bail, Result};

use super::ToolResult;
use crate::infrastructure::ethereum::{search_for_matching_wallet, VanityPattern, Wallet};
use crate::infrastructure::runtime::{race_first_success, CancellationToken};

/// Search parameters
#[derive(Debug, Clone)]
pub struct VanityRequest {
    pub prefix: String,
    pub suffix: String,
    pub case_sensitive: bool,
    pub workers: usize,
    /// Attempts per worker; `None` searches until found or cancelled
    pub max_tries: Option<u64>,
}

/// Race `workers` rejection-sampling searches and keep the first wallet found
pub fn generate(request: &VanityRequest, cancel: &CancellationToken) -> Result<Option<Wallet>> {
    let pattern = VanityPattern::new(&request.prefix, &request.suffix, request.case_sensitive)?;
    tracing::info!(
        workers = request.workers,
        difficulty = pattern.difficulty(),
        "starting vanity search"
    );

    Ok(race_first_success(request.workers, cancel, |_, token| {
        search_for_matching_wallet(&pattern, request.max_tries, token)
    }))
}

/// `vanity [--prefix p] [--suffix s]`
pub fn vanity(request: &VanityRequest, cancel: &CancellationToken) -> Result<ToolResult> {
    let Some(wallet) = generate(request, cancel)? else {
        bail!("no matching address found within the try budget");
    };
    if !wallet.is_consistent() {
        bail!("generated key pair does not reproduce its address");
    }

    Ok(ToolResult::new("Vanity Address")
        .add("address", wallet.address.to_checksum(None))
        .add("privateKey", wallet.private_key_hex())
        .add("publicKey", wallet.public_key_hex()))
}
