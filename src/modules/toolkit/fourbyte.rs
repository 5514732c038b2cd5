//! 4byte.directory lookup command

use anyhow::{Context, Result};
use futures::future::try_join_all;

use super::ToolResult;
use crate::domain::abi::{SignatureCandidate, SignatureKind};
use crate::infrastructure::abi::SignatureResolver;

/// Function selectors are 4 bytes, event topics 32
pub fn kind_for_hash(hash: &str) -> SignatureKind {
    if hash.trim().len() > 10 {
        SignatureKind::Event
    } else {
        SignatureKind::Function
    }
}

/// `lookup <hash>`
pub async fn fourbyte(hash: &str, resolver: &SignatureResolver) -> Result<ToolResult> {
    let kind = kind_for_hash(hash);
    let candidates = resolver
        .resolve(hash, kind)
        .await
        .with_context(|| format!("failed to look up {}", hash.trim()))?;
    Ok(render_candidates(hash.trim(), kind, &candidates))
}

/// Look up several hashes at once; repeated hashes share one request
pub async fn fourbyte_many(hashes: &[String], resolver: &SignatureResolver) -> Result<Vec<ToolResult>> {
    try_join_all(hashes.iter().map(|hash| fourbyte(hash, resolver))).await
}

/// One row per candidate, oldest registration first
pub fn render_candidates(hash: &str, kind: SignatureKind, candidates: &[SignatureCandidate]) -> ToolResult {
    let mut result = ToolResult::new(format!("{} signatures for {}", kind, hash));
    if candidates.is_empty() {
        return result.add("result", "unknown signature");
    }

    let mut sorted: Vec<&SignatureCandidate> = candidates.iter().collect();
    sorted.sort_by_key(|candidate| candidate.created_at);
    for candidate in sorted {
        result = result.add(
            format!("#{} ({})", candidate.id, candidate.created_at.format("%Y-%m-%d")),
            candidate.text_signature.clone(),
        );
    }
    result
}
