//! Calldata decode command

use anyhow::{bail, Context, Result};

use super::ToolResult;
use crate::domain::abi::{DecodeResult, SignatureKind, TreeSource};
use crate::infrastructure::abi::{
    decode_across_interfaces, decode_calldata, derive_sig_hash, parse_interface,
    SignatureResolver,
};

/// Decode `calldata` against `abi`, or against every signature the database
/// knows for its selector when no ABI is given
///
/// Several results mean several candidate signatures round-trip; picking one
/// is left to the reader.
pub async fn decode(
    calldata: &str,
    abi: Option<&str>,
    resolver: &SignatureResolver,
) -> Result<Vec<ToolResult>> {
    let calldata = calldata.trim();

    let results = match abi {
        Some(abi) => {
            let iface = parse_interface(abi).context("failed to parse ABI")?;
            decode_calldata(&iface, calldata).into_iter().collect::<Vec<_>>()
        }
        None => {
            let hash = derive_sig_hash(calldata)
                .with_context(|| format!("`{}` does not start with a 4-byte selector", calldata))?;
            let ifaces = resolver
                .resolve_interfaces(&hash, SignatureKind::Function)
                .await
                .context("signature lookup failed")?;
            if ifaces.is_empty() {
                bail!("no known signature for selector {}", hash);
            }
            decode_across_interfaces(&ifaces, calldata, decode_calldata)
        }
    };

    if results.is_empty() {
        bail!("no fragment matches this calldata");
    }
    results.iter().map(render_call).collect()
}

/// Labelled rows for one decoded call
pub fn render_call(result: &DecodeResult) -> Result<ToolResult> {
    let tree = result.tree()?;
    Ok(ToolResult::new(format!("{} {}", result.fragment.kind(), result.fragment.signature()))
        .add("selector", result.sighash.clone())
        .add_tree(&tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::abi::MemorySignatureCache;
    use crate::domain::abi::{ResolveError, SignatureCandidate, SignatureSource};
    use async_trait::async_trait;
    use std::sync::Arc;

    const TRANSFER: &str = "0xa9059cbb000000000000000000000000123456789012345678901234567890123456789000000000000000000000000000000000000000000000000000000000000003e8";

    struct Offline;

    #[async_trait]
    impl SignatureSource for Offline {
        async fn lookup(
            &self,
            hash: &str,
            _kind: SignatureKind,
        ) -> Result<Vec<SignatureCandidate>, ResolveError> {
            Err(ResolveError::Status {
                status: 503,
                hash: hash.to_string(),
            })
        }
    }

    fn offline() -> SignatureResolver {
        SignatureResolver::new(Arc::new(Offline), Arc::new(MemorySignatureCache::new()))
    }

    #[tokio::test]
    async fn test_decode_with_abi() {
        let results = decode(
            TRANSFER,
            Some("'function transfer(address to, uint256 amount)'"),
            &offline(),
        )
        .await
        .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "function transfer(address,uint256)");
        assert_eq!(results[0].get("selector"), Some("0xa9059cbb"));
        assert_eq!(results[0].get("amount (uint256)"), Some("1000"));
    }

    #[tokio::test]
    async fn test_no_match_is_an_error() {
        let err = decode(TRANSFER, Some("'function approve(address,uint256)'"), &offline())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("no fragment"));
    }

    #[tokio::test]
    async fn test_lookup_failure_surfaces() {
        let err = decode(TRANSFER, None, &offline()).await.unwrap_err();
        assert!(err.to_string().contains("signature lookup failed"));
    }
}
