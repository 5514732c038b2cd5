//! Selector and topic calculation for every fragment of an ABI

use anyhow::Result;

use super::ToolResult;
use crate::domain::abi::FragmentKind;
use crate::infrastructure::abi::parse_interface;

/// One fragment's canonical signature and hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentHash {
    pub kind: FragmentKind,
    pub signature: String,
    /// 4-byte selector, 32-byte topic, or `None` for unhashed fragments
    pub hash: Option<String>,
}

/// Hash every fragment of `abi`, in source order
pub fn fragment_hashes(abi: &str) -> Result<Vec<FragmentHash>> {
    let iface = parse_interface(abi)?;
    Ok(iface
        .fragments()
        .iter()
        .map(|fragment| {
            let hash = fragment
                .selector()
                .map(|selector| selector.to_string())
                .or_else(|| fragment.topic().map(|topic| topic.to_string()));
            FragmentHash {
                kind: fragment.kind(),
                signature: fragment.signature(),
                hash,
            }
        })
        .collect())
}

/// `sig <abi>`
pub fn selector(abi: &str) -> Result<ToolResult> {
    let mut result = ToolResult::new("Selectors");
    for row in fragment_hashes(abi)? {
        result = result.add(
            format!("{} {}", row.kind, row.signature),
            row.hash.unwrap_or_else(|| "-".into()),
        );
    }
    Ok(result)
}
