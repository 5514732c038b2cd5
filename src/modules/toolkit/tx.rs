//! Raw transaction decode command

use anyhow::Result;

use super::ToolResult;
use crate::infrastructure::ethereum::decode_tx;

/// `tx <raw signed transaction>`
pub fn tx(raw: &str) -> Result<ToolResult> {
    let decoded = decode_tx(raw)?;

    let mut result = ToolResult::new("Transaction").add("from", decoded.sender.to_checksum(None));
    for (label, value) in decoded.tx.fields() {
        result = result.add(label, value);
    }
    Ok(result)
}
