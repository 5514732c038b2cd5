//! Event log decode command

use alloy::primitives::B256;
use anyhow::{bail, Context, Result};

use super::{strip_hex_prefix, ToolResult};
use crate::domain::abi::{DecodedEventResult, EventLog, SignatureKind, TreeSource};
use crate::infrastructure::abi::{
    decode_across_interfaces, decode_event, parse_interface, SignatureResolver,
};

/// Build a log from hex topics and data
pub fn parse_log(topics: &[String], data: &str) -> Result<EventLog> {
    let topics = topics
        .iter()
        .map(|topic| {
            topic
                .trim()
                .parse::<B256>()
                .with_context(|| format!("invalid topic `{}`", topic))
        })
        .collect::<Result<Vec<_>>>()?;
    let data = hex::decode(strip_hex_prefix(data.trim())).context("invalid log data")?;
    Ok(EventLog::new(topics, data))
}

/// Decode a log against `abi`, or against every event signature the database
/// knows for `topics[0]`
pub async fn decode_log(
    topics: &[String],
    data: &str,
    abi: Option<&str>,
    resolver: &SignatureResolver,
) -> Result<Vec<ToolResult>> {
    let log = parse_log(topics, data)?;
    let Some(topic) = log.topics.first() else {
        bail!("a log needs at least one topic");
    };

    let results = match abi {
        Some(abi) => {
            let iface = parse_interface(abi).context("failed to parse ABI")?;
            vec![decode_event(&iface, &log)?]
        }
        None => {
            let ifaces = resolver
                .resolve_interfaces(&topic.to_string(), SignatureKind::Event)
                .await
                .context("signature lookup failed")?;
            if ifaces.is_empty() {
                bail!("no known event signature for topic {}", topic);
            }
            let results = decode_across_interfaces(&ifaces, &log, |iface, log| {
                decode_event(iface, log)
                    .map_err(|e| tracing::debug!(error = %e, "candidate event rejected"))
                    .ok()
            });
            if results.is_empty() {
                bail!("no candidate event decodes this log");
            }
            results
        }
    };

    results.iter().map(render_event).collect()
}

/// Labelled rows for one decoded log
pub fn render_event(result: &DecodedEventResult) -> Result<ToolResult> {
    let tree = result.tree()?;
    Ok(ToolResult::new(format!("event {}", result.full_signature))
        .add("signature", result.signature.clone())
        .add(
            "arguments",
            if result.has_argument_names { "named" } else { "positional" },
        )
        .add_tree(&tree))
}
