//! Calldata decoding with a round-trip check, using alloy-dyn-abi

use alloy_dyn_abi::{DynSolType, DynSolValue, Specifier};
use alloy_json_abi::Param;
use tracing::debug;

use super::error::TreeError;
use super::tree::build_tree;
use crate::domain::abi::{DecodeResult, Interface, TreeNode, TreeSource};

/// Decode `calldata` against every function and error in `iface`
///
/// A fragment only matches when re-encoding its decoded values reproduces the
/// calldata byte for byte, which rules out decodes that silently ignore
/// trailing data. If several fragments match, the last one wins.
///
/// # Returns
/// * `Some(DecodeResult)` - a fragment round-tripped
/// * `None` - malformed hex, no selector, or no fragment matched
pub fn decode_calldata(iface: &Interface, calldata: &str) -> Option<DecodeResult> {
    let data = decode_hex(calldata)?;
    if data.len() < 4 {
        return None;
    }

    let mut matched = None;
    for fragment in iface.fragments() {
        let Some(selector) = fragment.selector() else {
            continue;
        };
        if selector.as_slice() != &data[..4] {
            continue;
        }

        if let Some(values) = decode_exact(&fragment.inputs(), &data) {
            matched = Some(DecodeResult {
                values,
                fragment: fragment.clone(),
                sighash: format!("0x{}", hex::encode(selector.as_slice())),
            });
        }
    }
    matched
}

/// Apply `decode_one` to every candidate interface, keeping the successes in order
pub fn decode_across_interfaces<P, R, F>(ifaces: &[Interface], payload: &P, mut decode_one: F) -> Vec<R>
where
    P: ?Sized,
    F: FnMut(&Interface, &P) -> Option<R>,
{
    ifaces
        .iter()
        .filter_map(|iface| decode_one(iface, payload))
        .collect()
}

/// Decode the arguments after the selector and require an exact re-encoding
fn decode_exact(params: &[Param], calldata: &[u8]) -> Option<Vec<DynSolValue>> {
    let types = params
        .iter()
        .map(|param| param.resolve())
        .collect::<Result<Vec<DynSolType>, _>>()
        .map_err(|e| debug!(error = %e, "unresolvable parameter type"))
        .ok()?;

    let decoded = DynSolType::Tuple(types)
        .abi_decode_params(&calldata[4..])
        .map_err(|e| debug!(error = %e, "calldata does not decode"))
        .ok()?;
    let DynSolValue::Tuple(values) = decoded else {
        return None;
    };

    let mut reencoded = calldata[..4].to_vec();
    reencoded.extend_from_slice(&DynSolValue::Tuple(values.clone()).abi_encode_params());
    if reencoded != calldata {
        debug!(
            expected = calldata.len(),
            actual = reencoded.len(),
            "ignoring partial decode"
        );
        return None;
    }
    Some(values)
}

fn decode_hex(input: &str) -> Option<Vec<u8>> {
    let input = input.trim();
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    hex::decode(digits).ok()
}

impl TreeSource for DecodeResult {
    type Error = TreeError;

    fn tree(&self) -> Result<Vec<TreeNode>, TreeError> {
        build_tree(&self.fragment.inputs(), &self.values)
    }
}
