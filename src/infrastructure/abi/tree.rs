//! Display trees and value formatting for decoded arguments

use alloy_dyn_abi::DynSolValue;
use alloy_json_abi::Param;

use super::error::TreeError;
use crate::domain::abi::TreeNode;

/// Pair each parameter with its decoded value, recursing into tuples
pub fn build_tree(params: &[Param], values: &[DynSolValue]) -> Result<Vec<TreeNode>, TreeError> {
    if params.len() != values.len() {
        return Err(TreeError::LengthMismatch {
            params: params.len(),
            values: values.len(),
        });
    }

    params
        .iter()
        .zip(values)
        .enumerate()
        .map(|(idx, (param, value))| build_node(idx, param, value))
        .collect()
}

fn build_node(idx: usize, param: &Param, value: &DynSolValue) -> Result<TreeNode, TreeError> {
    let name = if param.name.trim().is_empty() {
        format!("arg{}", idx)
    } else {
        param.name.clone()
    };

    if param.ty == "tuple" {
        let DynSolValue::Tuple(fields) = value else {
            return Err(TreeError::ShapeMismatch {
                name,
                ty: param.ty.clone(),
            });
        };
        return Ok(TreeNode::Tree {
            name,
            ty: param.ty.clone(),
            children: build_tree(&param.components, fields)?,
        });
    }

    // Arrays stay leaves: their elements share one type
    let value = match value {
        DynSolValue::Array(items) | DynSolValue::FixedArray(items) => items
            .iter()
            .map(format_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => format_value(other),
    };

    Ok(TreeNode::Leaf {
        name,
        ty: param.selector_type().into_owned(),
        value,
    })
}

/// Format a DynSolValue for display
pub fn format_value(value: &DynSolValue) -> String {
    match value {
        DynSolValue::Bool(b) => b.to_string(),
        DynSolValue::Int(i, _) => i.to_string(),
        DynSolValue::Uint(u, _) => u.to_string(),
        DynSolValue::FixedBytes(word, size) => {
            let bytes = &word.as_slice()[..(*size).min(32)];
            format!("0x{}", hex::encode(bytes))
        }
        DynSolValue::Address(addr) => addr.to_checksum(None),
        DynSolValue::Function(func) => format!("0x{}", hex::encode(func.as_slice())),
        DynSolValue::Bytes(bytes) => format!("0x{}", hex::encode(bytes)),
        DynSolValue::String(s) => s.clone(),
        DynSolValue::Array(arr) | DynSolValue::FixedArray(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            format!("[{}]", items.join(", "))
        }
        DynSolValue::Tuple(fields) => {
            let items: Vec<String> = fields.iter().map(format_value).collect();
            format!("({})", items.join(", "))
        }
        #[allow(unreachable_patterns)]
        other => format!("{:?}", other),
    }
}
