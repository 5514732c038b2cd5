//! Toolkit commands for conversion, decoding and encoding
//!
//! Each command validates its raw string input, runs the library operation
//! and returns labelled rows for the binary to print.

pub mod base;
pub mod convert;
pub mod create;
pub mod create2;
pub mod decode;
pub mod encode;
pub mod event;
pub mod fourbyte;
pub mod selector;
pub mod tx;
pub mod vanity;

use std::fmt;

use serde::Serialize;

use crate::domain::abi::TreeNode;

/// Result of a toolkit operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolResult {
    pub title: String,
    pub content: Vec<(String, String)>, // (label, value) pairs
}

impl ToolResult {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: Vec::new(),
        }
    }

    pub fn add(mut self, label: impl Into<String>, value: impl Into<String>) -> Self {
        self.content.push((label.into(), value.into()));
        self
    }

    /// Append decoded arguments, one row per leaf
    pub fn add_tree(mut self, tree: &[TreeNode]) -> Self {
        for node in tree {
            for (path, ty, value) in node.rows() {
                self.content.push((format!("{} ({})", path, ty), value));
            }
        }
        self
    }

    /// Value of the first row with `label`
    pub fn get(&self, label: &str) -> Option<&str> {
        self.content
            .iter()
            .find(|(k, _)| k == label)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for ToolResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        let width = self.content.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        for (label, value) in &self.content {
            writeln!(f, "{:<width$}  {}", label, value, width = width)?;
        }
        Ok(())
    }
}

/// Strip an optional `0x`/`0X` prefix
pub(crate) fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}
