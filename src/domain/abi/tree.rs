//! Display tree for decoded arguments

use serde::Serialize;

/// One node of a decoded-argument tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "lowercase")]
pub enum TreeNode {
    Leaf {
        name: String,
        #[serde(rename = "type")]
        ty: String,
        value: String,
    },
    Tree {
        name: String,
        #[serde(rename = "type")]
        ty: String,
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    pub fn name(&self) -> &str {
        match self {
            Self::Leaf { name, .. } | Self::Tree { name, .. } => name,
        }
    }

    pub fn ty(&self) -> &str {
        match self {
            Self::Leaf { ty, .. } | Self::Tree { ty, .. } => ty,
        }
    }

    /// Flatten into `(path, type, value)` rows, depth first
    pub fn rows(&self) -> Vec<(String, String, String)> {
        let mut out = Vec::new();
        self.collect_rows("", &mut out);
        out
    }

    fn collect_rows(&self, prefix: &str, out: &mut Vec<(String, String, String)>) {
        let path = if prefix.is_empty() {
            self.name().to_string()
        } else {
            format!("{}.{}", prefix, self.name())
        };
        match self {
            Self::Leaf { ty, value, .. } => out.push((path, ty.clone(), value.clone())),
            Self::Tree { children, .. } => {
                for child in children {
                    child.collect_rows(&path, out);
                }
            }
        }
    }
}
