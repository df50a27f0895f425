use rustc_hash::{FxBuildHasher, FxHashSet};

use crate::error::TreeNodeError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Structural id of the node that is rendered without a collapse class.
pub const ROOT_ID: &str = "root";

/// Input structure for the selector, immutable once constructed.
///
/// A node is a leaf iff it has no children; the constructors normalise an
/// absent or empty child list into [`TreeNode::Leaf`], so every consumer
/// matches on exactly two shapes.
///
/// With the `serde` feature enabled, nodes use the host JSON shape
/// (`id`, `labelValue`, `checked`, optional `nestedStructure`).
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "RawNode", into = "RawNode"))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TreeNode {
    /// Selectable unit without children.
    Leaf {
        id: String,
        label: String,
        checked: bool,
    },
    /// Group of one or more nodes; never empty.
    Branch {
        id: String,
        label: String,
        checked: bool,
        children: Vec<TreeNode>,
    },
}

impl TreeNode {
    /// Creates a leaf node.
    pub fn leaf(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self::Leaf {
            id: id.into(),
            label: label.into(),
            checked: false,
        }
    }

    /// Creates a branch node; an empty `children` list yields a leaf.
    pub fn branch(
        id: impl Into<String>,
        label: impl Into<String>,
        children: impl IntoIterator<Item = Self>,
    ) -> Self {
        Self::from_parts(id, label, Some(children.into_iter().collect()))
    }

    /// Builds a node from an optional child list.
    pub fn from_parts(
        id: impl Into<String>,
        label: impl Into<String>,
        children: Option<Vec<Self>>,
    ) -> Self {
        let id = id.into();
        let label = label.into();
        match children {
            Some(children) if !children.is_empty() => Self::Branch {
                id,
                label,
                checked: false,
                children,
            },
            _ => Self::Leaf {
                id,
                label,
                checked: false,
            },
        }
    }

    /// Sets the `checked` flag.
    pub fn with_checked(mut self, value: bool) -> Self {
        match &mut self {
            Self::Leaf { checked, .. } | Self::Branch { checked, .. } => *checked = value,
        }
        self
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Leaf { id, .. } | Self::Branch { id, .. } => id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::Leaf { label, .. } | Self::Branch { label, .. } => label,
        }
    }

    pub const fn is_checked(&self) -> bool {
        match self {
            Self::Leaf { checked, .. } | Self::Branch { checked, .. } => *checked,
        }
    }

    /// Returns the node's children (empty for leaves).
    pub fn children(&self) -> &[Self] {
        match self {
            Self::Leaf { .. } => &[],
            Self::Branch { children, .. } => children,
        }
    }

    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    pub const fn is_branch(&self) -> bool {
        matches!(self, Self::Branch { .. })
    }

    /// Pre-order iterator over this node and all of its descendants.
    pub fn depth_first(&self) -> DepthFirst<'_> {
        DepthFirst { stack: vec![self] }
    }

    /// Number of nodes in the structure, including this one.
    pub fn node_count(&self) -> usize {
        self.depth_first().count()
    }

    /// Number of leaves in the structure.
    pub fn leaf_count(&self) -> usize {
        self.depth_first().filter(|node| node.is_leaf()).count()
    }

    /// Fails on the first repeated id among the nodes a build would visit.
    ///
    /// Nodes with an empty id are skipped together with their subtree, the
    /// same way tree construction skips them.
    pub fn validate(&self) -> Result<(), TreeNodeError> {
        let mut seen = FxHashSet::with_capacity_and_hasher(self.node_count(), FxBuildHasher);
        Self::collect_ids(self, &mut seen)
    }

    fn collect_ids<'a>(
        node: &'a Self,
        seen: &mut FxHashSet<&'a str>,
    ) -> Result<(), TreeNodeError> {
        if node.id().is_empty() {
            return Ok(());
        }
        if !seen.insert(node.id()) {
            return Err(TreeNodeError::DuplicateId(node.id().to_string()));
        }
        for child in node.children() {
            Self::collect_ids(child, seen)?;
        }
        Ok(())
    }

    /// Parses a node structure from its JSON representation.
    ///
    /// Nesting depth is not capped; the stack grows on demand while parsing.
    #[cfg(feature = "serde")]
    pub fn from_json(input: &str) -> Result<Self, TreeNodeError> {
        let mut json = serde_json::Deserializer::from_str(input);
        json.disable_recursion_limit();
        let node = Self::deserialize(serde_stacker::Deserializer::new(&mut json))?;
        json.end()?;
        Ok(node)
    }
}

/// Pre-order traversal returned by [`TreeNode::depth_first`].
pub struct DepthFirst<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for DepthFirst<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNode {
    id: String,
    label_value: String,
    #[serde(default)]
    checked: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    nested_structure: Option<Vec<TreeNode>>,
}

#[cfg(feature = "serde")]
impl From<RawNode> for TreeNode {
    fn from(raw: RawNode) -> Self {
        Self::from_parts(raw.id, raw.label_value, raw.nested_structure).with_checked(raw.checked)
    }
}

#[cfg(feature = "serde")]
impl From<TreeNode> for RawNode {
    fn from(node: TreeNode) -> Self {
        match node {
            TreeNode::Leaf { id, label, checked } => Self {
                id,
                label_value: label,
                checked,
                nested_structure: None,
            },
            TreeNode::Branch {
                id,
                label,
                checked,
                children,
            } => Self {
                id,
                label_value: label,
                checked,
                nested_structure: Some(children),
            },
        }
    }
}
