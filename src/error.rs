use thiserror::Error;

/// Errors reported by [`TreeNode`](crate::TreeNode) validation and parsing.
///
/// Tree construction itself never fails; these are opt-in checks.
#[derive(Error, Debug)]
pub enum TreeNodeError {
    /// The same non-empty id appears on more than one node.
    #[error("duplicate node id: {0}")]
    DuplicateId(String),

    /// The input is not a node structure in the expected JSON shape.
    #[cfg(feature = "serde")]
    #[error("invalid tree structure: {0}")]
    Parse(#[from] serde_json::Error),
}
