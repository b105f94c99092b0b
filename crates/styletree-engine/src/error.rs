use crate::tree::NodeId;

/// Failures inside the editing core.
///
/// None of these are fatal: the public operations log them and fall back to
/// leaving the tree (or the selection) as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("no selection")]
    NoSelection,
    #[error("cannot split {0}: not a text node")]
    InvalidSplitTarget(NodeId),
    #[error("{0} has no parent")]
    Detached(NodeId),
    #[error("{node} is not inside {root}")]
    MappingMiss { node: NodeId, root: NodeId },
    #[error("unknown node {0}")]
    UnknownNode(NodeId),
}
