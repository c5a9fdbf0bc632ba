//! Error types for the node arena.

use thiserror::Error;

use super::NodeId;

/// Errors that can occur while building or mutating the tree.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TreeError {
    /// The node id does not belong to this tree.
    #[error("unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// A sibling with the same name already exists under the parent.
    #[error("duplicate child name {name:?} under {parent:?}")]
    DuplicateName { parent: String, name: String },

    /// Node names must be non-empty and must not contain `/`.
    #[error("invalid node name {0:?}")]
    InvalidName(String),

    /// The node already carries a data source.
    #[error("node {0:?} already has a data source attached")]
    SourceAlreadyAttached(String),
}
