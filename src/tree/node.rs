//! Node storage for the arena.

use serde_json::Value;

use crate::fetch::FetchSlot;

/// Identifies a node within one [`Tree`](super::Tree).
///
/// Ids are plain indices: cheap to copy and stable for the lifetime of the
/// tree, since nodes are never removed. An id is only meaningful for the
/// tree that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// A single node in the arena.
///
/// Identity is parent + name; the slash-joined name chain is the node's
/// path, used as its stable identity in diagnostics and render output.
pub(crate) struct Node {
    pub(crate) parent: Option<NodeId>,
    pub(crate) name: String,
    pub(crate) children: Vec<NodeId>,
    /// Value emitted for this node by [`Tree::render`](super::Tree::render).
    pub(crate) payload: Option<Value>,
    /// Deferred-fetch capability, present only on nodes that registered one.
    pub(crate) slot: Option<FetchSlot>,
}

impl Node {
    pub(crate) fn new(parent: Option<NodeId>, name: impl Into<String>) -> Self {
        Self {
            parent,
            name: name.into(),
            children: Vec::new(),
            payload: None,
            slot: None,
        }
    }
}
