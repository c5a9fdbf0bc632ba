//! The node arena: a rooted tree of named configuration nodes.
//!
//! # Main Components
//!
//! - [`Tree`] - Arena owning every node; nodes are addressed by [`NodeId`].
//! - [`Tree::run_visitors`] - The deterministic tree-wide visit pass.
//! - [`Tree::render`] - Synthesis of the tree into a [`Synthesis`] document.
//!
//! Nodes carry an optional render payload and, for nodes taking part in
//! deferred resolution, a fetch slot registered via
//! [`Tree::attach_source`]. Everything here runs synchronously; the only
//! asynchronous work in the crate lives in [`crate::fetch`].

mod error;
mod node;
mod render;
mod visit;

pub use error::TreeError;
pub use node::NodeId;
pub use render::Synthesis;

use serde_json::Value;
use tracing::debug;

use crate::fetch::{DataSource, FetchSlot};

use node::Node;

/// A rooted tree of named nodes.
///
/// The arena starts with a root node and only ever grows; ids stay valid
/// for the lifetime of the tree. Sibling names are unique, which makes
/// the slash-joined path a stable identity for every node.
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Creates a tree holding only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(None, "")],
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends a child named `name` under `parent`.
    ///
    /// Names must be non-empty, must not contain `/`, and must be unique
    /// among their siblings.
    pub fn add_node(&mut self, parent: NodeId, name: &str) -> Result<NodeId, TreeError> {
        self.check(parent)?;
        if name.is_empty() || name.contains('/') {
            return Err(TreeError::InvalidName(name.to_string()));
        }
        let clash = self.nodes[parent.0]
            .children
            .iter()
            .any(|&child| self.nodes[child.0].name == name);
        if clash {
            return Err(TreeError::DuplicateName {
                parent: self.path(parent),
                name: name.to_string(),
            });
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(Some(parent), name));
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// The node's own name. The root's name is empty.
    pub fn name(&self, id: NodeId) -> &str {
        &self.nodes[id.0].name
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Children in insertion order. This order is what the visit pass and
    /// the rendered document follow.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Slash-joined chain of names from the root; the root itself renders
    /// as the empty string.
    pub fn path(&self, id: NodeId) -> String {
        let mut names = Vec::new();
        let mut cursor = Some(id);
        while let Some(node_id) = cursor {
            let node = &self.nodes[node_id.0];
            if node.parent.is_some() {
                names.push(node.name.as_str());
            }
            cursor = node.parent;
        }
        names.reverse();
        names.join("/")
    }

    /// All node ids in creation order.
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Sets the value [`Tree::render`] emits for this node.
    pub fn set_payload(&mut self, id: NodeId, value: Value) -> Result<(), TreeError> {
        self.check(id)?;
        self.nodes[id.0].payload = Some(value);
        Ok(())
    }

    pub fn payload(&self, id: NodeId) -> Option<&Value> {
        self.nodes[id.0].payload.as_ref()
    }

    /// Registers a deferred data source on `id`.
    ///
    /// Registration is eager, execution is not: the source stays inert
    /// until a resolve pass launches its fetch and a later visit pass
    /// hands the fetched value back to it.
    pub fn attach_source<S: DataSource>(&mut self, id: NodeId, source: S) -> Result<(), TreeError> {
        self.check(id)?;
        if self.nodes[id.0].slot.is_some() {
            return Err(TreeError::SourceAlreadyAttached(self.path(id)));
        }
        self.nodes[id.0].slot = Some(FetchSlot::new(source));
        debug!(path = %self.path(id), "data source attached");
        Ok(())
    }

    fn check(&self, id: NodeId) -> Result<(), TreeError> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id))
        }
    }

    pub(crate) fn slot(&self, id: NodeId) -> Option<&FetchSlot> {
        self.nodes[id.0].slot.as_ref()
    }

    pub(crate) fn slot_mut(&mut self, id: NodeId) -> Option<&mut FetchSlot> {
        self.nodes[id.0].slot.as_mut()
    }

    /// Takes the node's slot out if its fetch settled successfully,
    /// leaving pending and in-flight slots in place for a later pass.
    pub(crate) fn take_slot_if_fetched(&mut self, id: NodeId) -> Option<FetchSlot> {
        let node = &mut self.nodes[id.0];
        match &node.slot {
            Some(slot) if slot.is_fetched() => node.slot.take(),
            _ => None,
        }
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn paths_chain_names_from_the_root() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.add_node(root, "a").unwrap();
        let b = tree.add_node(a, "b").unwrap();
        assert_eq!(tree.path(root), "");
        assert_eq!(tree.path(a), "a");
        assert_eq!(tree.path(b), "a/b");
        assert_eq!(tree.parent(b), Some(a));
        assert_eq!(tree.name(b), "b");
    }

    #[test]
    fn sibling_names_must_be_unique() {
        let mut tree = Tree::new();
        let root = tree.root();
        tree.add_node(root, "a").unwrap();
        let err = tree.add_node(root, "a").unwrap_err();
        assert_eq!(
            err,
            TreeError::DuplicateName {
                parent: String::new(),
                name: "a".into()
            }
        );
        // Same name under a different parent is fine.
        let b = tree.add_node(root, "b").unwrap();
        assert!(tree.add_node(b, "a").is_ok());
    }

    #[test]
    fn names_cannot_be_empty_or_contain_separators() {
        let mut tree = Tree::new();
        let root = tree.root();
        assert_eq!(
            tree.add_node(root, "").unwrap_err(),
            TreeError::InvalidName(String::new())
        );
        assert_eq!(
            tree.add_node(root, "a/b").unwrap_err(),
            TreeError::InvalidName("a/b".into())
        );
    }

    #[test]
    fn children_keep_insertion_order() {
        let mut tree = Tree::new();
        let root = tree.root();
        let ids: Vec<_> = ["x", "y", "z"]
            .iter()
            .map(|name| tree.add_node(root, name).unwrap())
            .collect();
        assert_eq!(tree.children(root), ids.as_slice());
        assert_eq!(tree.node_count(), 4);
    }

    #[test]
    fn render_collects_payloads_by_path() {
        let mut tree = Tree::new();
        let root = tree.root();
        let a = tree.add_node(root, "a").unwrap();
        tree.set_payload(a, json!({"k": 1})).unwrap();
        let synthesis = tree.render();
        assert_eq!(synthesis.outputs.len(), 1);
        assert_eq!(synthesis.outputs.get("a"), Some(&json!({"k": 1})));
    }

    #[test]
    fn foreign_ids_are_rejected() {
        let mut tree = Tree::new();
        let mut other = Tree::new();
        let foreign = other.add_node(other.root(), "x").unwrap();
        assert_eq!(
            tree.add_node(foreign, "y").unwrap_err(),
            TreeError::UnknownNode(foreign)
        );
    }
}
