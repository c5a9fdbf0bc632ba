use serde_json::Value;

use crate::tree::{NodeId, Tree, TreeError};

/// A leaf node carrying a literal value into the rendered document.
///
/// Outputs are fully synchronous: they render whether or not any sibling
/// is still waiting on a fetch. A [`DataSource`](crate::DataSource)
/// consumer will typically fan its fetched data out into one `Output` per
/// element.
pub struct Output;

impl Output {
    /// Adds an output node named `name` under `parent`.
    pub fn add(
        tree: &mut Tree,
        parent: NodeId,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<NodeId, TreeError> {
        let id = tree.add_node(parent, name)?;
        tree.set_payload(id, value.into())?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn outputs_render_under_their_path() {
        let mut tree = Tree::new();
        let root = tree.root();
        let group = tree.add_node(root, "group").unwrap();
        Output::add(&mut tree, group, "answer", 42).unwrap();
        let synthesis = tree.render();
        assert_eq!(synthesis.outputs.get("group/answer"), Some(&json!(42)));
    }
}
