//! Synthesis of the tree into its output document.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::info;

use super::Tree;

/// The rendered output document: every node payload keyed by node path.
///
/// A `BTreeMap` keeps the document deterministic regardless of the order
/// payloads were written in.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Synthesis {
    pub outputs: BTreeMap<String, Value>,
}

impl Synthesis {
    /// Serializes the document as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl Tree {
    /// Renders the tree into its output document.
    ///
    /// Purely synchronous and read-only; call it after the resolve and
    /// visit passes have settled the tree.
    pub fn render(&self) -> Synthesis {
        let mut outputs = BTreeMap::new();
        for id in self.node_ids() {
            if let Some(value) = self.payload(id) {
                outputs.insert(self.path(id), value.clone());
            }
        }
        info!(outputs = outputs.len(), "tree rendered");
        Synthesis { outputs }
    }
}
