use tracing::debug;

use crate::fetch::{resolve_all, ResolveError};
use crate::tree::{NodeId, Synthesis, Tree};

/// The synthesis entry point.
///
/// `App` owns a [`Tree`] and drives it through a full synthesis: resolve
/// every pending fetch, run the visit pass, repeat until the tree is
/// quiet, then render. The sequencing is the load-bearing part — the
/// visit pass never starts unless the resolve pass before it finished
/// cleanly, so a visitor can rely on its own value being present, and on
/// every other node's fetch having settled too.
///
/// # Example
///
/// ```ignore
/// let mut app = App::new();
/// let root = app.root();
/// let api = app.tree_mut().add_node(root, "api")?;
/// app.tree_mut().attach_source(api, RegionListing::default())?;
/// let synthesis = app.synth().await?;
/// println!("{}", synthesis.to_json()?);
/// ```
pub struct App {
    tree: Tree,
}

impl App {
    pub fn new() -> Self {
        Self { tree: Tree::new() }
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    /// Runs resolve and visit passes to a fixed point, then renders.
    ///
    /// A visitor may attach new data sources while it mutates the tree;
    /// those are picked up by the next round, and each round keeps the
    /// full resolve-before-visit barrier. The loop ends when a round
    /// launches no fetch and fires no visitor.
    ///
    /// A failed fetch ends synthesis immediately: the error lists every
    /// node that failed in that round, and none of the round's visitors
    /// have run.
    pub async fn synth(mut self) -> Result<Synthesis, ResolveError> {
        let mut round = 0usize;
        loop {
            round += 1;
            let launched = resolve_all(&mut self.tree).await?;
            let fired = self.tree.run_visitors();
            debug!(round, launched, fired, "synthesis round finished");
            if launched == 0 && fired == 0 {
                break;
            }
        }
        Ok(self.tree.render())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
