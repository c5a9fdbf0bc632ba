//! The tree-wide visit pass.

use tracing::{debug, info};

use super::Tree;

impl Tree {
    /// Runs the global visit pass.
    ///
    /// Walks the tree depth-first in pre-order, children in insertion
    /// order, and fires every slot whose fetch has settled successfully.
    /// A slot is consumed when fired, so each visitor runs exactly once,
    /// for exactly its own node, in tree order rather than fetch
    /// completion order.
    ///
    /// Children created by a visitor are walked by the same pass (the
    /// child list is re-read after the parent fires). If such a child
    /// carries a source of its own, that source is still pending and is
    /// left for the next resolve pass.
    ///
    /// Returns the number of visitors fired.
    pub fn run_visitors(&mut self) -> usize {
        let mut fired = 0;
        let mut stack = vec![self.root()];
        while let Some(id) = stack.pop() {
            if let Some(slot) = self.take_slot_if_fetched(id) {
                debug!(path = %self.path(id), "visitor fired");
                slot.fire(self, id);
                fired += 1;
            }
            for &child in self.children(id).iter().rev() {
                stack.push(child);
            }
        }
        if fired > 0 {
            info!(fired, "visit pass complete");
        }
        fired
    }
}
