//! The resolve pass: concurrent launch, one barrier.

use tracing::{debug, info, warn};

use crate::tree::Tree;

use super::error::{FailedFetch, FetchError, ResolveError};

/// Runs every pending fetch in `tree` to completion.
///
/// Discovery is a snapshot: only sources pending when the pass starts are
/// launched; sources attached later belong to a later pass. Every fetch
/// is spawned on the runtime before any is awaited, so the pass costs
/// about as long as the slowest fetch rather than the sum. The function
/// returns only once all of them have settled — the barrier the visit
/// pass relies on.
///
/// On failure the pass still waits for every fetch, then reports all
/// failed nodes at once. The visit pass must not run after an `Err`.
///
/// Returns the number of fetches launched.
pub async fn resolve_all(tree: &mut Tree) -> Result<usize, ResolveError> {
    let mut pending = Vec::new();
    for id in tree.node_ids() {
        let Some(slot) = tree.slot(id) else { continue };
        if slot.is_in_flight() {
            return Err(ResolveError::AlreadyInFlight {
                path: tree.path(id),
            });
        }
        if slot.is_pending() {
            pending.push(id);
        }
    }

    let mut in_flight = Vec::with_capacity(pending.len());
    for id in pending {
        let path = tree.path(id);
        let Some(slot) = tree.slot_mut(id) else { continue };
        let future = slot.begin();
        debug!(path = %path, "fetch launched");
        in_flight.push((id, path, tokio::spawn(future)));
    }
    let launched = in_flight.len();
    if launched > 0 {
        info!(launched, "resolve pass started");
    }

    let mut failures = Vec::new();
    for (id, path, handle) in in_flight {
        let outcome = match handle.await {
            Ok(Ok(data)) => Ok(data),
            Ok(Err(err)) => Err(err),
            Err(join_err) => Err(FetchError::TaskFailed(join_err.to_string())),
        };
        match outcome {
            Ok(data) => {
                debug!(path = %path, "fetch settled");
                if let Some(slot) = tree.slot_mut(id) {
                    slot.settle(Ok(data));
                }
            }
            Err(err) => {
                warn!(path = %path, error = %err, "fetch failed");
                if let Some(slot) = tree.slot_mut(id) {
                    slot.settle(Err(err.clone()));
                }
                failures.push(FailedFetch { path, error: err });
            }
        }
    }

    if failures.is_empty() {
        if launched > 0 {
            info!(launched, "resolve barrier crossed");
        }
        Ok(launched)
    } else {
        Err(ResolveError::Fetch(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::DataSource;
    use crate::tree::{NodeId, Tree};
    use async_trait::async_trait;

    struct Quick(u32);

    #[async_trait]
    impl DataSource for Quick {
        type Data = u32;

        async fn fetch(&self) -> Result<u32, FetchError> {
            Ok(self.0)
        }

        fn on_fetched(&self, data: u32, tree: &mut Tree, node: NodeId) {
            let _ = tree.set_payload(node, data.into());
        }
    }

    #[tokio::test]
    async fn empty_tree_resolves_immediately() {
        let mut tree = Tree::new();
        assert_eq!(resolve_all(&mut tree).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn settled_sources_are_not_launched_again() {
        let mut tree = Tree::new();
        let root = tree.root();
        let node = tree.add_node(root, "n").unwrap();
        tree.attach_source(node, Quick(1)).unwrap();
        assert_eq!(resolve_all(&mut tree).await.unwrap(), 1);
        // The slot is now fetched; a second pass has nothing pending.
        assert_eq!(resolve_all(&mut tree).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn in_flight_slot_aborts_the_pass() {
        let mut tree = Tree::new();
        let root = tree.root();
        let node = tree.add_node(root, "n").unwrap();
        tree.attach_source(node, Quick(1)).unwrap();
        // Simulate a concurrent pass having launched this fetch already.
        let _future = tree.slot_mut(node).unwrap().begin();
        let err = resolve_all(&mut tree).await.unwrap_err();
        assert_eq!(err, ResolveError::AlreadyInFlight { path: "n".into() });
    }
}
