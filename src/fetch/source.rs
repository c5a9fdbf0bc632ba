//! The deferred-fetch capability and its per-node state.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::tree::{NodeId, Tree};

use super::FetchError;

/// Boxed future returned by a fetch.
pub type FetchFuture<T> = Pin<Box<dyn Future<Output = Result<T, FetchError>> + Send>>;

/// The capability a node registers to take part in deferred resolution.
///
/// The two halves mirror the two phases of synthesis:
///
/// - [`fetch`](DataSource::fetch) runs on the runtime during the resolve
///   pass, concurrently with every other pending fetch. It has no access
///   to the tree; the future it produces must stand on its own.
/// - [`on_fetched`](DataSource::on_fetched) runs synchronously during the
///   visit pass, after every fetch tree-wide has settled. It receives the
///   fetched value and may freely mutate the tree, typically adding child
///   nodes under its own node.
///
/// A source that needs per-fetch state should keep it behind interior
/// mutability: the same instance is shared between the fetch task and the
/// later visit.
#[async_trait]
pub trait DataSource: Send + Sync + 'static {
    /// The value produced by the fetch and handed to
    /// [`on_fetched`](DataSource::on_fetched).
    type Data: Send + 'static;

    /// Fetches the data. Invoked at most once per resolve pass.
    async fn fetch(&self) -> Result<Self::Data, FetchError>;

    /// Consumes the fetched data. Invoked exactly once, for exactly this
    /// node, and never before the fetch has settled.
    fn on_fetched(&self, data: Self::Data, tree: &mut Tree, node: NodeId);
}

/// A [`DataSource`] assembled from two closures, for nodes where a full
/// trait implementation is more ceremony than the job warrants.
///
/// ```ignore
/// tree.attach_source(
///     node,
///     FnSource::new(
///         || -> FetchFuture<Vec<String>> {
///             Box::pin(async { Ok(vec!["a".into(), "b".into()]) })
///         },
///         |items: Vec<String>, tree: &mut Tree, node: NodeId| {
///             for item in &items {
///                 Output::add(tree, node, item, item.as_str()).unwrap();
///             }
///         },
///     ),
/// )?;
/// ```
pub struct FnSource<T, P, C> {
    produce: P,
    consume: C,
    _data: PhantomData<fn() -> T>,
}

impl<T, P, C> FnSource<T, P, C>
where
    T: Send + 'static,
    P: Fn() -> FetchFuture<T> + Send + Sync + 'static,
    C: Fn(T, &mut Tree, NodeId) + Send + Sync + 'static,
{
    pub fn new(produce: P, consume: C) -> Self {
        Self {
            produce,
            consume,
            _data: PhantomData,
        }
    }
}

#[async_trait]
impl<T, P, C> DataSource for FnSource<T, P, C>
where
    T: Send + 'static,
    P: Fn() -> FetchFuture<T> + Send + Sync + 'static,
    C: Fn(T, &mut Tree, NodeId) + Send + Sync + 'static,
{
    type Data = T;

    async fn fetch(&self) -> Result<T, FetchError> {
        (self.produce)().await
    }

    fn on_fetched(&self, data: T, tree: &mut Tree, node: NodeId) {
        (self.consume)(data, tree, node)
    }
}

/// Type-erased fetched value. The typed source and its typed data meet
/// again inside [`SourceCell::consume`], so the downcast there can only
/// fail if cell construction were bypassed.
pub(crate) type ErasedData = Box<dyn Any + Send>;

/// Boxed future handed to the resolve pass for spawning.
pub(crate) type ErasedFetchFuture = FetchFuture<ErasedData>;

/// Object-safe face of a [`DataSource`], so slots of different data types
/// can live in one tree.
trait ErasedSource: Send {
    fn launch(&self) -> ErasedFetchFuture;
    fn consume(&self, data: ErasedData, tree: &mut Tree, node: NodeId);
}

/// The generic cell bridging a typed [`DataSource`] to [`ErasedSource`].
struct SourceCell<S: DataSource> {
    source: Arc<S>,
}

impl<S: DataSource> ErasedSource for SourceCell<S> {
    fn launch(&self) -> ErasedFetchFuture {
        let source = Arc::clone(&self.source);
        Box::pin(async move {
            let data = source.fetch().await?;
            Ok(Box::new(data) as ErasedData)
        })
    }

    fn consume(&self, data: ErasedData, tree: &mut Tree, node: NodeId) {
        let data = match data.downcast::<S::Data>() {
            Ok(data) => *data,
            Err(_) => panic!("fetched value does not match the source's data type"),
        };
        self.source.on_fetched(data, tree, node);
    }
}

/// Lifecycle of one node's deferred fetch.
///
/// Transitions are strictly forward: `Pending` → `InFlight` → `Fetched`
/// or `Failed`; a fetched slot is then consumed whole by the visit pass.
/// Keeping the value inside the state means a visit cannot read it
/// without matching on a settled variant.
enum FetchState {
    /// Registered, not yet launched.
    Pending,
    /// Launched by a resolve pass, not yet settled.
    InFlight,
    /// Settled successfully; the value awaits the visit pass.
    Fetched(ErasedData),
    /// Settled with an error; the node never reaches the visit pass.
    Failed(FetchError),
}

impl FetchState {
    fn tag(&self) -> &'static str {
        match self {
            FetchState::Pending => "pending",
            FetchState::InFlight => "in-flight",
            FetchState::Fetched(_) => "fetched",
            FetchState::Failed(_) => "failed",
        }
    }
}

/// A node's deferred-fetch slot: the registered source plus the state of
/// its fetch.
pub(crate) struct FetchSlot {
    source: Box<dyn ErasedSource>,
    state: FetchState,
}

impl FetchSlot {
    pub(crate) fn new<S: DataSource>(source: S) -> Self {
        Self {
            source: Box::new(SourceCell {
                source: Arc::new(source),
            }),
            state: FetchState::Pending,
        }
    }

    pub(crate) fn is_pending(&self) -> bool {
        matches!(self.state, FetchState::Pending)
    }

    pub(crate) fn is_in_flight(&self) -> bool {
        matches!(self.state, FetchState::InFlight)
    }

    pub(crate) fn is_fetched(&self) -> bool {
        matches!(self.state, FetchState::Fetched(_))
    }

    /// Marks the slot in flight and hands back the fetch future. The
    /// resolve pass only calls this on pending slots.
    pub(crate) fn begin(&mut self) -> ErasedFetchFuture {
        debug_assert!(self.is_pending(), "begin on a {} slot", self.state.tag());
        self.state = FetchState::InFlight;
        self.source.launch()
    }

    /// Records the settled outcome of the fetch.
    pub(crate) fn settle(&mut self, outcome: Result<ErasedData, FetchError>) {
        debug_assert!(self.is_in_flight(), "settle on a {} slot", self.state.tag());
        self.state = match outcome {
            Ok(data) => FetchState::Fetched(data),
            Err(err) => FetchState::Failed(err),
        };
    }

    /// Fires the one-shot visitor with the fetched value.
    ///
    /// # Panics
    ///
    /// Panics if the fetch has not settled successfully. The resolve pass
    /// upholds this ordering internally; hitting it means a caller drove
    /// the phases out of order, which is a bug rather than a recoverable
    /// condition.
    pub(crate) fn fire(self, tree: &mut Tree, node: NodeId) {
        match self.state {
            FetchState::Fetched(data) => self.source.consume(data, tree, node),
            FetchState::Pending | FetchState::InFlight => {
                panic!("visitor fired before its fetch settled")
            }
            FetchState::Failed(err) => {
                panic!("visitor fired for a failed fetch: {err}")
            }
        }
    }
}

impl fmt::Debug for FetchSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchSlot")
            .field("state", &self.state.tag())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Seven;

    #[async_trait]
    impl DataSource for Seven {
        type Data = u32;

        async fn fetch(&self) -> Result<u32, FetchError> {
            Ok(7)
        }

        fn on_fetched(&self, data: u32, tree: &mut Tree, node: NodeId) {
            let _ = tree.set_payload(node, data.into());
        }
    }

    #[test]
    fn slot_walks_the_state_machine_forward() {
        let mut slot = FetchSlot::new(Seven);
        assert!(slot.is_pending());
        let _future = slot.begin();
        assert!(slot.is_in_flight());
        slot.settle(Ok(Box::new(7u32)));
        assert!(slot.is_fetched());
    }

    #[test]
    fn failure_is_a_terminal_state() {
        let mut slot = FetchSlot::new(Seven);
        let _future = slot.begin();
        slot.settle(Err(FetchError::failed("boom")));
        assert!(!slot.is_pending());
        assert!(!slot.is_in_flight());
        assert!(!slot.is_fetched());
    }

    #[test]
    fn fired_slot_hands_the_value_to_the_consumer() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut slot = FetchSlot::new(Seven);
        let _future = slot.begin();
        slot.settle(Ok(Box::new(7u32)));
        slot.fire(&mut tree, root);
        assert_eq!(tree.payload(root), Some(&7u32.into()));
    }

    #[test]
    #[should_panic(expected = "before its fetch settled")]
    fn firing_an_unsettled_slot_panics() {
        let mut tree = Tree::new();
        let root = tree.root();
        let slot = FetchSlot::new(Seven);
        slot.fire(&mut tree, root);
    }

    #[test]
    #[should_panic(expected = "failed fetch")]
    fn firing_a_failed_slot_panics() {
        let mut tree = Tree::new();
        let root = tree.root();
        let mut slot = FetchSlot::new(Seven);
        let _future = slot.begin();
        slot.settle(Err(FetchError::failed("boom")));
        slot.fire(&mut tree, root);
    }
}
