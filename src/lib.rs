//! # Treesynth
//!
//! > **A recipe for deferred data fetching in configuration trees.**
//!
//! This crate lets a node in a configuration tree declare that it needs
//! to fetch data asynchronously before the tree is rendered, while the
//! rendering pass itself stays fully synchronous.
//!
//! ## 🏗️ Design Philosophy
//!
//! Synthesis runs in two phases with one hard ordering guarantee between
//! them:
//!
//! 1. **Resolve**: every pending fetch across the whole tree runs
//!    concurrently, and the pass waits for all of them to settle.
//! 2. **Visit**: a single deterministic walk hands each fetched value to
//!    its node, which may now mutate the tree synchronously — typically
//!    by adding child nodes.
//!
//! No visitor runs until every fetch tree-wide has settled. Fetches never
//! see the tree and visitors never suspend, so the mutable tree is only
//! ever touched from one phase at a time and needs no locking.
//!
//! ## 🚀 Core Concepts
//!
//! ### The `DataSource` capability
//! A node opts into deferred resolution by registering a
//! [`DataSource`]: an asynchronous `fetch` paired with a synchronous
//! `on_fetched` consumer of the same typed value. Registration happens at
//! tree-build time; nothing executes until the resolve pass.
//!
//! ### State you cannot misread
//! The fetched value lives inside the slot's state machine
//! (`Pending → InFlight → Fetched/Failed`), so the visit pass obtains it
//! by matching on a settled variant rather than trusting that "it must be
//! there by now". A failed fetch is terminal: that node is never visited.
//!
//! ### Rounds to a fixed point
//! A visitor may itself attach new data sources. [`App::synth`] keeps
//! running resolve-then-visit rounds until a round does nothing, so
//! nested fetches resolve level by level, each round behind its own full
//! barrier.
//!
//! ## 🗺️ Module Tour
//!
//! - [`tree`]: the node arena — named nodes, deterministic traversal,
//!   JSON rendering. Key items: [`Tree`], [`NodeId`], [`Synthesis`].
//! - [`fetch`]: the deferred-fetch capability and the resolve pass. Key
//!   items: [`DataSource`], [`resolve_all`], [`ResolveError`].
//! - [`lifecycle`]: the orchestrator and logging setup. Key items:
//!   [`App`], [`lifecycle::tracing::setup_tracing`].
//! - [`nodes`]: built-in node types. Key item: [`Output`].
//!
//! ## Quick Start
//!
//! ```ignore
//! struct RegionListing;
//!
//! #[async_trait]
//! impl DataSource for RegionListing {
//!     type Data = Vec<String>;
//!
//!     async fn fetch(&self) -> Result<Vec<String>, FetchError> {
//!         Ok(backend_client().list_regions().await?)
//!     }
//!
//!     fn on_fetched(&self, regions: Vec<String>, tree: &mut Tree, node: NodeId) {
//!         for region in &regions {
//!             Output::add(tree, node, region, region.as_str()).unwrap();
//!         }
//!     }
//! }
//!
//! let mut app = App::new();
//! let root = app.root();
//! let regions = app.tree_mut().add_node(root, "regions")?;
//! app.tree_mut().attach_source(regions, RegionListing)?;
//! let synthesis = app.synth().await?;
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! RUST_LOG=treesynth=debug cargo test
//! ```

pub mod fetch;
pub mod lifecycle;
pub mod nodes;
pub mod tree;

pub use fetch::{resolve_all, DataSource, FailedFetch, FetchError, FetchFuture, FnSource, ResolveError};
pub use lifecycle::App;
pub use nodes::Output;
pub use tree::{NodeId, Synthesis, Tree, TreeError};
