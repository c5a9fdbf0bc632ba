//! Deferred data fetching for tree nodes.
//!
//! A node that needs remote data before it can finish configuring itself
//! registers a [`DataSource`] via
//! [`Tree::attach_source`](crate::tree::Tree::attach_source). Synthesis
//! then happens in two phases: [`resolve_all`] runs every pending fetch
//! to completion concurrently, and only after that barrier does the
//! synchronous visit pass hand each fetched value to its node's
//! [`DataSource::on_fetched`]. No visitor runs until all fetches
//! tree-wide have settled.
//!
//! # Main Components
//!
//! - [`DataSource`] - The capability a node registers: an asynchronous
//!   fetch plus a synchronous consumer of the fetched value.
//! - [`resolve_all`] - The resolve pass over a whole tree.
//! - [`ResolveError`] - Aggregate failure naming every failed node.

mod coordinator;
mod error;
mod source;

pub use coordinator::resolve_all;
pub use error::{FailedFetch, FetchError, ResolveError};
pub use source::{DataSource, FetchFuture, FnSource};

pub(crate) use source::FetchSlot;
