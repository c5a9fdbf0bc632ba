//! Orchestration: owning the tree, sequencing the passes, logging setup.
//!
//! # Main Components
//!
//! - [`App`] - Builds, resolves, visits, and renders a tree in the one
//!   order that is correct.
//! - [`tracing::setup_tracing`] - Global subscriber setup.

mod app;
pub mod tracing;

pub use app::App;
