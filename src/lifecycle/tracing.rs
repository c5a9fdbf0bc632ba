//! Observability setup.
//!
//! Structured logging with the `tracing` crate. The resolve pass logs the
//! lifecycle of every fetch (launch, settle, failure) at `debug` and pass
//! summaries at `info`; the visit and render passes do the same. Node
//! paths travel as structured fields, so lines stay short while remaining
//! filterable.
//!
//! Levels come from `RUST_LOG`:
//!
//! ```bash
//! RUST_LOG=info cargo test
//! RUST_LOG=treesynth=debug cargo test
//! ```

/// Initializes the global tracing subscriber.
///
/// Call once, at startup. The compact format keeps one line per event and
/// drops module targets; node paths are carried as structured fields
/// instead.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
