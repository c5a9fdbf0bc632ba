//! Error types for the resolve pass.

use thiserror::Error;

/// Failure of a single node's asynchronous fetch.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum FetchError {
    /// The fetch itself reported a failure.
    #[error("fetch failed: {0}")]
    Failed(String),

    /// The task running the fetch panicked or was aborted.
    #[error("fetch task failed: {0}")]
    TaskFailed(String),
}

impl FetchError {
    /// Convenience constructor for domain failures.
    pub fn failed(msg: impl Into<String>) -> Self {
        FetchError::Failed(msg.into())
    }
}

impl From<String> for FetchError {
    fn from(msg: String) -> Self {
        FetchError::Failed(msg)
    }
}

impl From<&str> for FetchError {
    fn from(msg: &str) -> Self {
        FetchError::Failed(msg.to_string())
    }
}

/// A single failed node inside an aggregate resolve failure.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedFetch {
    /// Path of the node whose fetch failed.
    pub path: String,
    pub error: FetchError,
}

impl std::fmt::Display for FailedFetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

/// Failure of a whole resolve pass.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ResolveError {
    /// One or more fetches failed. Every failed node is listed so callers
    /// can report all of them, not just the first.
    #[error("{} fetch(es) failed: [{}]", .0.len(), list_failures(.0))]
    Fetch(Vec<FailedFetch>),

    /// A fetch was already in flight when the pass started. Resolving the
    /// same tree from two places at once is a caller error.
    #[error("fetch already in flight for node {path:?}")]
    AlreadyInFlight { path: String },
}

fn list_failures(failures: &[FailedFetch]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
