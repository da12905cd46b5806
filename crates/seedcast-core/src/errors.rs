//! Error types for seedcast execution.

use thiserror::Error;

/// Errors surfaced by graph construction and solver selection.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error
/// variants without breaking changes.
///
/// Passing an out-of-range node id to a [`crate::graph::GraphStore`]
/// query is a programmer error, not a recoverable condition; those
/// panic via slice indexing instead of returning a variant.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum CoreError {
    /// A solver selector string did not match any known solver.
    /// Callers typically log a warning and continue with the
    /// remaining solvers.
    #[error("unknown solver: {0}")]
    UnknownSolver(String),

    /// The graph under construction violated a structural invariant,
    /// e.g. an edge pointing outside the appended node range.
    #[error("graph construction error: {0}")]
    GraphConstruction(String),
}
