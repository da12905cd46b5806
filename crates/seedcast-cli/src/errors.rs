//! Error type of the benchmark runner.

use seedcast_core::CoreError;
use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CliError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed graph file '{path}': {reason}")]
    MalformedGraph { path: String, reason: String },

    #[error("malformed seed file '{path}': {reason}")]
    MalformedSeedSet { path: String, reason: String },

    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error(transparent)]
    Core(#[from] CoreError),
}
