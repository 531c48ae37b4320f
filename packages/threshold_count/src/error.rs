use std::{io, result};

use thiserror::Error;

/// Errors that can occur when generating, partitioning or counting a grid.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The caller provided a value outside the documented input domain, such as a zero worker
    /// count or grid dimensions whose cell count does not fit in memory.
    #[error("invalid argument: {problem}")]
    InvalidArgument {
        /// A human-readable description of the problem.
        problem: String,
    },

    /// The operating system refused to create a worker thread. The trial is abandoned; the
    /// worker count is never reduced to make the trial fit.
    #[error("failed to spawn worker {worker}: {source}")]
    ResourceExhaustion {
        /// Index of the worker whose thread could not be created.
        worker: usize,

        /// The error reported by the operating system.
        source: io::Error,
    },

    /// A worker thread panicked before publishing its partial count.
    #[error("worker {worker} panicked before publishing its partial count")]
    WorkerPanicked {
        /// Index of the worker that panicked.
        worker: usize,
    },
}

impl Error {
    pub(crate) fn invalid_argument(problem: impl Into<String>) -> Self {
        Self::InvalidArgument {
            problem: problem.into(),
        }
    }
}

/// A specialized `Result` type for threshold counting operations, returning the crate's
/// [`Error`] type as the error value.
pub type Result<T> = result::Result<T, Error>;
