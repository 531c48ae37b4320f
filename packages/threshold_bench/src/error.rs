use std::{io, result};
use std::path::PathBuf;

use thiserror::Error;
use threshold_count::Strategy;

/// Errors that can occur while configuring, executing or exporting a benchmark run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Partitioning or counting failed. Fatal for the active trial.
    #[error(transparent)]
    Count(#[from] threshold_count::Error),

    /// The benchmark configuration holds a value outside the documented domain, such as a
    /// negative grid dimension or fewer than one iteration.
    #[error("invalid argument: {problem}")]
    InvalidArgument {
        /// A human-readable description of the problem.
        problem: String,
    },

    /// Statistics were requested over zero timing samples.
    #[error("cannot summarize an empty sequence of timing samples")]
    EmptyInput,

    /// A trial produced a count different from the sequential reference count of its grid.
    #[error(
        "{strategy} counted {actual} cells with {threads} threads but the sequential reference count is {expected}"
    )]
    CountMismatch {
        /// The strategy that produced the wrong count.
        strategy: Strategy,

        /// The number of worker threads used in the trial.
        threads: usize,

        /// The sequential reference count.
        expected: u64,

        /// The count the trial produced.
        actual: u64,
    },

    /// The result table could not be written. Statistics already computed remain valid.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// The file that could not be written.
        path: PathBuf,

        /// The underlying I/O error.
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn invalid_argument(problem: impl Into<String>) -> Self {
        Self::InvalidArgument {
            problem: problem.into(),
        }
    }
}

/// A specialized `Result` type for benchmark operations, returning the crate's [`Error`] type
/// as the error value.
pub type Result<T> = result::Result<T, Error>;
