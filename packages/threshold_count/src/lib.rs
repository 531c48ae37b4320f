#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Counts the cells of a byte grid that exceed a threshold, splitting the rows among many
//! threads and comparing two ways of combining the per-thread partial counts.
//!
//! The core functionality includes:
//! - [`GridGenerator`] - produces deterministic, uniform, checkerboard or random input grids
//! - [`Partition`] - assigns contiguous row ranges to workers
//! - [`Strategy`] - the aggregation policy: per-worker slots or one atomic accumulator
//! - [`count_parallel()`] - spawns the workers, joins them and returns the combined count
//!
//! This package contains no timing logic. The `threshold_bench` package measures how long
//! [`count_parallel()`] takes for each strategy across a sweep of thread counts.
//!
//! # Operating principles
//!
//! ## One thread per worker, per call
//!
//! Every call spawns exactly as many OS threads as workers were requested and joins all of them
//! before returning. Threads are not pooled, so the cost of creating and joining them is part of
//! every measurement. Surplus workers (more workers than rows) are spawned too and contribute
//! zero.
//!
//! ## Local accumulation, single publication
//!
//! A worker counts into a thread-local variable while scanning its rows and publishes the result
//! exactly once, after the scan. The two strategies differ only in the publication target: a
//! worker-owned slot in an array, or a shared atomic accumulator updated with a relaxed add.
//!
//! ## Correctness
//!
//! For any grid, threshold and worker count, both strategies return the same value as the
//! single-threaded [`Grid::count_above()`]. Values equal to the threshold are not counted.
//!
//! # Example
//!
//! ```
//! use threshold_count::{GridGenerator, Strategy};
//!
//! let grid = GridGenerator::deterministic().generate(1000, 1000).unwrap();
//! let expected = grid.count_above(128);
//!
//! for &strategy in Strategy::all() {
//!     for workers in [1, 4, 16] {
//!         assert_eq!(strategy.count(&grid, 128, workers).unwrap(), expected);
//!     }
//! }
//! ```

mod counter;
mod error;
mod generate;
mod grid;
mod pal;
mod partition;
mod strategy;

pub use counter::*;
pub use error::*;
pub use generate::*;
pub use grid::Grid;
pub use partition::*;
pub use strategy::Strategy;
