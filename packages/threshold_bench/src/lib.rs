#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Times [`threshold_count`] across a sweep of thread counts and reports, per aggregation
//! strategy, the mean and standard deviation of every thread count.
//!
//! The core functionality includes:
//! - [`TrialRunner`] - runs timed trials of one strategy and collects them in a [`TimingTable`]
//! - [`summarize()`] - reduces samples to a [`StatSummary`] (mean, population standard deviation)
//! - [`run_benchmark()`] - measures every strategy and produces a [`BenchReport`]
//! - [`ResultTable`] - the comma-separated result file, one `Avg` and one `Std` row per strategy
//!
//! The `threshold_bench` binary wraps these with command-line parsing and logging.
//!
//! # What is timed
//!
//! A trial spans spawning the worker threads, counting and joining them. Grid generation, cache
//! flushing and checking the count against the sequential reference all happen outside the timed
//! region. A trial that counts a wrong value fails the run instead of reporting a timing.
//!
//! # Example
//!
//! ```
//! use threshold_bench::{BenchConfig, run_benchmark};
//!
//! let mut config = BenchConfig::default();
//! config.threads = 2;
//! config.rows = 64;
//! config.cols = 64;
//! config.iterations = 2;
//!
//! let report = run_benchmark(&config.validate().unwrap()).unwrap();
//! let table = report.to_table();
//!
//! assert!(table.to_string().starts_with("ThreadCount,1,2\n"));
//! assert!(table.row("SlottedAvg").is_some());
//! assert!(table.row("AtomicStd").is_some());
//! ```

mod cache;
mod config;
mod error;
mod pal;
mod run;
mod stats;
mod table;
mod timer;
mod trial;

pub use cache::*;
pub use config::*;
pub use error::*;
pub use run::*;
pub use stats::*;
pub use table::*;
pub use timer::*;
pub use trial::*;
