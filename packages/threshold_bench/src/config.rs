use std::env;
use std::fmt::Display;
use std::num::NonZero;
use std::path::PathBuf;

use threshold_count::GridPattern;

use crate::{Error, Result, TimeUnit};

/// Default largest thread count of a benchmark sweep.
pub const DEFAULT_THREADS: i64 = 30;

/// Default number of grid rows.
pub const DEFAULT_ROWS: i64 = 1000;

/// Default number of grid columns.
pub const DEFAULT_COLS: i64 = 1000;

/// Default number of timed trials per (strategy, thread count) configuration.
pub const DEFAULT_ITERATIONS: i64 = 5;

/// Default threshold. Cells strictly greater than it are counted.
pub const DEFAULT_THRESHOLD: i64 = 128;

/// Default thread count of a quick run.
pub const QUICK_THREADS: i64 = 10;

/// Number of grid rows in a quick run.
pub const QUICK_ROWS: usize = 1000;

/// Number of grid columns in a quick run.
pub const QUICK_COLS: usize = 1000;

/// The file the result table is written to unless another path is configured:
/// `benchmarks_<os>_<arch>.csv` in the working directory, named after the build target.
#[must_use]
pub fn default_output_path() -> PathBuf {
    PathBuf::from(format!(
        "benchmarks_{}_{}.csv",
        env::consts::OS,
        env::consts::ARCH
    ))
}

/// Raw settings of a full benchmark sweep, as supplied by the user.
///
/// Numeric fields are signed so that out-of-domain input survives parsing and is reported by
/// [`validate()`][Self::validate] with a meaningful message.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct BenchConfig {
    /// The largest thread count. Every count from 1 up to this value is measured.
    pub threads: i64,

    /// Number of grid rows.
    pub rows: i64,

    /// Number of grid columns.
    pub cols: i64,

    /// Number of timed trials per configuration.
    pub iterations: i64,

    /// Cells strictly greater than this value are counted. Must fit in `0..=255`.
    pub threshold: i64,

    /// How grid cells are filled.
    pub grid: GridPattern,

    /// Unit of the reported timings.
    pub unit: TimeUnit,

    /// Whether to flush processor caches before every trial.
    pub flush_cache: bool,

    /// Where the result table is written.
    pub output: PathBuf,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            threads: DEFAULT_THREADS,
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            iterations: DEFAULT_ITERATIONS,
            threshold: DEFAULT_THRESHOLD,
            grid: GridPattern::Deterministic,
            unit: TimeUnit::Microseconds,
            flush_cache: false,
            output: default_output_path(),
        }
    }
}

impl BenchConfig {
    /// Checks every setting and converts the configuration into an executable plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if a dimension is negative, if `threads` or
    /// `iterations` is less than one, or if `threshold` is outside `0..=255`.
    pub fn validate(&self) -> Result<BenchPlan> {
        Ok(BenchPlan {
            max_threads: at_least_one("threads", self.threads)?,
            rows: non_negative("rows", self.rows)?,
            cols: non_negative("cols", self.cols)?,
            iterations: at_least_one("iterations", self.iterations)?,
            threshold: threshold(self.threshold)?,
            grid: self.grid,
            unit: self.unit,
            flush_cache: self.flush_cache,
            output: self.output.clone(),
        })
    }
}

/// A validated benchmark configuration.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct BenchPlan {
    /// The largest thread count. Every count from 1 up to this value is measured.
    pub max_threads: NonZero<usize>,

    /// Number of grid rows.
    pub rows: usize,

    /// Number of grid columns.
    pub cols: usize,

    /// Number of timed trials per configuration.
    pub iterations: NonZero<usize>,

    /// Cells strictly greater than this value are counted.
    pub threshold: u8,

    /// How grid cells are filled.
    pub grid: GridPattern,

    /// Unit of the reported timings.
    pub unit: TimeUnit,

    /// Whether to flush processor caches before every trial.
    pub flush_cache: bool,

    /// Where the result table is written.
    pub output: PathBuf,
}

/// Raw settings of a quick run: one timed count per strategy on a default-sized deterministic
/// grid.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub struct QuickConfig {
    /// Number of worker threads.
    pub threads: i64,

    /// Cells strictly greater than this value are counted. Must fit in `0..=255`.
    pub threshold: i64,

    /// Unit of the reported timings.
    pub unit: TimeUnit,
}

impl Default for QuickConfig {
    fn default() -> Self {
        Self {
            threads: QUICK_THREADS,
            threshold: DEFAULT_THRESHOLD,
            unit: TimeUnit::Microseconds,
        }
    }
}

impl QuickConfig {
    /// Checks every setting and converts the configuration into an executable plan.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `threads` is less than one or `threshold` is
    /// outside `0..=255`.
    pub fn validate(&self) -> Result<QuickPlan> {
        Ok(QuickPlan {
            threads: at_least_one("threads", self.threads)?,
            threshold: threshold(self.threshold)?,
            unit: self.unit,
        })
    }
}

/// A validated quick run configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct QuickPlan {
    /// Number of worker threads.
    pub threads: NonZero<usize>,

    /// Cells strictly greater than this value are counted.
    pub threshold: u8,

    /// Unit of the reported timings.
    pub unit: TimeUnit,
}

fn non_negative(name: &str, value: i64) -> Result<usize> {
    usize::try_from(value)
        .ok()
        .ok_or_else(|| out_of_range(name, value, "a non-negative integer"))
}

fn at_least_one(name: &str, value: i64) -> Result<NonZero<usize>> {
    usize::try_from(value)
        .ok()
        .and_then(NonZero::new)
        .ok_or_else(|| out_of_range(name, value, "at least 1"))
}

fn threshold(value: i64) -> Result<u8> {
    u8::try_from(value)
        .ok()
        .ok_or_else(|| out_of_range("threshold", value, "in 0..=255"))
}

fn out_of_range(name: &str, value: i64, expected: impl Display) -> Error {
    Error::invalid_argument(format!("{name} must be {expected}, got {value}"))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn assert_invalid(config: &BenchConfig, field: &str) {
        match config.validate() {
            Err(Error::InvalidArgument { problem }) => {
                assert!(problem.starts_with(field), "unexpected problem: {problem}");
            }
            other => panic!("expected invalid {field}, got {other:?}"),
        }
    }

    #[test]
    fn defaults_validate() {
        let plan = BenchConfig::default().validate().unwrap();

        assert_eq!(plan.max_threads.get(), 30);
        assert_eq!(plan.rows, 1000);
        assert_eq!(plan.cols, 1000);
        assert_eq!(plan.iterations.get(), 5);
        assert_eq!(plan.threshold, 128);
        assert_eq!(plan.grid, GridPattern::Deterministic);
        assert_eq!(plan.unit, TimeUnit::Microseconds);
        assert!(!plan.flush_cache);
        assert_eq!(plan.output, default_output_path());
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        assert_invalid(
            &BenchConfig {
                rows: -1,
                ..BenchConfig::default()
            },
            "rows",
        );
        assert_invalid(
            &BenchConfig {
                cols: -1000,
                ..BenchConfig::default()
            },
            "cols",
        );
    }

    #[test]
    fn zero_dimensions_are_allowed() {
        let plan = BenchConfig {
            rows: 0,
            cols: 0,
            ..BenchConfig::default()
        }
        .validate()
        .unwrap();

        assert_eq!(plan.rows, 0);
        assert_eq!(plan.cols, 0);
    }

    #[test]
    fn threads_and_iterations_must_be_positive() {
        for value in [0, -1, i64::MIN] {
            assert_invalid(
                &BenchConfig {
                    threads: value,
                    ..BenchConfig::default()
                },
                "threads",
            );
            assert_invalid(
                &BenchConfig {
                    iterations: value,
                    ..BenchConfig::default()
                },
                "iterations",
            );
        }
    }

    #[test]
    fn threshold_must_fit_in_a_cell() {
        for value in [-1, 256] {
            assert_invalid(
                &BenchConfig {
                    threshold: value,
                    ..BenchConfig::default()
                },
                "threshold",
            );
        }

        let plan = BenchConfig {
            threshold: 255,
            ..BenchConfig::default()
        }
        .validate()
        .unwrap();
        assert_eq!(plan.threshold, 255);
    }

    #[test]
    fn quick_defaults() {
        let plan = QuickConfig::default().validate().unwrap();

        assert_eq!(plan.threads.get(), 10);
        assert_eq!(plan.threshold, 128);

        assert!(matches!(
            QuickConfig {
                threads: 0,
                ..QuickConfig::default()
            }
            .validate(),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn default_output_names_platform() {
        let name = default_output_path().display().to_string();

        assert!(name.starts_with("benchmarks_"));
        assert!(name.ends_with(".csv"));
        assert!(name.contains(env::consts::OS));
        assert!(name.contains(env::consts::ARCH));
    }
}
