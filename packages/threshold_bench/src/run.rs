use std::hint::black_box;
use std::num::NonZero;

use threshold_count::{GridGenerator, Strategy, count_parallel};
use tracing::{debug, info};

use crate::{
    BenchPlan, GridSupply, QUICK_COLS, QUICK_ROWS, QuickPlan, Result, ResultTable, StatSummary,
    TimeUnit, Timer, TimingTable, TrialRunner,
};

/// Header label of the first column of the result table.
pub const THREAD_COUNT_LABEL: &str = "ThreadCount";

/// Everything measured for one strategy during a benchmark sweep.
#[derive(Clone, Debug, PartialEq)]
pub struct StrategyReport {
    timings: TimingTable,
    summaries: Vec<StatSummary>,
}

impl StrategyReport {
    /// The measured strategy.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.timings.strategy()
    }

    /// The raw samples.
    #[must_use]
    pub fn timings(&self) -> &TimingTable {
        &self.timings
    }

    /// Mean and standard deviation per thread count, starting at one thread.
    #[must_use]
    pub fn summaries(&self) -> &[StatSummary] {
        &self.summaries
    }
}

/// The outcome of a benchmark sweep over every strategy.
#[derive(Clone, Debug, PartialEq)]
pub struct BenchReport {
    max_threads: NonZero<usize>,
    unit: TimeUnit,
    strategies: Vec<StrategyReport>,
}

impl BenchReport {
    /// The largest thread count measured.
    #[must_use]
    pub fn max_threads(&self) -> NonZero<usize> {
        self.max_threads
    }

    /// The unit of every timing in the report.
    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// One report per strategy, in [`Strategy::all()`] order.
    #[must_use]
    pub fn strategies(&self) -> &[StrategyReport] {
        &self.strategies
    }

    /// Arranges the statistics as a table with one column per thread count and two rows per
    /// strategy: `<Strategy>Avg` holding the means and `<Strategy>Std` holding the standard
    /// deviations.
    #[must_use]
    pub fn to_table(&self) -> ResultTable {
        let mut table = ResultTable::new(THREAD_COUNT_LABEL, 1..=self.max_threads.get());

        for report in &self.strategies {
            let strategy = report.strategy();

            table.push_row(
                format!("{strategy}Avg"),
                report.summaries.iter().map(|summary| summary.mean),
            );
            table.push_row(
                format!("{strategy}Std"),
                report.summaries.iter().map(|summary| summary.stddev),
            );
        }

        table
    }
}

/// Measures every strategy at every thread count from 1 to `plan.max_threads` and summarizes
/// the samples.
///
/// Both strategies count the same reproducible grid. With a random grid pattern, every trial of
/// either strategy gets a fresh grid.
///
/// # Errors
///
/// Fails on the first trial that cannot count or that counts a wrong result. See
/// [`TrialRunner::measure()`].
pub fn run_benchmark(plan: &BenchPlan) -> Result<BenchReport> {
    info!(
        max_threads = plan.max_threads.get(),
        rows = plan.rows,
        cols = plan.cols,
        iterations = plan.iterations.get(),
        threshold = plan.threshold,
        grid = %plan.grid,
        unit = %plan.unit,
        flush_cache = plan.flush_cache,
        "starting benchmark"
    );

    let runner = TrialRunner::new(plan.unit).with_cache_flush(plan.flush_cache);
    let mut grids = GridSupply::generated(GridGenerator::new(plan.grid), plan.rows, plan.cols);

    let strategies = Strategy::all()
        .iter()
        .map(|&strategy| -> Result<StrategyReport> {
            let timings = runner.measure(
                strategy,
                &mut grids,
                plan.threshold,
                plan.max_threads,
                plan.iterations,
            )?;
            let summaries = timings.summarize()?;

            debug!(%strategy, "strategy measured");

            Ok(StrategyReport { timings, summaries })
        })
        .collect::<Result<Vec<_>>>()?;

    info!("benchmark finished");

    Ok(BenchReport {
        max_threads: plan.max_threads,
        unit: plan.unit,
        strategies,
    })
}

/// The outcome of one timed count in a quick run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct QuickResult {
    /// The strategy that counted.
    pub strategy: Strategy,

    /// The number of cells above the threshold.
    pub count: u64,

    /// How long the count took, in `unit`.
    pub elapsed: f64,

    /// The unit of `elapsed`.
    pub unit: TimeUnit,
}

/// Counts a [`QUICK_ROWS`] x [`QUICK_COLS`] deterministic grid once per strategy with
/// `plan.threads` threads, timing each count.
///
/// # Errors
///
/// Returns [`Error::Count`][crate::Error::Count] if a count fails.
pub fn run_quick(plan: &QuickPlan) -> Result<Vec<QuickResult>> {
    let grid = GridGenerator::deterministic().generate(QUICK_ROWS, QUICK_COLS)?;

    let timer = Timer::new(plan.unit);

    Strategy::all()
        .iter()
        .map(|&strategy| -> Result<QuickResult> {
            let stopwatch = timer.start();
            let counted = black_box(count_parallel(
                strategy,
                &grid,
                plan.threshold,
                plan.threads.get(),
            ));
            let elapsed = stopwatch.stop();

            let count = counted?;

            info!(
                %strategy,
                threads = plan.threads.get(),
                count,
                elapsed,
                unit = %plan.unit,
                "quick count finished"
            );

            Ok(QuickResult {
                strategy,
                count,
                elapsed,
                unit: plan.unit,
            })
        })
        .collect()
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use threshold_count::GridPattern;

    use super::*;
    use crate::{BenchConfig, Error, QuickConfig};

    fn small_plan(grid: GridPattern) -> BenchPlan {
        BenchConfig {
            threads: 3,
            rows: 12,
            cols: 9,
            iterations: 2,
            threshold: 10,
            grid,
            ..BenchConfig::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn report_covers_every_strategy_and_thread_count() {
        let report = run_benchmark(&small_plan(GridPattern::Deterministic)).unwrap();

        assert_eq!(report.max_threads().get(), 3);
        assert_eq!(report.unit(), TimeUnit::Microseconds);

        let strategies: Vec<_> = report
            .strategies()
            .iter()
            .map(StrategyReport::strategy)
            .collect();
        assert_eq!(strategies, Strategy::all());

        for strategy_report in report.strategies() {
            assert_eq!(strategy_report.summaries().len(), 3);
            assert_eq!(strategy_report.timings().max_threads(), 3);
        }
    }

    #[test]
    fn table_has_avg_and_std_rows_in_strategy_order() {
        let report = run_benchmark(&small_plan(GridPattern::Random)).unwrap();
        let table = report.to_table();

        let names: Vec<_> = table.rows().map(|(name, _)| name).collect();
        assert_eq!(names, ["SlottedAvg", "SlottedStd", "AtomicAvg", "AtomicStd"]);

        assert_eq!(table.columns(), &["1", "2", "3"]);

        for (_, values) in table.rows() {
            assert_eq!(values.len(), 3);
        }

        let slotted = report.strategies().first().unwrap();
        let means: Vec<_> = slotted.summaries().iter().map(|s| s.mean).collect();
        assert_eq!(table.row("SlottedAvg").unwrap(), means.as_slice());
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn unallocatable_grid_fails_without_panicking() {
        let plan = BenchConfig {
            rows: i64::MAX,
            cols: 2,
            threads: 1,
            iterations: 1,
            ..BenchConfig::default()
        }
        .validate()
        .unwrap();

        assert!(matches!(
            run_benchmark(&plan),
            Err(Error::Count(threshold_count::Error::InvalidArgument { .. }))
        ));
    }

    #[test]
    fn quick_run_counts_with_every_strategy() {
        let plan = QuickConfig {
            threads: 4,
            ..QuickConfig::default()
        }
        .validate()
        .unwrap();

        let results = run_quick(&plan).unwrap();

        let expected = GridGenerator::deterministic()
            .generate(QUICK_ROWS, QUICK_COLS)
            .unwrap()
            .count_above(128);

        assert_eq!(results.len(), Strategy::all().len());

        for (result, &strategy) in results.iter().zip(Strategy::all()) {
            assert_eq!(result.strategy, strategy);
            assert_eq!(result.count, expected);
            assert!(result.elapsed >= 0.0);
        }
    }
}
