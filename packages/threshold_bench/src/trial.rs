use std::hint::black_box;
use std::num::NonZero;

use threshold_count::{Grid, GridGenerator, Strategy, count_parallel};
use tracing::debug;

use crate::{Error, Result, StatSummary, TimeUnit, Timer, flush_cache, summarize};

/// Timing samples of one strategy, indexed by thread count and then by iteration.
#[derive(Clone, Debug, PartialEq)]
pub struct TimingTable {
    strategy: Strategy,
    unit: TimeUnit,

    // samples[thread_count - 1][iteration]
    samples: Vec<Vec<f64>>,
}

impl TimingTable {
    /// The strategy that was measured.
    #[must_use]
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// The unit of every sample.
    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// The largest thread count measured. Thread counts run from 1 to this value.
    #[must_use]
    pub fn max_threads(&self) -> usize {
        self.samples.len()
    }

    /// The samples measured with `thread_count` threads, in iteration order.
    ///
    /// Returns `None` if `thread_count` is zero or larger than
    /// [`max_threads()`][Self::max_threads].
    #[must_use]
    pub fn samples(&self, thread_count: usize) -> Option<&[f64]> {
        self.samples
            .get(thread_count.checked_sub(1)?)
            .map(Vec::as_slice)
    }

    /// Iterates over `(thread_count, samples)` in ascending thread count order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &[f64])> {
        (1..).zip(self.samples.iter().map(Vec::as_slice))
    }

    /// Summarizes the samples of every thread count, in ascending thread count order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyInput`] if any thread count has no samples.
    pub fn summarize(&self) -> Result<Vec<StatSummary>> {
        self.samples
            .iter()
            .map(|samples| summarize(samples))
            .collect()
    }
}

/// Provides the grid for every trial together with its sequential reference count.
///
/// Reproducible grids (fixed, deterministic or checkerboard) are created once and reused by every
/// trial. Random grids are regenerated before every trial. Either way, generation happens outside
/// the timed region.
#[derive(Debug)]
pub struct GridSupply {
    source: Source,
    current: Option<Grid>,

    // (threshold, count) of the current grid.
    reference: Option<(u8, u64)>,
}

#[derive(Debug)]
enum Source {
    Fixed,
    Generated {
        generator: GridGenerator,
        rows: usize,
        cols: usize,
    },
}

impl GridSupply {
    /// Uses the same caller-provided grid for every trial.
    #[must_use]
    pub fn fixed(grid: Grid) -> Self {
        Self {
            source: Source::Fixed,
            current: Some(grid),
            reference: None,
        }
    }

    /// Creates `rows x cols` grids with `generator`, once if the generator is reproducible or
    /// once per trial if it is not.
    #[must_use]
    pub fn generated(generator: GridGenerator, rows: usize, cols: usize) -> Self {
        Self {
            source: Source::Generated {
                generator,
                rows,
                cols,
            },
            current: None,
            reference: None,
        }
    }

    /// Returns the grid for the next trial and the number of its cells above `threshold`.
    pub(crate) fn next_trial(&mut self, threshold: u8) -> Result<(&Grid, u64)> {
        if let Source::Generated {
            generator,
            rows,
            cols,
        } = &mut self.source
        {
            if self.current.is_none() || !generator.is_reproducible() {
                self.current = Some(generator.generate(*rows, *cols)?);
                self.reference = None;
            }
        }

        let grid = self
            .current
            .as_ref()
            .expect("fixed supplies start with a grid and generated supplies have just made one");

        let reference = match self.reference {
            Some((cached_threshold, count)) if cached_threshold == threshold => count,
            _ => {
                let count = grid.count_above(threshold);
                self.reference = Some((threshold, count));
                count
            }
        };

        Ok((grid, reference))
    }
}

/// Runs timed trials of one strategy across a sweep of thread counts.
///
/// Every trial spawns its workers anew. The timed region covers spawning, counting and joining,
/// and nothing else: grid generation, cache flushing and result verification happen outside it.
#[derive(Debug)]
pub struct TrialRunner {
    timer: Timer,
    flush_cache: bool,
}

impl TrialRunner {
    /// Creates a runner that reports samples in `unit` and does not flush caches between trials.
    #[must_use]
    pub fn new(unit: TimeUnit) -> Self {
        Self::with_timer(Timer::new(unit))
    }

    pub(crate) fn with_timer(timer: Timer) -> Self {
        Self {
            timer,
            flush_cache: false,
        }
    }

    /// Sets whether the processor caches are flushed before every trial.
    #[must_use]
    pub fn with_cache_flush(mut self, flush_cache: bool) -> Self {
        self.flush_cache = flush_cache;
        self
    }

    /// Measures `strategy` with every thread count from 1 to `max_threads`, `iterations` times
    /// each.
    ///
    /// # Errors
    ///
    /// * [`Error::Count`] if the grid cannot be generated or a trial fails to count.
    /// * [`Error::CountMismatch`] if a trial counts a different value than the sequential
    ///   reference. No table is returned in that case.
    pub fn measure(
        &self,
        strategy: Strategy,
        grids: &mut GridSupply,
        threshold: u8,
        max_threads: NonZero<usize>,
        iterations: NonZero<usize>,
    ) -> Result<TimingTable> {
        let mut samples = Vec::with_capacity(max_threads.get());

        for threads in 1..=max_threads.get() {
            let mut thread_samples = Vec::with_capacity(iterations.get());

            for iteration in 0..iterations.get() {
                let (grid, expected) = grids.next_trial(threshold)?;

                if self.flush_cache {
                    flush_cache();
                }

                let stopwatch = self.timer.start();
                let counted = black_box(count_parallel(strategy, grid, threshold, threads));
                let elapsed = stopwatch.stop();

                let actual = counted?;

                if actual != expected {
                    return Err(Error::CountMismatch {
                        strategy,
                        threads,
                        expected,
                        actual,
                    });
                }

                debug!(%strategy, threads, iteration, elapsed, "trial finished");

                thread_samples.push(elapsed);
            }

            debug!(
                %strategy,
                threads,
                iterations = iterations.get(),
                unit = %self.timer.unit(),
                "configuration measured"
            );

            samples.push(thread_samples);
        }

        Ok(TimingTable {
            strategy,
            unit: self.timer.unit(),
            samples,
        })
    }
}
