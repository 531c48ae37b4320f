use std::iter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use tracing::trace;

use crate::grid::count_cells_above;
use crate::pal::{Threads, ThreadsFacade};
use crate::strategy::Publish;
use crate::{Error, Grid, Partition, Result, Strategy};

/// Counts the cells of `grid` strictly greater than `threshold`, splitting the rows among
/// exactly `workers` newly spawned threads and combining their partial counts with `strategy`.
///
/// Threads are created for this call and joined before it returns. Thread lifecycle cost is
/// therefore part of what a caller timing this function measures. When `workers` exceeds the
/// number of rows, the surplus workers still run and contribute zero.
///
/// The result equals [`Grid::count_above()`] for every strategy and worker count.
///
/// # Errors
///
/// * [`Error::InvalidArgument`] if `workers` is zero. No thread is spawned.
/// * [`Error::ResourceExhaustion`] if a worker thread cannot be created. Workers spawned
///   before the failure are joined before returning. The worker count is never reduced.
/// * [`Error::WorkerPanicked`] if a worker panics. All workers are joined before returning.
///
/// # Examples
///
/// ```
/// use threshold_count::{GridGenerator, Strategy, count_parallel};
///
/// let grid = GridGenerator::deterministic().generate(100, 100).unwrap();
///
/// for &strategy in Strategy::all() {
///     let count = count_parallel(strategy, &grid, 128, 8).unwrap();
///     assert_eq!(count, grid.count_above(128));
/// }
/// ```
pub fn count_parallel(
    strategy: Strategy,
    grid: &Grid,
    threshold: u8,
    workers: usize,
) -> Result<u64> {
    count_parallel_with(&ThreadsFacade::real(), strategy, grid, threshold, workers)
}

// Callers time this function, so nothing in it may log above trace level.
fn count_parallel_with(
    threads: &impl Threads,
    strategy: Strategy,
    grid: &Grid,
    threshold: u8,
    workers: usize,
) -> Result<u64> {
    let partition = Partition::new(grid.rows(), workers)?;
    let worker_count = partition.worker_count().get();

    match strategy {
        Strategy::Slotted => {
            let mut slots = vec![0_u64; worker_count].into_boxed_slice();

            run_workers(threads, grid, threshold, &partition, slots.iter_mut())?;

            Ok(slots.iter().sum())
        }
        Strategy::AtomicAccumulator => {
            let total = AtomicU64::new(0);

            run_workers(
                threads,
                grid,
                threshold,
                &partition,
                iter::repeat_n(&total, worker_count),
            )?;

            Ok(total.load(Ordering::Relaxed))
        }
    }
}

/// Spawns one thread per partition range, each scanning its rows and publishing its partial
/// count once, then joins all of them.
fn run_workers<P: Publish>(
    threads: &impl Threads,
    grid: &Grid,
    threshold: u8,
    partition: &Partition,
    publishers: impl IntoIterator<Item = P>,
) -> Result<()> {
    thread::scope(|scope| {
        let mut handles = Vec::with_capacity(partition.worker_count().get());
        let mut spawn_error = None;

        for (worker, (rows, publisher)) in partition.iter().zip(publishers).enumerate() {
            let spawned = threads.spawn_worker(scope, worker, move || {
                let cells = grid
                    .row_span(rows)
                    .expect("partition ranges never reach past the last row");

                let partial = count_cells_above(cells, threshold);

                trace!(worker, partial, "worker finished scan");

                publisher.publish(partial);
            });

            match spawned {
                Ok(handle) => handles.push((worker, handle)),
                Err(source) => {
                    spawn_error = Some(Error::ResourceExhaustion { worker, source });
                    break;
                }
            }
        }

        // Every spawned worker is joined even after a failure, so the scope never has to
        // re-raise a worker panic on its own.
        let mut join_error = None;

        for (worker, handle) in handles {
            if handle.join().is_err() && join_error.is_none() {
                join_error = Some(Error::WorkerPanicked { worker });
            }
        }

        spawn_error.or(join_error).map_or(Ok(()), Err)
    })
}
