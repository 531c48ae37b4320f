use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Grid, Result, count_parallel};

/// How the partial counts of parallel workers are combined into one total.
///
/// Both strategies produce the same result for every input. They differ only in the
/// synchronization mechanism used to hand each worker's partial count to the reducing thread.
/// In both, a worker accumulates a purely thread-local count during its scan and publishes it
/// exactly once, after the scan. Nothing shared is written from inside the scan loop.
#[derive(Clone, Copy, Debug, derive_more::Display, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum Strategy {
    /// Every worker owns one slot of a per-worker array and stores its partial count there.
    /// After all workers have joined, the reducing thread sums the slots.
    #[display("Slotted")]
    Slotted,

    /// All workers add their partial count to one shared atomic accumulator with a single
    /// relaxed `fetch_add`. The join barrier makes every addition visible before the final load.
    #[display("Atomic")]
    AtomicAccumulator,
}

impl Strategy {
    /// Every strategy, in the order results are reported.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Slotted, Self::AtomicAccumulator]
    }

    /// Counts the cells of `grid` strictly greater than `threshold` using `workers` threads.
    ///
    /// Shorthand for [`count_parallel()`].
    ///
    /// # Errors
    ///
    /// See [`count_parallel()`].
    pub fn count(self, grid: &Grid, threshold: u8, workers: usize) -> Result<u64> {
        count_parallel(self, grid, threshold, workers)
    }
}

/// Destination for the partial count of one worker.
///
/// Taking `self` by value means a worker can publish at most once.
pub(crate) trait Publish: Send {
    fn publish(self, partial: u64);
}

// Slotted: the worker holds the only reference to its slot until it is joined.
impl Publish for &mut u64 {
    fn publish(self, partial: u64) {
        *self = partial;
    }
}

// Atomic accumulator: ordering is provided by the join, not by the add.
impl Publish for &AtomicU64 {
    fn publish(self, partial: u64) {
        self.fetch_add(partial, Ordering::Relaxed);
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Strategy: Send, Sync, Copy);

    #[test]
    fn all_lists_slotted_first() {
        assert_eq!(
            Strategy::all(),
            &[Strategy::Slotted, Strategy::AtomicAccumulator]
        );
    }

    #[test]
    fn display_names_are_row_prefixes() {
        assert_eq!(Strategy::Slotted.to_string(), "Slotted");
        assert_eq!(Strategy::AtomicAccumulator.to_string(), "Atomic");
    }

    #[test]
    fn slot_publish_overwrites() {
        let mut slot = 99_u64;

        (&mut slot).publish(5);

        assert_eq!(slot, 5);
    }

    #[test]
    fn atomic_publish_accumulates() {
        let total = AtomicU64::new(3);

        (&total).publish(4);
        (&total).publish(5);

        assert_eq!(total.load(Ordering::Relaxed), 12);
    }
}
