use std::iter::Cloned;
use std::num::NonZero;
use std::ops::Range;
use std::slice;

use crate::{Error, Result};

/// Assignment of contiguous row ranges to workers.
///
/// Worker `t` owns the half-open range at index `t`. The ranges are ordered, disjoint and
/// together cover every row exactly once. When there are more workers than rows, trailing
/// workers own empty ranges. Such workers still take part in the count and contribute zero,
/// so the number of workers always matches what was asked for.
///
/// # Examples
///
/// ```
/// use threshold_count::Partition;
///
/// let partition = Partition::new(10, 4).unwrap();
///
/// assert_eq!(partition.ranges(), &[0..3, 3..6, 6..9, 9..10]);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Partition {
    ranges: Box<[Range<usize>]>,
}

impl Partition {
    /// Splits `rows` rows among `workers` workers in chunks of `ceil(rows / workers)` rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `workers` is zero or so large that the ranges do not
    /// fit in memory.
    pub fn new(rows: usize, workers: usize) -> Result<Self> {
        let workers = NonZero::new(workers)
            .ok_or_else(|| Error::invalid_argument("worker count must be at least 1"))?;

        let chunk = rows.div_ceil(workers.get());

        let mut ranges = Vec::new();
        ranges.try_reserve_exact(workers.get()).map_err(|error| {
            Error::invalid_argument(format!(
                "cannot track the row ranges of {workers} workers: {error}"
            ))
        })?;

        ranges.extend((0..workers.get()).map(|worker| {
            let start = worker.saturating_mul(chunk).min(rows);
            let end = worker
                .checked_add(1)
                .expect("worker index is below the worker count, which is a usize")
                .saturating_mul(chunk)
                .min(rows);

            start..end
        }));

        Ok(Self {
            ranges: ranges.into_boxed_slice(),
        })
    }

    /// Number of workers the rows were split among. Includes workers with empty ranges.
    #[must_use]
    pub fn worker_count(&self) -> NonZero<usize> {
        NonZero::new(self.ranges.len()).expect("guarded by NonZero worker count in constructor")
    }

    /// The row range of every worker, indexed by worker.
    #[must_use]
    pub fn ranges(&self) -> &[Range<usize>] {
        &self.ranges
    }

    /// Iterates over the row range of every worker, in worker order.
    pub fn iter(&self) -> Cloned<slice::Iter<'_, Range<usize>>> {
        self.ranges.iter().cloned()
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = Range<usize>;
    type IntoIter = Cloned<slice::Iter<'a, Range<usize>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Splits `rows` rows among `workers` workers. Shorthand for [`Partition::new()`].
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `workers` is zero.
pub fn partition(rows: usize, workers: usize) -> Result<Partition> {
    Partition::new(rows, workers)
}
