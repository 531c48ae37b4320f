use std::ops::Range;

use crate::{Error, Result};

/// An immutable rectangular grid of byte values, stored row-major in one contiguous allocation.
///
/// Every worker of a parallel count reads the same grid concurrently. The grid is never mutated
/// after construction, so no locking is needed to share it.
///
/// # Examples
///
/// ```
/// use threshold_count::Grid;
///
/// let grid = Grid::from_fn(2, 3, |row, col| u8::try_from(row * 10 + col).unwrap()).unwrap();
///
/// assert_eq!(grid.rows(), 2);
/// assert_eq!(grid.cols(), 3);
/// assert_eq!(grid.row(1), Some(&[10, 11, 12][..]));
/// assert_eq!(grid.count_above(10), 2);
/// ```
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Box<[u8]>,
}

impl Grid {
    /// Creates a grid by calling `cell` once for every `(row, col)` position, in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `rows * cols` cells do not fit in memory.
    pub fn from_fn(
        rows: usize,
        cols: usize,
        mut cell: impl FnMut(usize, usize) -> u8,
    ) -> Result<Self> {
        let len = cell_count(rows, cols)?;

        let mut cells = Vec::new();
        cells.try_reserve_exact(len).map_err(|error| {
            Error::invalid_argument(format!(
                "grid of {rows} x {cols} cells does not fit in memory: {error}"
            ))
        })?;

        for row in 0..rows {
            for col in 0..cols {
                cells.push(cell(row, col));
            }
        }

        Ok(Self {
            rows,
            cols,
            cells: cells.into_boxed_slice(),
        })
    }

    /// Creates a grid from explicit rows of values.
    ///
    /// An empty slice creates a grid with zero rows and zero columns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the rows do not all have the same length.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |row| row.as_ref().len());

        if let Some(ragged) = rows.iter().position(|row| row.as_ref().len() != cols) {
            return Err(Error::invalid_argument(format!(
                "row {ragged} has a different length than row 0 ({cols} values)"
            )));
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            cells: rows.iter().flat_map(|row| row.as_ref().iter().copied()).collect(),
        })
    }

    /// Number of rows in the grid.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns the values of one row, or `None` if the row index is out of bounds.
    #[must_use]
    pub fn row(&self, index: usize) -> Option<&[u8]> {
        let end = index.checked_add(1)?;
        self.row_span(index..end)
    }

    /// Returns the values of a contiguous range of rows as one slice, or `None` if the range
    /// reaches past the last row.
    #[must_use]
    pub fn row_span(&self, rows: Range<usize>) -> Option<&[u8]> {
        if rows.end > self.rows {
            return None;
        }

        let start = rows.start.checked_mul(self.cols)?;
        let end = rows.end.checked_mul(self.cols)?;

        self.cells.get(start..end)
    }

    /// Counts the cells whose value is strictly greater than `threshold`, scanning the whole
    /// grid on the calling thread.
    ///
    /// This is the reference result that every parallel strategy must reproduce.
    #[must_use]
    pub fn count_above(&self, threshold: u8) -> u64 {
        count_cells_above(&self.cells, threshold)
    }
}

/// Counts values strictly greater than `threshold`. Values equal to the threshold do not count.
pub(crate) fn count_cells_above(cells: &[u8], threshold: u8) -> u64 {
    let count = cells.iter().filter(|&&value| value > threshold).count();

    u64::try_from(count).expect("a slice cannot hold more than u64::MAX elements")
}

fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or_else(|| {
        Error::invalid_argument(format!(
            "grid of {rows} x {cols} cells does not fit in the address space"
        ))
    })
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;

    assert_impl_all!(Grid: Send, Sync);

    fn four_by_four() -> Grid {
        Grid::from_rows(&[[0_u8, 1, 2, 3], [1, 2, 3, 4], [2, 3, 4, 5], [3, 4, 5, 6]]).unwrap()
    }

    #[test]
    fn threshold_is_strict() {
        let grid = four_by_four();

        // Four cells hold exactly 3 and must not be counted.
        assert_eq!(grid.count_above(3), 6);
        assert_eq!(grid.count_above(2), 10);
        assert_eq!(grid.count_above(6), 0);
    }

    #[test]
    fn row_span_covers_contiguous_rows() {
        let grid = four_by_four();

        assert_eq!(grid.row_span(1..3), Some(&[1, 2, 3, 4, 2, 3, 4, 5][..]));
        assert_eq!(grid.row_span(4..4), Some(&[][..]));
        assert_eq!(grid.row_span(3..5), None);
    }

    #[test]
    fn row_out_of_bounds_is_none() {
        let grid = four_by_four();

        assert_eq!(grid.row(3), Some(&[3, 4, 5, 6][..]));
        assert_eq!(grid.row(4), None);
        assert_eq!(grid.row(usize::MAX), None);
    }

    #[test]
    fn from_fn_is_row_major() {
        let grid =
            Grid::from_fn(2, 2, |row, col| if row == 1 && col == 0 { 9 } else { 0 }).unwrap();

        assert_eq!(grid.row(0), Some(&[0, 0][..]));
        assert_eq!(grid.row(1), Some(&[9, 0][..]));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let rows: [&[u8]; 2] = [&[1, 2, 3], &[1, 2]];

        assert!(matches!(
            Grid::from_rows(&rows),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn oversized_dimensions_are_rejected() {
        assert!(matches!(
            Grid::from_fn(usize::MAX, 2, |_, _| 0),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn unallocatable_dimensions_are_rejected() {
        // The product fits in usize but exceeds the largest possible allocation.
        assert!(matches!(
            Grid::from_fn(usize::MAX, 1, |_, _| 0),
            Err(Error::InvalidArgument { .. })
        ));

        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            Grid::from_fn(1 << 32, 1 << 31, |_, _| 0),
            Err(Error::InvalidArgument { .. })
        ));
    }

    #[test]
    fn empty_grid_counts_nothing() {
        let grid = Grid::from_rows::<[u8; 0]>(&[]).unwrap();

        assert_eq!(grid.rows(), 0);
        assert_eq!(grid.cols(), 0);
        assert_eq!(grid.count_above(0), 0);
    }

    #[test]
    fn zero_columns_still_has_rows() {
        let grid = Grid::from_fn(3, 0, |_, _| 0).unwrap();

        assert_eq!(grid.rows(), 3);
        assert_eq!(grid.row(2), Some(&[][..]));
        assert_eq!(grid.count_above(0), 0);
    }
}
