use std::result;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::{Grid, Result};

/// The value pattern a [`GridGenerator`] fills grids with.
#[derive(Clone, Copy, Debug, derive_more::Display, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum GridPattern {
    /// Cell `(row, col)` holds `(row + col) mod 256`. Reproducible.
    #[display("deterministic")]
    Deterministic,

    /// Every cell holds 150. Reproducible.
    #[display("uniform")]
    Uniform,

    /// Cell `(row, col)` holds 150 if both `row` and `col` are odd, otherwise 100. Reproducible.
    #[display("checkerboard")]
    Checkerboard,

    /// Every cell is drawn independently and uniformly from `[0, 255]`. Not reproducible unless
    /// the generator was given a seeded random source.
    #[display("random")]
    Random,
}

// Mutations to match arms only change the error message.
#[cfg_attr(test, mutants::skip)]
impl FromStr for GridPattern {
    type Err = String;

    fn from_str(s: &str) -> result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "deterministic" => Ok(Self::Deterministic),
            "uniform" => Ok(Self::Uniform),
            "checkerboard" => Ok(Self::Checkerboard),
            "random" => Ok(Self::Random),
            _ => Err(format!(
                "Invalid grid pattern: '{s}'. Valid options are: deterministic, uniform, checkerboard, random"
            )),
        }
    }
}

const UNIFORM_VALUE: u8 = 150;
const CHECKERBOARD_HIGH: u8 = 150;
const CHECKERBOARD_LOW: u8 = 100;

/// Produces grids of a chosen [`GridPattern`].
///
/// The random source is owned by the generator rather than being process-global state, so
/// whether a sequence of grids is repeatable is decided by whoever constructs the generator.
///
/// # Examples
///
/// ```
/// use threshold_count::GridGenerator;
///
/// let mut generator = GridGenerator::deterministic();
/// let grid = generator.generate(3, 3).unwrap();
///
/// assert_eq!(grid.row(2), Some(&[2, 3, 4][..]));
/// assert!(generator.is_reproducible());
/// ```
#[derive(Clone, Debug)]
pub struct GridGenerator {
    source: Source,
}

#[derive(Clone, Debug)]
enum Source {
    Deterministic,
    Uniform,
    Checkerboard,
    Random(Box<StdRng>),
}

impl GridGenerator {
    /// Creates a generator for the given pattern. Random patterns use a random source seeded
    /// from operating system entropy.
    #[must_use]
    pub fn new(pattern: GridPattern) -> Self {
        match pattern {
            GridPattern::Deterministic => Self::deterministic(),
            GridPattern::Uniform => Self::uniform(),
            GridPattern::Checkerboard => Self::checkerboard(),
            GridPattern::Random => Self::random(StdRng::from_os_rng()),
        }
    }

    /// Creates a generator that fills cell `(row, col)` with `(row + col) mod 256`.
    #[must_use]
    pub fn deterministic() -> Self {
        Self {
            source: Source::Deterministic,
        }
    }

    /// Creates a generator that fills every cell with 150.
    #[must_use]
    pub fn uniform() -> Self {
        Self {
            source: Source::Uniform,
        }
    }

    /// Creates a generator that fills cells where both coordinates are odd with 150 and all
    /// other cells with 100.
    #[must_use]
    pub fn checkerboard() -> Self {
        Self {
            source: Source::Checkerboard,
        }
    }

    /// Creates a generator that draws every cell uniformly from `[0, 255]` using `rng`.
    #[must_use]
    pub fn random(rng: StdRng) -> Self {
        Self {
            source: Source::Random(Box::new(rng)),
        }
    }

    /// The pattern this generator produces.
    #[must_use]
    pub fn pattern(&self) -> GridPattern {
        match self.source {
            Source::Deterministic => GridPattern::Deterministic,
            Source::Uniform => GridPattern::Uniform,
            Source::Checkerboard => GridPattern::Checkerboard,
            Source::Random(_) => GridPattern::Random,
        }
    }

    /// Whether two calls to [`generate()`][Self::generate] with the same dimensions produce
    /// identical grids. Reproducible grids can be generated once and reused across trials.
    #[must_use]
    pub fn is_reproducible(&self) -> bool {
        !matches!(self.source, Source::Random(_))
    }

    /// Generates a grid of `rows x cols` cells.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidArgument`] if `rows * cols` cells do not fit in memory.
    pub fn generate(&mut self, rows: usize, cols: usize) -> Result<Grid> {
        match &mut self.source {
            Source::Deterministic => Grid::from_fn(rows, cols, diagonal_cell),
            Source::Uniform => Grid::from_fn(rows, cols, |_, _| UNIFORM_VALUE),
            Source::Checkerboard => Grid::from_fn(rows, cols, checkerboard_cell),
            Source::Random(rng) => Grid::from_fn(rows, cols, |_, _| rng.random::<u8>()),
        }
    }
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "keeping the low byte of the wrapped sum is exactly (row + col) mod 256"
)]
fn diagonal_cell(row: usize, col: usize) -> u8 {
    row.wrapping_add(col) as u8
}

fn checkerboard_cell(row: usize, col: usize) -> u8 {
    if row % 2 == 1 && col % 2 == 1 {
        CHECKERBOARD_HIGH
    } else {
        CHECKERBOARD_LOW
    }
}
