use crate::{Error, Result};

/// Mean and population standard deviation of the timing samples of one configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub struct StatSummary {
    /// Arithmetic mean of the samples.
    pub mean: f64,

    /// Population standard deviation of the samples (divides by `N`, not `N - 1`).
    pub stddev: f64,
}

/// Reduces a sequence of timing samples to its mean and population standard deviation.
///
/// A single sample, or any number of identical samples, has a standard deviation of exactly zero.
///
/// # Errors
///
/// Returns [`Error::EmptyInput`] if `samples` is empty.
///
/// # Examples
///
/// ```
/// use threshold_bench::summarize;
///
/// let summary = summarize(&[1.0, 2.0, 3.0]).unwrap();
///
/// assert!((summary.mean - 2.0).abs() < 1e-12);
/// assert!((summary.stddev - (2.0_f64 / 3.0).sqrt()).abs() < 1e-12);
/// ```
#[expect(
    clippy::cast_precision_loss,
    reason = "sample counts are iteration counts, far below 2^53"
)]
pub fn summarize(samples: &[f64]) -> Result<StatSummary> {
    let Some(&first) = samples.first() else {
        return Err(Error::EmptyInput);
    };

    // Summing identical values and dividing again can drift by an ulp, which would surface
    // as a tiny non-zero deviation.
    if samples
        .iter()
        .all(|&sample| sample.to_bits() == first.to_bits())
    {
        return Ok(StatSummary {
            mean: first,
            stddev: 0.0,
        });
    }

    let count = samples.len() as f64;

    let mean = samples.iter().sum::<f64>() / count;

    let variance = samples
        .iter()
        .map(|&sample| {
            let deviation = sample - mean;
            deviation * deviation
        })
        .sum::<f64>()
        / count;

    Ok(StatSummary {
        mean,
        stddev: variance.sqrt(),
    })
}
