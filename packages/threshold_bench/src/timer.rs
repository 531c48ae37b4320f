use std::str::FromStr;
use std::time::{Duration, Instant};

use crate::pal::{Clock, ClockFacade};

/// Unit in which elapsed durations are reported.
#[derive(Clone, Copy, Debug, Default, derive_more::Display, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum TimeUnit {
    /// Nanoseconds.
    #[display("ns")]
    Nanoseconds,

    /// Microseconds.
    #[default]
    #[display("us")]
    Microseconds,

    /// Milliseconds.
    #[display("ms")]
    Milliseconds,
}

impl TimeUnit {
    /// Expresses `elapsed` as a (fractional) number of this unit.
    #[must_use]
    #[expect(
        clippy::cast_precision_loss,
        reason = "durations of benchmark trials are far below 2^53 nanoseconds"
    )]
    pub fn convert(self, elapsed: Duration) -> f64 {
        let nanos = elapsed.as_nanos() as f64;

        match self {
            Self::Nanoseconds => nanos,
            Self::Microseconds => nanos / 1_000.0,
            Self::Milliseconds => nanos / 1_000_000.0,
        }
    }
}

// Mutations to match arms only change the error message.
#[cfg_attr(test, mutants::skip)]
impl FromStr for TimeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ns" => Ok(Self::Nanoseconds),
            "us" => Ok(Self::Microseconds),
            "ms" => Ok(Self::Milliseconds),
            _ => Err(format!(
                "Invalid time unit: '{s}'. Valid options are: ns, us, ms"
            )),
        }
    }
}

/// Measures elapsed time of scoped intervals, reporting it in a fixed [`TimeUnit`].
///
/// Every call to [`start()`][Self::start] returns an independent [`Stopwatch`], so intervals can
/// be nested or run back to back without affecting each other.
///
/// # Examples
///
/// ```
/// use threshold_bench::{TimeUnit, Timer};
///
/// let timer = Timer::new(TimeUnit::Microseconds);
///
/// let outer = timer.start();
/// let inner = timer.start();
/// std::hint::black_box((0..1000).sum::<u64>());
/// let inner_elapsed = inner.stop();
/// let outer_elapsed = outer.stop();
///
/// assert!(outer_elapsed >= inner_elapsed);
/// ```
#[derive(Clone, Debug)]
pub struct Timer {
    clock: ClockFacade,
    unit: TimeUnit,
}

impl Timer {
    /// Creates a timer backed by the monotonic system clock.
    #[must_use]
    pub fn new(unit: TimeUnit) -> Self {
        Self::with_clock(ClockFacade::real(), unit)
    }

    pub(crate) fn with_clock(clock: ClockFacade, unit: TimeUnit) -> Self {
        Self { clock, unit }
    }

    /// The unit in which [`Stopwatch::stop()`] reports.
    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Starts measuring a new interval.
    pub fn start(&self) -> Stopwatch<'_> {
        Stopwatch {
            timer: self,
            started: self.clock.now(),
        }
    }
}

/// One running interval measurement, started by [`Timer::start()`].
#[derive(Debug)]
#[must_use = "an interval is only measured when the stopwatch is stopped"]
pub struct Stopwatch<'a> {
    timer: &'a Timer,
    started: Instant,
}

impl Stopwatch<'_> {
    /// Ends the interval and returns its length in the timer's unit.
    #[must_use]
    pub fn stop(self) -> f64 {
        let elapsed = self
            .timer
            .clock
            .now()
            .saturating_duration_since(self.started);

        self.timer.unit.convert(elapsed)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use static_assertions::assert_impl_all;

    use super::*;
    use crate::pal::MockClock;

    assert_impl_all!(Timer: Send, Sync);

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    /// A mock clock that returns the given offsets from a fixed base instant, in call order.
    fn scripted_clock(offsets_micros: &'static [u64]) -> ClockFacade {
        let base = Instant::now();
        let mut remaining = offsets_micros.iter().copied();

        let mut clock = MockClock::new();
        clock
            .expect_now()
            .times(offsets_micros.len())
            .returning(move || {
                let offset = remaining
                    .next()
                    .expect("clock queried more often than scripted");
                base.checked_add(Duration::from_micros(offset)).unwrap()
            });

        ClockFacade::from_mock(clock)
    }

    #[test]
    fn convert_between_units() {
        let elapsed = Duration::from_micros(1500);

        assert_close(TimeUnit::Nanoseconds.convert(elapsed), 1_500_000.0);
        assert_close(TimeUnit::Microseconds.convert(elapsed), 1500.0);
        assert_close(TimeUnit::Milliseconds.convert(elapsed), 1.5);
    }

    #[test]
    fn sequential_intervals_are_independent() {
        let timer = Timer::with_clock(scripted_clock(&[0, 10, 100, 130]), TimeUnit::Microseconds);

        let first = timer.start();
        assert_close(first.stop(), 10.0);

        let second = timer.start();
        assert_close(second.stop(), 30.0);
    }

    #[test]
    fn nested_intervals_are_independent() {
        let timer = Timer::with_clock(scripted_clock(&[0, 5, 25, 40]), TimeUnit::Microseconds);

        let outer = timer.start();
        let inner = timer.start();
        assert_close(inner.stop(), 20.0);
        assert_close(outer.stop(), 40.0);
    }

    #[test]
    fn reports_in_configured_unit() {
        let timer = Timer::with_clock(scripted_clock(&[0, 2500]), TimeUnit::Milliseconds);

        assert_eq!(timer.unit(), TimeUnit::Milliseconds);
        assert_close(timer.start().stop(), 2.5);
    }

    #[test]
    fn real_clock_never_goes_backwards() {
        let timer = Timer::new(TimeUnit::Nanoseconds);

        assert!(timer.start().stop() >= 0.0);
    }

    #[test]
    fn unit_parsing_and_display() {
        for unit in [
            TimeUnit::Nanoseconds,
            TimeUnit::Microseconds,
            TimeUnit::Milliseconds,
        ] {
            assert_eq!(unit.to_string().parse::<TimeUnit>().unwrap(), unit);
        }

        assert_eq!(TimeUnit::default(), TimeUnit::Microseconds);
        assert!(
            "seconds"
                .parse::<TimeUnit>()
                .unwrap_err()
                .contains("Invalid time unit")
        );
    }
}
