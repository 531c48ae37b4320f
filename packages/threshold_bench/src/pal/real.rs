// Trivial forwarder to std::time - excluded from coverage and mutation testing.

use std::time::Instant;

use crate::pal::Clock;

/// Clock backed by the operating system's monotonic clock.
#[derive(Debug)]
pub(crate) struct RealClock;

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Clock for RealClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
