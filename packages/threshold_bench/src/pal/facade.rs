use std::fmt;
#[cfg(test)]
use std::sync::Arc;
use std::time::Instant;

#[cfg(test)]
use crate::pal::MockClock;
use crate::pal::{Clock, RealClock};

/// Facade over the clock, dispatching to the real clock or, in tests, to a mock.
#[derive(Clone)]
pub(crate) enum ClockFacade {
    Real(&'static RealClock),

    #[cfg(test)]
    Mock(Arc<MockClock>),
}

static REAL_CLOCK: RealClock = RealClock;

// Facade types are trivial pass-through layers - not worth testing.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl ClockFacade {
    pub(crate) const fn real() -> Self {
        Self::Real(&REAL_CLOCK)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockClock) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Clock for ClockFacade {
    fn now(&self) -> Instant {
        match self {
            Self::Real(clock) => clock.now(),
            #[cfg(test)]
            Self::Mock(mock) => mock.now(),
        }
    }
}

// Debug implementations have no API contract to test.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl fmt::Debug for ClockFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(_) => f.debug_struct("ClockFacade::Real").finish(),
            #[cfg(test)]
            Self::Mock(_) => f.debug_struct("ClockFacade::Mock").finish(),
        }
    }
}
