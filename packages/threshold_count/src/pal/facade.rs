use std::fmt;
use std::io;
#[cfg(test)]
use std::sync::Arc;
use std::thread::{Scope, ScopedJoinHandle};

#[cfg(test)]
use crate::pal::{MockThreads, spawn_scripted_worker};
use crate::pal::{RealThreads, Threads};

/// Facade over thread creation, dispatching to real threads or, in tests, to a scripted mock.
#[derive(Clone)]
pub(crate) enum ThreadsFacade {
    Real(&'static RealThreads),

    #[cfg(test)]
    Mock(Arc<MockThreads>),
}

// Facade types are trivial pass-through layers - not worth testing.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl ThreadsFacade {
    pub(crate) const fn real() -> Self {
        Self::Real(&RealThreads)
    }

    #[cfg(test)]
    pub(crate) fn from_mock(mock: MockThreads) -> Self {
        Self::Mock(Arc::new(mock))
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl Threads for ThreadsFacade {
    fn spawn_worker<'scope, F>(
        &self,
        scope: &'scope Scope<'scope, '_>,
        worker: usize,
        work: F,
    ) -> io::Result<ScopedJoinHandle<'scope, ()>>
    where
        F: FnOnce() + Send + 'scope,
    {
        match self {
            Self::Real(threads) => threads.spawn_worker(scope, worker, work),
            #[cfg(test)]
            Self::Mock(mock) => spawn_scripted_worker(mock, scope, worker, work),
        }
    }
}

// Debug implementations have no API contract to test.
#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg_attr(test, mutants::skip)]
impl fmt::Debug for ThreadsFacade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Real(_) => f.debug_struct("ThreadsFacade::Real").finish(),
            #[cfg(test)]
            Self::Mock(_) => f.debug_struct("ThreadsFacade::Mock").finish(),
        }
    }
}
