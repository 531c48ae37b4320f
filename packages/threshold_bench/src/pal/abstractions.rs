use std::fmt::Debug;
use std::time::Instant;

/// Source of monotonic timestamps used to time trials.
///
/// This trait is automatically mocked by mockall in test builds, generating `MockClock`.
#[cfg_attr(test, mockall::automock)]
pub(crate) trait Clock: Debug + Send + Sync + 'static {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}
