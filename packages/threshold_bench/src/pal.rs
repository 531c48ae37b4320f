// Platform abstraction layer for threshold_bench.
//
// The only platform dependency of the measurement logic is the monotonic clock. It is hidden
// behind a trait so tests can substitute a mock and make every measured duration predictable.

mod abstractions;
mod facade;
mod real;

pub(crate) use abstractions::*;
pub(crate) use facade::*;
pub(crate) use real::*;
