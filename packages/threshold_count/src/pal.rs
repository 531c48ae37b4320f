// Platform abstraction layer for threshold_count.
//
// Worker threads are created through this layer so tests can script spawn failures and worker
// panics instead of depending on the operating system to produce them.

mod abstractions;
mod facade;
#[cfg(test)]
mod mocks;
mod real;

pub(crate) use abstractions::*;
pub(crate) use facade::*;
#[cfg(test)]
pub(crate) use mocks::*;
pub(crate) use real::*;
