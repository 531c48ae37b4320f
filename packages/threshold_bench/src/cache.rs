use std::hint::black_box;

/// Comfortably larger than the last-level cache of common desktop and server processors.
const FLUSH_BUFFER_BYTES: usize = 50 * 1024 * 1024;

const CACHE_LINE_BYTES: usize = 64;

/// Evicts most of the processor caches by writing one byte per cache line of a large buffer.
///
/// Call between trials to reduce interference from data left in the cache by the previous trial.
/// This only perturbs memory state; it has no effect on the correctness of any count.
#[cfg_attr(test, mutants::skip)] // Cache state is not observable from a test.
pub fn flush_cache() {
    let mut buffer = vec![0_u8; FLUSH_BUFFER_BYTES];

    for (index, byte) in buffer.iter_mut().enumerate().step_by(CACHE_LINE_BYTES) {
        *byte = index.to_le_bytes()[0];
    }

    black_box(buffer.as_mut_slice());
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    #[cfg_attr(miri, ignore)] // Touching 50 MiB under Miri takes far too long.
    fn flush_completes() {
        flush_cache();
        flush_cache();
    }
}
