use std::io;
use std::thread::{self, Scope, ScopedJoinHandle};

use crate::pal::Threads;

/// Creates named operating system threads.
#[derive(Debug)]
pub(crate) struct RealThreads;

impl Threads for RealThreads {
    fn spawn_worker<'scope, F>(
        &self,
        scope: &'scope Scope<'scope, '_>,
        worker: usize,
        work: F,
    ) -> io::Result<ScopedJoinHandle<'scope, ()>>
    where
        F: FnOnce() + Send + 'scope,
    {
        thread::Builder::new()
            .name(format!("threshold-worker-{worker}"))
            .spawn_scoped(scope, work)
    }
}
