use std::fmt::Debug;
use std::io;
use std::thread::{Scope, ScopedJoinHandle};

/// Creates the worker threads of a parallel count.
pub(crate) trait Threads: Debug + Send + Sync + 'static {
    /// Starts `work` on a new thread dedicated to worker `worker`. The thread is joined no later
    /// than the end of `scope`.
    fn spawn_worker<'scope, F>(
        &self,
        scope: &'scope Scope<'scope, '_>,
        worker: usize,
        work: F,
    ) -> io::Result<ScopedJoinHandle<'scope, ()>>
    where
        F: FnOnce() + Send + 'scope;
}
