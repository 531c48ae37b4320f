use std::io;
use std::sync::Arc;
use std::thread::{self, Scope, ScopedJoinHandle};

use mockall::mock;

// Mockall cannot express the generic, scope-bound `Threads::spawn_worker()`, so the mock only
// scripts what happens to each worker. `spawn_scripted_worker()` translates the script into a
// real scoped thread, or into the error a failed spawn would return.
mock! {
    pub Threads {
        pub fn spawn_outcome(&self, worker: usize) -> io::Result<()>;
        pub fn panics(&self, worker: usize) -> bool;
        pub fn completed(&self, worker: usize);
    }
}

pub(crate) fn spawn_scripted_worker<'scope, F>(
    mock: &Arc<MockThreads>,
    scope: &'scope Scope<'scope, '_>,
    worker: usize,
    work: F,
) -> io::Result<ScopedJoinHandle<'scope, ()>>
where
    F: FnOnce() + Send + 'scope,
{
    mock.spawn_outcome(worker)?;

    let mock = Arc::clone(mock);

    thread::Builder::new()
        .name(format!("scripted-worker-{worker}"))
        .spawn_scoped(scope, move || {
            assert!(!mock.panics(worker), "worker {worker} panicked as scripted");

            work();

            mock.completed(worker);
        })
}
