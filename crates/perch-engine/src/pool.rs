//! Fixed-size pool of named worker threads draining one shared queue.
//!
//! # Lifecycle
//!
//! ```text
//!  Idle ──start()──▶ Running ──join()────▶ Joined
//!                       │
//!                       └──release()/Drop──▶ Abandoned
//! ```
//!
//! `join` is the only path that waits for threads. It never times out,
//! so the owner must [`stop`](SafeQueue::stop) the queue first or the
//! workers will stay parked in `pop` forever. `release` (and `Drop`)
//! is the abnormal path: handles are detached, never joined, and the
//! leak is reported at `error!` level.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, warn};

use crate::error::PoolError;
use crate::handler::QueueHandler;
use crate::queue::SafeQueue;

/// Lifecycle state of a [`WorkerPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolState {
    /// Constructed, no threads spawned.
    Idle,
    /// Threads spawned and not yet joined.
    Running,
    /// All threads joined (or detached after panicking).
    Joined,
    /// Released while running; threads were detached.
    Abandoned,
}

/// Summary of a [`WorkerPool::join`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct JoinReport {
    /// Threads that returned normally.
    pub joined: usize,
    /// Threads that panicked; their handles were dropped.
    pub panicked: usize,
}

/// A fixed number of threads, each running one handler over one queue.
pub struct WorkerPool<T: Send + 'static> {
    thread_count: usize,
    queue: Arc<SafeQueue<T>>,
    handler: Arc<dyn QueueHandler<T>>,
    handles: Vec<JoinHandle<()>>,
    state: PoolState,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Create an idle pool. No threads are spawned until
    /// [`start`](Self::start).
    pub fn new<H>(
        thread_count: usize,
        queue: Arc<SafeQueue<T>>,
        handler: H,
    ) -> Result<Self, PoolError>
    where
        H: QueueHandler<T>,
    {
        if thread_count == 0 {
            return Err(PoolError::ZeroThreads);
        }
        Ok(Self {
            thread_count,
            queue,
            handler: Arc::new(handler),
            handles: Vec::with_capacity(thread_count),
            state: PoolState::Idle,
        })
    }

    /// Spawn `thread_count` workers named `perch-worker-{i}`.
    ///
    /// Each worker calls the handler's `drain` once and exits when it
    /// returns. Fails with [`PoolError::AlreadyStarted`] unless the pool
    /// is idle. If a spawn fails, the threads already running stay
    /// owned by the pool and are joined by [`join`](Self::join).
    pub fn start(&mut self) -> Result<(), PoolError> {
        if self.state != PoolState::Idle {
            return Err(PoolError::AlreadyStarted);
        }
        self.state = PoolState::Running;

        for index in 0..self.thread_count {
            let queue = Arc::clone(&self.queue);
            let handler = Arc::clone(&self.handler);
            let spawned = thread::Builder::new()
                .name(format!("perch-worker-{index}"))
                .spawn(move || {
                    debug!(worker = index, "worker started");
                    handler.drain(&queue);
                    debug!(worker = index, "worker exiting");
                });
            match spawned {
                Ok(handle) => self.handles.push(handle),
                Err(e) => {
                    error!(worker = index, error = %e, "failed to spawn worker thread");
                    return Err(PoolError::ThreadSpawnFailed {
                        index,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(threads = self.thread_count, "worker pool started");
        Ok(())
    }

    /// Wait for every worker to finish.
    ///
    /// Idempotent. Before `start` it is a no-op returning an empty
    /// report. A worker that panicked is counted, logged, and its
    /// handle is dropped.
    pub fn join(&mut self) -> JoinReport {
        let mut report = JoinReport::default();
        if self.state != PoolState::Running {
            return report;
        }

        for handle in self.handles.drain(..) {
            let name = handle.thread().name().unwrap_or("perch-worker").to_owned();
            match handle.join() {
                Ok(()) => report.joined += 1,
                Err(_) => {
                    report.panicked += 1;
                    warn!(thread = %name, "worker thread panicked, detaching");
                }
            }
        }
        self.state = PoolState::Joined;

        info!(
            joined = report.joined,
            panicked = report.panicked,
            "worker pool joined"
        );
        report
    }

    /// Give up on a running pool without waiting for it.
    ///
    /// On a running pool every handle is detached and
    /// [`PoolError::NotJoined`] is returned. Idle, joined, and already
    /// released pools return `Ok(())`.
    pub fn release(&mut self) -> Result<(), PoolError> {
        if self.state != PoolState::Running {
            return Ok(());
        }
        let detached = self.handles.len();
        // Dropping a JoinHandle detaches the thread.
        self.handles.clear();
        self.state = PoolState::Abandoned;
        error!(detached, "worker pool released without join, threads detached");
        Err(PoolError::NotJoined { detached })
    }

    /// Current lifecycle state.
    pub fn state(&self) -> PoolState {
        self.state
    }

    /// Number of threads this pool spawns.
    pub fn thread_count(&self) -> usize {
        self.thread_count
    }

    /// The queue the workers drain.
    pub fn queue(&self) -> &Arc<SafeQueue<T>> {
        &self.queue
    }
}

impl<T: Send + 'static> Drop for WorkerPool<T> {
    fn drop(&mut self) {
        // Never join here: a worker blocked in pop would hang the drop.
        let _ = self.release();
    }
}

impl<T: Send + 'static> std::fmt::Debug for WorkerPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("thread_count", &self.thread_count)
            .field("live_handles", &self.handles.len())
            .field("state", &self.state)
            .finish()
    }
}
