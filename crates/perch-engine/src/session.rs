//! Owner of the world, the queue, and the worker pool.
//!
//! A [`Session`] wires the three together and runs the shutdown
//! protocol in a fixed order:
//!
//! 1. **Stop** the queue. Producers are refused from here on; parked
//!    workers wake up, drain what is left, and see `None`.
//! 2. **Join** the pool. Blocks until every worker has returned.
//! 3. **Release** the queue, then the pool, then the world.
//!
//! Dropping a session that was never shut down runs the same protocol
//! and logs a warning.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use perch_core::Command;
use perch_world::{SharedWorld, WorldConfig, WorldStats};

use crate::cancel::CancellationToken;
use crate::config::EngineConfig;
use crate::driver::{Driver, DriverReport, Presenter};
use crate::error::SessionError;
use crate::handler::CommandApplier;
use crate::input::InputSource;
use crate::pool::WorkerPool;
use crate::queue::SafeQueue;

/// Summary of [`Session::shutdown`].
#[derive(Clone, Debug, PartialEq)]
pub struct ShutdownReport {
    /// Workers that returned normally.
    pub workers_joined: usize,
    /// Workers that panicked and were detached.
    pub workers_panicked: usize,
    /// Time from stopping the queue until the last worker joined.
    pub stop_to_join: Duration,
    /// World counters after every worker finished.
    pub final_stats: WorldStats,
}

/// Summary of [`Session::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct SessionReport {
    /// What the driver did.
    pub driver: DriverReport,
    /// How shutdown went.
    pub shutdown: ShutdownReport,
}

/// A running world with its worker pool.
pub struct Session {
    // Field order is release order: queue, pool, world.
    queue: Arc<SafeQueue<Command>>,
    pool: WorkerPool<Command>,
    world: Arc<SharedWorld>,
    config: EngineConfig,
    shut_down: bool,
}

impl Session {
    /// Validate both configs, build the world, queue, and pool, and
    /// start the workers.
    pub fn start(config: EngineConfig, world: WorldConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let world = Arc::new(SharedWorld::new(world)?);
        let queue = Arc::new(SafeQueue::new());
        let workers = config.resolved_worker_count();

        let mut pool = WorkerPool::new(
            workers,
            Arc::clone(&queue),
            CommandApplier::new(Arc::clone(&world)),
        )?;
        if let Err(e) = pool.start() {
            // Unblock whatever did spawn before reporting.
            queue.stop();
            pool.join();
            return Err(e.into());
        }

        info!(workers, "session started");
        Ok(Self {
            queue,
            pool,
            world,
            config,
            shut_down: false,
        })
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The shared world.
    pub fn world(&self) -> &Arc<SharedWorld> {
        &self.world
    }

    /// The command queue the workers drain.
    pub fn queue(&self) -> &Arc<SafeQueue<Command>> {
        &self.queue
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.pool.thread_count()
    }

    /// Build a driver that feeds this session's queue and advances its
    /// world.
    pub fn driver<I: InputSource, P: Presenter>(
        &self,
        input: I,
        presenter: P,
        cancel: CancellationToken,
    ) -> Result<Driver<I, P>, SessionError> {
        Ok(Driver::new(
            Arc::clone(&self.queue),
            Arc::clone(&self.world),
            input,
            presenter,
            cancel,
            self.config.driver.clone(),
        )?)
    }

    /// Run a driver to completion on this thread, then shut down.
    pub fn run<I: InputSource, P: Presenter>(
        self,
        input: I,
        presenter: P,
        cancel: CancellationToken,
    ) -> Result<SessionReport, SessionError> {
        let driver = self.driver(input, presenter, cancel)?.run();
        let shutdown = self.shutdown();
        Ok(SessionReport { driver, shutdown })
    }

    /// Stop the queue, join every worker, and release resources.
    ///
    /// Shutdown always completes. A worker that panicked is counted in
    /// [`ShutdownReport::workers_panicked`] rather than failing the call.
    /// The session's own handles are released when this returns; the
    /// world lives on only if a caller still holds an `Arc` to it.
    pub fn shutdown(mut self) -> ShutdownReport {
        self.stop_and_join()
    }

    /// Steps 1 and 2 of the protocol. Step 3 is the field drop order.
    fn stop_and_join(&mut self) -> ShutdownReport {
        // 1. Stop.
        let stop_at = Instant::now();
        self.queue.stop();

        // 2. Join.
        let joined = self.pool.join();
        let stop_to_join = stop_at.elapsed();
        let final_stats = self.world.metrics();
        self.shut_down = true;

        info!(
            joined = joined.joined,
            panicked = joined.panicked,
            stop_to_join_us = u64::try_from(stop_to_join.as_micros()).unwrap_or(u64::MAX),
            commands_applied = final_stats.commands_applied,
            "session shut down"
        );
        ShutdownReport {
            workers_joined: joined.joined,
            workers_panicked: joined.panicked,
            stop_to_join,
            final_stats,
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if !self.shut_down {
            warn!("session dropped without shutdown, running shutdown protocol");
            self.stop_and_join();
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("config", &self.config)
            .field("workers", &self.pool.thread_count())
            .field("shut_down", &self.shut_down)
            .finish()
    }
}

// Compile-time assertion: a Session can be moved to another thread.
const _: fn() = || {
    fn assert<T: Send>() {}
    assert::<Session>();
};
