//! Error types for pool and session lifecycle.

use perch_core::ConfigError;

/// Errors from [`WorkerPool`](crate::WorkerPool) lifecycle operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// A pool needs at least one thread.
    #[error("worker pool requires at least one thread")]
    ZeroThreads,
    /// `start` was called on a pool that already started.
    #[error("worker pool already started")]
    AlreadyStarted,
    /// The OS refused to spawn a worker thread.
    #[error("failed to spawn worker thread {index}: {reason}")]
    ThreadSpawnFailed {
        /// Index of the thread that failed to spawn.
        index: usize,
        /// OS error text.
        reason: String,
    },
    /// A running pool was released without being joined.
    #[error("worker pool released without join, {detached} thread(s) detached")]
    NotJoined {
        /// Number of thread handles detached.
        detached: usize,
    },
}

/// Errors from [`Session`](crate::Session) construction.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SessionError {
    /// Engine or world configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// The worker pool failed to start.
    #[error("worker pool: {0}")]
    Pool(#[from] PoolError),
}
