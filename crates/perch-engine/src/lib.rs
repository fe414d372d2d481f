//! Worker pool, command queue, and paced driver loop for Perch worlds.
//!
//! The engine splits work across two kinds of thread:
//!
//! - the **driver** ([`Driver`]) runs on the caller's thread, polls
//!   input, pushes [`Command`](perch_core::Command)s, advances the
//!   world once per frame, and presents snapshots;
//! - the **workers** ([`WorkerPool`]) block on a shared [`SafeQueue`]
//!   and apply each command to the [`SharedWorld`](perch_world::SharedWorld).
//!
//! [`Session`] owns all of it and runs the stop → join → release
//! shutdown protocol.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cancel;
pub mod config;
pub mod driver;
pub mod error;
pub mod handler;
pub mod input;
pub mod pool;
pub mod queue;
pub mod session;

pub use cancel::CancellationToken;
pub use config::{DriverConfig, EngineConfig, WORKERS_ENV};
pub use driver::{Driver, DriverExit, DriverReport, Frame, Presenter};
pub use error::{PoolError, SessionError};
pub use handler::{CommandApplier, QueueHandler};
pub use input::{ChannelInput, InputBuffer, InputEvent, InputSource};
pub use pool::{JoinReport, PoolState, WorkerPool};
pub use queue::SafeQueue;
pub use session::{Session, SessionReport, ShutdownReport};
