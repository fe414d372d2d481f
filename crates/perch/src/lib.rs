//! Perch: a latency-sensitive driver loop over a worker pool and a
//! lock-protected shared world.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Perch sub-crates. For most users, adding `perch` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use perch::prelude::*;
//!
//! // Input that flaps on the first frame and then stays quiet.
//! struct FlapOnce(bool);
//! impl InputSource for FlapOnce {
//!     fn poll(&mut self, out: &mut InputBuffer) {
//!         if !std::mem::replace(&mut self.0, true) {
//!             out.push(InputEvent::Flap);
//!         }
//!     }
//! }
//!
//! // Presenter that remembers the last frame's height.
//! struct LastHeight(f32);
//! impl Presenter for LastHeight {
//!     fn present(&mut self, frame: &Frame) {
//!         self.0 = frame.snapshot.primary.y;
//!     }
//! }
//!
//! let engine = EngineConfig {
//!     worker_count: Some(2),
//!     driver: DriverConfig {
//!         tick_rate_hz: 120.0,
//!         max_frames: Some(12),
//!         ..DriverConfig::default()
//!     },
//! };
//! let session = Session::start(engine, WorldConfig::default()).unwrap();
//!
//! let mut last = LastHeight(0.0);
//! let report = session
//!     .run(FlapOnce(false), &mut last, CancellationToken::new())
//!     .unwrap();
//!
//! assert_eq!(report.driver.exit, DriverExit::FrameLimit);
//! assert_eq!(report.driver.commands_pushed, 1);
//! assert_eq!(report.shutdown.final_stats.commands_applied, 1);
//! assert!(last.0 > 1.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `perch-core` | Ids, commands, configuration errors |
//! | [`world`] | `perch-world` | Shared world, entities, metrics, viewport projection |
//! | [`engine`] | `perch-engine` | Queue, worker pool, driver, session |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and ids (`perch-core`).
///
/// Contains [`types::Command`], [`types::ActionKind`], the id newtypes,
/// and [`types::ConfigError`].
pub use perch_core as types;

/// Shared world state (`perch-world`).
///
/// [`world::SharedWorld`] is the lock-protected aggregate; readers get
/// copies such as [`world::WorldSnapshot`]. [`world::Viewport`] maps
/// world coordinates to screen pixels.
pub use perch_world as world;

/// Queue, worker pool, driver loop, and session (`perch-engine`).
///
/// [`engine::Session`] owns everything and runs the shutdown protocol;
/// [`engine::SafeQueue`] and [`engine::WorkerPool`] are usable on their
/// own for any `Send` item type.
pub use perch_engine as engine;

/// Common imports for typical Perch usage.
///
/// ```rust
/// use perch::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use perch_core::{ActionKind, ActorId, Command, ConfigError, ObstacleId};

    // World
    pub use perch_world::{
        AdvanceOutcome, ApplyOutcome, Obstacle, PrimaryState, SharedWorld, Viewport, WorldConfig,
        WorldSnapshot, WorldStats,
    };

    // Engine
    pub use perch_engine::{
        CancellationToken, ChannelInput, Driver, DriverConfig, DriverExit, DriverReport,
        EngineConfig, Frame, InputBuffer, InputEvent, InputSource, Presenter, SafeQueue, Session,
        SessionError, SessionReport, ShutdownReport, WorkerPool,
    };
}
