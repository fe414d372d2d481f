//! Shared, lock-protected world state for the Perch engine.
//!
//! [`SharedWorld`] is the single aggregate that worker threads mutate
//! via [`apply`](SharedWorld::apply) and the driver thread mutates via
//! [`advance`](SharedWorld::advance). Every operation holds one mutex
//! for its whole duration, so no caller ever observes a half-updated
//! entity. Readers get copies, never references into guarded state.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod entity;
pub mod metrics;
pub mod projection;
pub mod world;

pub use config::WorldConfig;
pub use entity::{Life, Obstacle, PrimaryState, WorldSnapshot};
pub use metrics::WorldStats;
pub use projection::{ScreenRect, Viewport};
pub use world::{AdvanceOutcome, ApplyOutcome, SharedWorld};
