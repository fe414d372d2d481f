//! Core types for the Perch worker-pool engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the values that cross thread boundaries: strongly-typed ids, the
//! [`Command`] that flows from the driver through the queue to the
//! workers, and the shared configuration error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod command;
pub mod error;
pub mod id;

pub use command::{ActionKind, Command};
pub use error::ConfigError;
pub use id::{ActorId, ObstacleId};
