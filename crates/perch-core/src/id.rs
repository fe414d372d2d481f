//! Strongly-typed identifiers.

use std::fmt;

/// Identifies the actor that issued a [`Command`](crate::Command).
///
/// The driver stamps every command with the id configured for its
/// input source; workers carry it through for diagnostics only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActorId(pub u32);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ActorId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Identifies a spawned obstacle within a world.
///
/// Allocated sequentially by the world at spawn time and never reused
/// for the lifetime of that world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u64);

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ObstacleId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
