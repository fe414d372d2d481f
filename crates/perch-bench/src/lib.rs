//! Benchmark profiles and utilities for the Perch engine.
//!
//! - [`busy_world`]: frequent spawns, so `advance` and `snapshot` carry
//!   a realistic obstacle count.
//! - [`warmed_world`]: a [`busy_world`] stepped until obstacles fill the
//!   playfield.
//! - [`flap`]: a ready-made triggering command.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use perch_core::{ActionKind, ActorId, Command};
use perch_world::{SharedWorld, WorldConfig};

/// Fixed step used by every benchmark: one frame at 60 Hz.
pub const DT: f32 = 1.0 / 60.0;

/// A world that never kills the entity and spawns an obstacle every
/// 0.25s, so roughly 24 obstacles are live in steady state.
pub fn busy_world(seed: u64) -> WorldConfig {
    WorldConfig {
        gravity: 0.0,
        gap_min: 9.999,
        gap_max: 10.0,
        gap_size: 16.0,
        spawn_interval: 0.25,
        seed,
        ..WorldConfig::default()
    }
}

/// Build a [`busy_world`] and advance it `steps` frames.
pub fn warmed_world(seed: u64, steps: u32) -> Result<SharedWorld, perch_core::ConfigError> {
    let world = SharedWorld::new(busy_world(seed))?;
    for _ in 0..steps {
        world.advance(DT);
    }
    Ok(world)
}

/// A flap from actor 0.
pub fn flap() -> Command {
    Command::new(ActorId(0), ActionKind::Flap)
}
