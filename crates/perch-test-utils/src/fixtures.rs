//! Reusable configuration fixtures.
//!
//! - [`headless_engine`]: unpaced driver with a frame limit.
//! - [`floating_world`]: no gravity, so the entity only moves when flapped.
//! - [`open_gap_world`]: obstacles with a gap the entity cannot miss.

use perch_engine::{DriverConfig, EngineConfig};
use perch_world::WorldConfig;

/// Unpaced driver that stops after `frames` frames and ignores death.
pub fn headless_driver(frames: u64) -> DriverConfig {
    DriverConfig {
        paced: false,
        max_frames: Some(frames),
        exit_on_death: false,
        ..DriverConfig::default()
    }
}

/// `workers` threads and a [`headless_driver`].
pub fn headless_engine(workers: usize, frames: u64) -> EngineConfig {
    EngineConfig {
        worker_count: Some(workers),
        driver: headless_driver(frames),
    }
}

/// Default world with gravity disabled.
pub fn floating_world() -> WorldConfig {
    WorldConfig {
        gravity: 0.0,
        ..WorldConfig::default()
    }
}

/// Floating world whose obstacles always leave the start height open.
///
/// Obstacles still spawn, score, and despawn, but never collide with a
/// stationary entity at the default height.
pub fn open_gap_world() -> WorldConfig {
    WorldConfig {
        gap_min: 9.999,
        gap_max: 10.0,
        gap_size: 16.0,
        spawn_interval: 0.5,
        ..floating_world()
    }
}
