//! Physics and geometry configuration for [`SharedWorld`](crate::SharedWorld).
//!
//! World units: the vertical playfield spans `[0, world_height]` with
//! `y` pointing up; obstacles enter at `x = world_width` and drift
//! towards negative `x`.

use std::time::Duration;

use perch_core::ConfigError;

/// Complete configuration for constructing a world.
///
/// `validate()` checks every structural invariant; the world
/// constructor calls it before allocating any state.
#[derive(Clone, Debug, PartialEq)]
pub struct WorldConfig {
    /// Vertical acceleration in units/s². Default: -40.
    pub gravity: f32,
    /// Velocity set by a flap, in units/s. Default: 15.
    pub flap_velocity: f32,
    /// Upper bound on the primary entity's speed in either direction. Default: 50.
    pub max_speed: f32,
    /// Collision radius of the primary entity. Default: 1.
    pub radius: f32,
    /// Height of the playfield. Default: 20.
    pub world_height: f32,
    /// Horizontal spawn position for new obstacles. Default: 80.
    pub world_width: f32,
    /// Fixed horizontal position of the primary entity. Default: 20.
    pub primary_x: f32,
    /// Starting vertical position of the primary entity. Default: 10.
    pub primary_y: f32,
    /// Horizontal obstacle velocity in units/s. Default: -15.
    pub obstacle_speed: f32,
    /// Width of each obstacle. Default: 4.
    pub obstacle_width: f32,
    /// Height of the opening in each obstacle. Default: 6.
    pub gap_size: f32,
    /// Lower bound (inclusive) of the randomized gap centre. Default: 5.
    pub gap_min: f32,
    /// Upper bound (exclusive) of the randomized gap centre. Default: 15.
    pub gap_max: f32,
    /// Seconds between obstacle spawns. Default: 1.8.
    pub spawn_interval: f32,
    /// Obstacles with `x` below this are removed. Default: -10.
    pub despawn_x: f32,
    /// Command latency above this is reported. Default: 1ms.
    pub latency_warn_threshold: Duration,
    /// Seed for the obstacle RNG.
    pub seed: u64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: -40.0,
            flap_velocity: 15.0,
            max_speed: 50.0,
            radius: 1.0,
            world_height: 20.0,
            world_width: 80.0,
            primary_x: 20.0,
            primary_y: 10.0,
            obstacle_speed: -15.0,
            obstacle_width: 4.0,
            gap_size: 6.0,
            gap_min: 5.0,
            gap_max: 15.0,
            spawn_interval: 1.8,
            despawn_x: -10.0,
            latency_warn_threshold: Duration::from_millis(1),
            seed: 0,
        }
    }
}

impl WorldConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Every scalar must be finite.
        let scalars = [
            ("gravity", self.gravity),
            ("flap_velocity", self.flap_velocity),
            ("max_speed", self.max_speed),
            ("radius", self.radius),
            ("world_height", self.world_height),
            ("world_width", self.world_width),
            ("primary_x", self.primary_x),
            ("primary_y", self.primary_y),
            ("obstacle_speed", self.obstacle_speed),
            ("obstacle_width", self.obstacle_width),
            ("gap_size", self.gap_size),
            ("gap_min", self.gap_min),
            ("gap_max", self.gap_max),
            ("spawn_interval", self.spawn_interval),
            ("despawn_x", self.despawn_x),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite {
                    name,
                    value: f64::from(value),
                });
            }
        }

        // 2. Sizes and intervals must be strictly positive.
        let positive = [
            ("max_speed", self.max_speed),
            ("radius", self.radius),
            ("world_height", self.world_height),
            ("world_width", self.world_width),
            ("obstacle_width", self.obstacle_width),
            ("gap_size", self.gap_size),
            ("spawn_interval", self.spawn_interval),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NotPositive {
                    name,
                    value: f64::from(value),
                });
            }
        }

        // 3. The entity must start strictly inside the vertical bounds,
        //    otherwise the first advance kills it.
        let low = self.radius;
        let high = self.world_height - self.radius;
        if !(self.primary_y > low && self.primary_y < high) {
            return Err(ConfigError::OutOfRange {
                name: "primary_y",
                value: f64::from(self.primary_y),
                min: f64::from(low),
                max: f64::from(high),
            });
        }

        // 4. Gap centre range must be non-empty.
        if self.gap_min >= self.gap_max {
            return Err(ConfigError::InvalidSpawnRange {
                min: f64::from(self.gap_min),
                max: f64::from(self.gap_max),
            });
        }

        // 5. Obstacles must despawn somewhere left of where they spawn.
        if self.despawn_x >= self.world_width {
            return Err(ConfigError::OutOfRange {
                name: "despawn_x",
                value: f64::from(self.despawn_x),
                min: f64::NEG_INFINITY,
                max: f64::from(self.world_width),
            });
        }

        Ok(())
    }
}
