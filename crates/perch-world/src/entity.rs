//! Entity and snapshot value types.
//!
//! Everything here is plain data: copies handed out by
//! [`SharedWorld`](crate::SharedWorld) accessors are detached from the
//! guarded state and can be read without further locking.

use perch_core::ObstacleId;

/// Life state of the primary entity. `Dead` is terminal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Life {
    /// Accepts commands and is integrated each tick.
    #[default]
    Alive,
    /// Ignores commands and is frozen in its final state.
    Dead,
}

/// The single dynamically simulated actor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PrimaryState {
    /// Fixed horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
    /// Vertical velocity.
    pub velocity: f32,
    /// Alive or dead.
    pub life: Life,
    /// Number of obstacles passed.
    pub score: u32,
}

impl PrimaryState {
    /// Whether the entity is still alive.
    pub fn is_alive(&self) -> bool {
        self.life == Life::Alive
    }
}

impl Default for PrimaryState {
    fn default() -> Self {
        Self {
            x: 20.0,
            y: 10.0,
            velocity: 0.0,
            life: Life::Alive,
            score: 0,
        }
    }
}

/// A spawned obstacle with an opening the primary entity must pass through.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Obstacle {
    /// Stable id assigned at spawn.
    pub id: ObstacleId,
    /// Left edge, in world units.
    pub x: f32,
    /// Vertical centre of the opening.
    pub gap_y: f32,
    /// Height of the opening.
    pub gap_size: f32,
    /// Set once the primary entity has been scored against this obstacle.
    pub passed: bool,
}

impl Obstacle {
    /// World-space `y` of the top of the opening.
    pub fn gap_top(&self) -> f32 {
        self.gap_y + self.gap_size / 2.0
    }

    /// World-space `y` of the bottom of the opening.
    pub fn gap_bottom(&self) -> f32 {
        self.gap_y - self.gap_size / 2.0
    }
}

/// A consistent, point-in-time copy of the whole world.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WorldSnapshot {
    /// Number of non-trivial advances applied when the copy was taken.
    pub tick: u64,
    /// The primary entity.
    pub primary: PrimaryState,
    /// Live obstacles, in spawn order.
    pub obstacles: Vec<Obstacle>,
}
