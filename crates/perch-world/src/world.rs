//! [`SharedWorld`]: the mutex-guarded aggregate mutated by workers and
//! the driver.
//!
//! # Locking
//!
//! One `Mutex` covers the primary entity, the obstacle set, the spawn
//! timer, the id allocator, the RNG, and the tick counter. Each public
//! operation takes the lock once and holds it for exactly the span of
//! its transaction:
//!
//! ```text
//! Worker thread(s)                  Driver thread
//!     |                                 |
//!     | apply(cmd)   --lock-->          |
//!     |   velocity = flap               |
//!     |              <-unlock--         |
//!     |                                 | advance(dt)  --lock-->
//!     |                                 |   integrate, spawn, despawn,
//!     |                                 |   score, collide
//!     |                                 |              <-unlock--
//!     |                                 | snapshot()   --lock-->
//!     |                                 |   clone      <-unlock--
//! ```
//!
//! Logging and metric updates happen after the guard is released.
//!
//! A poisoned lock means some thread panicked mid-transaction. The
//! world then refuses to mutate (`Unavailable`) and readers fall back
//! to defaults; nothing panics past this boundary.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use indexmap::IndexMap;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, trace, warn};

use perch_core::{Command, ConfigError, ObstacleId};

use crate::config::WorldConfig;
use crate::entity::{Life, Obstacle, PrimaryState, WorldSnapshot};
use crate::metrics::{WorldCounters, WorldStats};

/// Result of [`SharedWorld::apply`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The command changed the primary entity.
    Applied,
    /// The action kind has no effect.
    IgnoredAction,
    /// The primary entity is dead and ignores all commands.
    IgnoredDead,
    /// The world lock is poisoned; nothing was changed.
    Unavailable,
}

/// Result of [`SharedWorld::advance`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The world was integrated and the entity survived.
    Alive,
    /// The world was integrated and the entity died on this step.
    Died,
    /// The entity was already dead; nothing changed.
    AlreadyDead,
    /// The world lock is poisoned; nothing was changed.
    Unavailable,
}

/// State guarded by the world mutex.
struct WorldState {
    primary: PrimaryState,
    obstacles: IndexMap<ObstacleId, Obstacle>,
    spawn_timer: f32,
    next_obstacle: u64,
    tick: u64,
    rng: ChaCha8Rng,
}

impl WorldState {
    fn new(config: &WorldConfig) -> Self {
        Self {
            primary: PrimaryState {
                x: config.primary_x,
                y: config.primary_y,
                velocity: 0.0,
                life: Life::Alive,
                score: 0,
            },
            obstacles: IndexMap::new(),
            spawn_timer: 0.0,
            next_obstacle: 0,
            tick: 0,
            rng: ChaCha8Rng::seed_from_u64(config.seed),
        }
    }

    /// One integration step. Caller holds the lock.
    fn step(&mut self, config: &WorldConfig, dt: f32) -> AdvanceOutcome {
        if !self.primary.is_alive() {
            return AdvanceOutcome::AlreadyDead;
        }
        self.tick += 1;

        // 1. Primary entity kinematics.
        let velocity = self.primary.velocity + config.gravity * dt;
        self.primary.velocity = velocity.clamp(-config.max_speed, config.max_speed);
        self.primary.y += self.primary.velocity * dt;

        // 2. Obstacle kinematics and scoring.
        for obstacle in self.obstacles.values_mut() {
            obstacle.x += config.obstacle_speed * dt;
            if !obstacle.passed && obstacle.x < self.primary.x {
                obstacle.passed = true;
                self.primary.score += 1;
            }
        }

        // 3. Spawn on the interval.
        self.spawn_timer += dt;
        if self.spawn_timer >= config.spawn_interval {
            self.spawn(config);
            self.spawn_timer = 0.0;
        }

        // 4. Despawn anything past the left bound.
        self.obstacles.retain(|_, o| o.x >= config.despawn_x);

        // 5. Bounds and overlap.
        if self.collides(config) {
            self.primary.life = Life::Dead;
            return AdvanceOutcome::Died;
        }
        AdvanceOutcome::Alive
    }

    fn spawn(&mut self, config: &WorldConfig) {
        let id = ObstacleId(self.next_obstacle);
        self.next_obstacle += 1;
        let gap_y = self.rng.gen_range(config.gap_min..config.gap_max);
        self.obstacles.insert(
            id,
            Obstacle {
                id,
                x: config.world_width,
                gap_y,
                gap_size: config.gap_size,
                passed: false,
            },
        );
    }

    fn collides(&self, config: &WorldConfig) -> bool {
        let p = &self.primary;
        let r = config.radius;
        if p.y <= r || p.y >= config.world_height - r {
            return true;
        }
        self.obstacles.values().any(|o| {
            let overlaps_x = p.x + r > o.x && p.x - r < o.x + config.obstacle_width;
            overlaps_x && (p.y + r > o.gap_top() || p.y - r < o.gap_bottom())
        })
    }

    fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            tick: self.tick,
            primary: self.primary,
            obstacles: self.obstacles.values().copied().collect(),
        }
    }
}

/// The shared world aggregate.
///
/// Wrap in an `Arc` and hand one clone to every collaborator: workers
/// call [`apply`](Self::apply), the driver calls
/// [`advance`](Self::advance) and the snapshot accessors.
pub struct SharedWorld {
    config: WorldConfig,
    state: Mutex<WorldState>,
    counters: WorldCounters,
}

// Compile-time assertion: SharedWorld must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SharedWorld>();
};

impl SharedWorld {
    /// Validate `config` and build a world with the primary entity at
    /// its start position and no obstacles.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = WorldState::new(&config);
        Ok(Self {
            config,
            state: Mutex::new(state),
            counters: WorldCounters::default(),
        })
    }

    /// The configuration this world was built with.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Apply one command as a single locked transaction.
    ///
    /// A flap on a live entity sets its velocity to the configured flap
    /// velocity; position is untouched until the next `advance`. Every
    /// other combination is a no-op. Latency above the configured
    /// threshold is reported but never changes the outcome.
    pub fn apply(&self, command: &Command) -> ApplyOutcome {
        let (outcome, latency) = {
            let Some(mut state) = self.lock("apply") else {
                return ApplyOutcome::Unavailable;
            };
            let applied_at = Instant::now();
            let outcome = if !state.primary.is_alive() {
                ApplyOutcome::IgnoredDead
            } else if command.action().is_trigger() {
                state.primary.velocity = self.config.flap_velocity;
                ApplyOutcome::Applied
            } else {
                ApplyOutcome::IgnoredAction
            };
            (outcome, command.latency_at(applied_at))
        };

        let late = latency > self.config.latency_warn_threshold;
        self.counters
            .record_command(outcome == ApplyOutcome::Applied, latency, late);
        if late {
            warn!(
                actor = %command.actor(),
                latency_us = duration_us(latency),
                threshold_us = duration_us(self.config.latency_warn_threshold),
                "command latency above threshold"
            );
        }
        trace!(actor = %command.actor(), ?outcome, "command applied");
        outcome
    }

    /// Advance the world by `dt` seconds as a single locked transaction.
    ///
    /// A dead world returns [`AdvanceOutcome::AlreadyDead`] and keeps its
    /// final state untouched.
    pub fn advance(&self, dt: f32) -> AdvanceOutcome {
        let (outcome, score) = {
            let Some(mut state) = self.lock("advance") else {
                return AdvanceOutcome::Unavailable;
            };
            let outcome = state.step(&self.config, dt);
            (outcome, state.primary.score)
        };

        match outcome {
            AdvanceOutcome::Alive => self.counters.record_tick(),
            AdvanceOutcome::Died => {
                self.counters.record_tick();
                self.counters.record_death();
                debug!(score, "primary entity died");
            }
            AdvanceOutcome::AlreadyDead | AdvanceOutcome::Unavailable => {}
        }
        outcome
    }

    /// Copy of the primary entity. Default state if the lock is poisoned.
    pub fn primary(&self) -> PrimaryState {
        self.lock("primary")
            .map(|state| state.primary)
            .unwrap_or_default()
    }

    /// Copy of the live obstacles in spawn order. Empty if the lock is
    /// poisoned.
    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.lock("obstacles")
            .map(|state| state.obstacles.values().copied().collect())
            .unwrap_or_default()
    }

    /// Consistent copy of the whole world taken under one lock.
    /// Empty snapshot if the lock is poisoned.
    pub fn snapshot(&self) -> WorldSnapshot {
        self.lock("snapshot")
            .map(|state| state.snapshot())
            .unwrap_or_default()
    }

    /// Whether the primary entity is alive. `false` if the lock is
    /// poisoned, so producers stop issuing commands.
    pub fn is_alive(&self) -> bool {
        self.lock("is_alive")
            .map(|state| state.primary.is_alive())
            .unwrap_or(false)
    }

    /// Number of non-trivial advances so far. 0 if the lock is poisoned.
    pub fn tick(&self) -> u64 {
        self.lock("tick").map(|state| state.tick).unwrap_or(0)
    }

    /// Whether the world lock is usable.
    pub fn is_available(&self) -> bool {
        !self.state.is_poisoned()
    }

    /// Lock-free counter snapshot.
    pub fn metrics(&self) -> WorldStats {
        self.counters.stats()
    }

    fn lock(&self, op: &'static str) -> Option<MutexGuard<'_, WorldState>> {
        match self.state.lock() {
            Ok(guard) => Some(guard),
            Err(poisoned) => {
                drop(poisoned);
                error!(op, "world lock poisoned, falling back");
                None
            }
        }
    }
}

fn duration_us(d: Duration) -> u64 {
    u64::try_from(d.as_micros()).unwrap_or(u64::MAX)
}
