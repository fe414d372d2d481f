//! Stress test: concurrent `apply` from many threads against `advance`
//! and snapshot reads from one thread.
//!
//! Every snapshot the driver observes must be consistent with some
//! serial ordering of the calls:
//! - score never decreases and never exceeds the number of spawns,
//! - velocity never exceeds `max_speed`,
//! - obstacle ids stay in spawn order,
//! - position only moves inside `advance`, so two snapshots with the
//!   same tick have the same `y`.
//!
//! The appliers hover the entity around the gap centre, so it stays
//! alive while obstacles spawn, score, and despawn under contention.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use perch_core::{ActionKind, ActorId, Command, ObstacleId};
use perch_world::{AdvanceOutcome, ApplyOutcome, SharedWorld, WorldConfig};

const APPLIERS: u32 = 8;
const DT: f32 = 1.0 / 60.0;
const TICKS: u32 = 3_000;
const HOVER_Y: f32 = 100.0;

fn stress_config() -> WorldConfig {
    WorldConfig {
        // Weak gravity and a tall field: a starved applier set needs
        // hundreds of ticks to let the entity reach the floor.
        gravity: -2.0,
        flap_velocity: 2.0,
        world_height: 200.0,
        primary_y: HOVER_Y,
        // Every gap is centred on the hover height and wide open.
        gap_min: HOVER_Y - 0.001,
        gap_max: HOVER_Y,
        gap_size: 180.0,
        // Spawn often so scoring and despawn paths are exercised.
        spawn_interval: 0.2,
        seed: 1234,
        ..WorldConfig::default()
    }
}

#[test]
fn concurrent_apply_and_advance_stay_serializable() {
    let world = Arc::new(SharedWorld::new(stress_config()).unwrap());
    let stop = Arc::new(AtomicBool::new(false));
    let applied = Arc::new(AtomicU64::new(0));
    let ready = Arc::new(Barrier::new(APPLIERS as usize + 1));

    let appliers: Vec<_> = (0..APPLIERS)
        .map(|i| {
            let world = Arc::clone(&world);
            let stop = Arc::clone(&stop);
            let applied = Arc::clone(&applied);
            let ready = Arc::clone(&ready);
            thread::spawn(move || {
                ready.wait();
                let mut n = 0u64;
                while !stop.load(Ordering::Acquire) {
                    let p = world.primary();
                    let action = if p.y < HOVER_Y && p.velocity <= 0.0 {
                        ActionKind::Flap
                    } else {
                        ActionKind::Noop
                    };
                    if world.apply(&Command::new(ActorId(i), action)) == ApplyOutcome::Applied {
                        applied.fetch_add(1, Ordering::Relaxed);
                    }
                    n += 1;
                    if n % 64 == 0 {
                        thread::yield_now();
                    }
                }
            })
        })
        .collect();

    ready.wait();
    let max_speed = world.config().max_speed;
    let mut prev = world.snapshot();
    for _ in 0..TICKS {
        let outcome = world.advance(DT);
        let snap = world.snapshot();

        assert_eq!(outcome, AdvanceOutcome::Alive, "died at tick {}", snap.tick);
        assert_eq!(snap.tick, prev.tick + 1);
        assert!(snap.primary.score >= prev.primary.score);
        assert!(snap.primary.velocity.abs() <= max_speed);
        assert!(snap.obstacles.windows(2).all(|w| w[0].id < w[1].id));
        // Score counts passed obstacles; each spawn can contribute once.
        let spawned_upper_bound = (snap.tick as f32 * DT / 0.2).ceil() as u32 + 1;
        assert!(snap.primary.score <= spawned_upper_bound);

        // Between two reads with no advance in between only velocity may
        // change (workers flap); position is advance-only.
        let again = world.snapshot();
        assert_eq!(again.tick, snap.tick);
        assert_eq!(again.primary.y, snap.primary.y);
        assert_eq!(again.primary.score, snap.primary.score);

        prev = snap;
    }

    stop.store(true, Ordering::Release);
    for h in appliers {
        h.join().unwrap();
    }

    let stats = world.metrics();
    assert_eq!(stats.commands_applied, applied.load(Ordering::Relaxed));
    assert!(stats.commands_applied > 0);
    assert_eq!(stats.deaths, 0);
    assert_eq!(stats.ticks, u64::from(TICKS));

    // Obstacles crossed the entity and left the field while contended.
    let last = world.snapshot();
    assert!(last.primary.is_alive());
    assert!(last.primary.score >= 1);
    assert!(last.obstacles.first().is_some_and(|o| o.id > ObstacleId(0)));
}

#[test]
fn commands_after_death_are_all_ignored() {
    let world = Arc::new(SharedWorld::new(WorldConfig::default()).unwrap());
    while world.advance(DT) != AdvanceOutcome::Died {}
    let frozen = world.snapshot();

    let handles: Vec<_> = (0..APPLIERS)
        .map(|i| {
            let world = Arc::clone(&world);
            thread::spawn(move || {
                (0..500)
                    .filter(|_| {
                        world.apply(&Command::new(ActorId(i), ActionKind::Flap))
                            != ApplyOutcome::IgnoredDead
                    })
                    .count()
            })
        })
        .collect();
    for _ in 0..500 {
        assert_eq!(world.advance(DT), AdvanceOutcome::AlreadyDead);
    }
    for h in handles {
        assert_eq!(h.join().unwrap(), 0);
    }
    assert_eq!(world.snapshot(), frozen);
}
