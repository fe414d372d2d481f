//! End-to-end: driver → queue → worker pool → shared world.
//!
//! Runs real sessions with scripted input and checks that flaps reach
//! the world, that shutdown returns only after every worker joined,
//! and that the driver honors its exit conditions.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use perch_core::{ActionKind, ActorId, Command};
use perch_engine::{
    CancellationToken, ChannelInput, DriverConfig, DriverExit, EngineConfig, InputEvent, Session,
};
use perch_test_utils::fixtures::{floating_world, headless_engine, open_gap_world};
use perch_test_utils::{NullPresenter, RecordingPresenter, ScriptedInput};
use perch_world::WorldConfig;

#[test]
fn scripted_flaps_reach_the_world() {
    // Paced, so each flap is applied long before the next frame.
    let config = EngineConfig {
        worker_count: Some(4),
        driver: DriverConfig {
            max_frames: Some(60),
            exit_on_death: false,
            ..DriverConfig::default()
        },
    };
    let session = Session::start(config, WorldConfig::default()).unwrap();
    let mut recorder = RecordingPresenter::new();
    let report = session
        .run(
            ScriptedInput::flap_every(30, 60),
            &mut recorder,
            CancellationToken::new(),
        )
        .unwrap();

    assert_eq!(report.driver.exit, DriverExit::FrameLimit);
    assert_eq!(report.driver.frames, 60);
    assert_eq!(report.driver.commands_pushed, 2);
    assert_eq!(report.shutdown.workers_joined, 4);
    assert_eq!(report.shutdown.workers_panicked, 0);
    assert_eq!(report.shutdown.final_stats.commands_applied, 2);
    assert_eq!(recorder.frames().len(), 60);
    // Flapping twice a second keeps the entity between floor and ceiling.
    assert!(recorder.heights().iter().all(|&y| y > 1.0 && y < 19.0));
    assert!(report.driver.final_primary.is_alive());
}

#[test]
fn flap_is_visible_once_a_worker_applies_it() {
    let session = Session::start(headless_engine(2, 1), floating_world()).unwrap();
    session
        .queue()
        .push(Command::new(ActorId(0), ActionKind::Flap));

    let deadline = Instant::now() + Duration::from_secs(2);
    while session.world().primary().velocity == 0.0 {
        assert!(Instant::now() < deadline, "flap never applied");
        thread::yield_now();
    }
    assert_eq!(session.world().primary().velocity, 15.0);
    // Position changes only when the driver advances.
    assert_eq!(session.world().primary().y, 10.0);
    session.shutdown();
}

#[test]
fn unflapped_entity_dies_and_driver_exits() {
    let config = EngineConfig {
        worker_count: Some(2),
        driver: DriverConfig {
            paced: false,
            ..DriverConfig::default()
        },
    };
    let session = Session::start(config, WorldConfig::default()).unwrap();
    let world = Arc::clone(session.world());
    let report = session
        .run(ScriptedInput::new(), NullPresenter, CancellationToken::new())
        .unwrap();

    assert_eq!(report.driver.exit, DriverExit::EntityDead);
    assert!(!report.driver.final_primary.is_alive());
    assert_eq!(world.metrics().deaths, 1);
    assert_eq!(world.tick(), report.driver.frames);
}

#[test]
fn quit_event_stops_the_session() {
    let session = Session::start(headless_engine(1, 1_000), floating_world()).unwrap();
    let cancel = CancellationToken::new();
    let input = ScriptedInput::flap_every(1, 3).then_quit();
    let report = session.run(input, NullPresenter, cancel.clone()).unwrap();

    assert_eq!(report.driver.exit, DriverExit::Quit);
    assert_eq!(report.driver.frames, 3);
    assert!(cancel.is_cancelled());
    assert_eq!(report.shutdown.final_stats.commands_applied, 3);
}

#[test]
fn obstacles_are_scored_in_a_long_run() {
    let session = Session::start(headless_engine(2, 600), open_gap_world()).unwrap();
    let mut recorder = RecordingPresenter::new();
    let report = session
        .run(ScriptedInput::new(), &mut recorder, CancellationToken::new())
        .unwrap();

    assert_eq!(report.driver.exit, DriverExit::FrameLimit);
    assert!(report.driver.final_primary.is_alive());
    assert!(report.driver.final_primary.score >= 1);
    let scores: Vec<_> = recorder
        .frames()
        .iter()
        .map(|f| f.snapshot.primary.score)
        .collect();
    assert!(scores.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn channel_input_from_another_thread() {
    let config = EngineConfig {
        worker_count: Some(2),
        driver: DriverConfig {
            tick_rate_hz: 200.0,
            exit_on_death: false,
            ..DriverConfig::default()
        },
    };
    let session = Session::start(config, floating_world()).unwrap();
    let (tx, input) = ChannelInput::unbounded();

    let feeder = thread::spawn(move || {
        for _ in 0..5 {
            tx.send(InputEvent::Flap).unwrap();
            thread::sleep(Duration::from_millis(10));
        }
        // Dropping the sender disconnects the channel, which the
        // driver treats as a quit.
    });

    let report = session
        .run(input, NullPresenter, CancellationToken::new())
        .unwrap();
    feeder.join().unwrap();

    assert_eq!(report.driver.exit, DriverExit::Quit);
    assert_eq!(report.driver.commands_pushed, 5);
    assert_eq!(report.shutdown.final_stats.commands_applied, 5);
}

#[test]
fn external_cancel_ends_a_paced_run() {
    let config = EngineConfig {
        worker_count: Some(2),
        driver: DriverConfig {
            exit_on_death: false,
            ..DriverConfig::default()
        },
    };
    let session = Session::start(config, floating_world()).unwrap();
    let cancel = CancellationToken::new();
    let canceller = {
        let cancel = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(100));
            cancel.cancel();
        })
    };

    let start = Instant::now();
    let report = session.run(ScriptedInput::new(), NullPresenter, cancel).unwrap();
    canceller.join().unwrap();

    assert_eq!(report.driver.exit, DriverExit::Cancelled);
    assert!(report.driver.frames >= 1);
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(report.shutdown.workers_joined, 2);
}
