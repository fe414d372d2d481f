//! Headless session with a flap bot on its own input thread.
//!
//! Demonstrates: start a session → feed input over a channel from
//! another thread → run the paced driver → present frames through a
//! viewport → shut down.
//!
//! ```text
//! RUST_LOG=perch_engine=info,perch_world=debug cargo run -p perch-engine --example headless
//! ```
//!
//! `PERCH_WORKERS` overrides the worker count.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use perch_engine::{
    CancellationToken, ChannelInput, EngineConfig, Frame, InputEvent, Presenter, Session,
};
use perch_world::{SharedWorld, Viewport, WorldConfig};

/// Prints a one-line summary twice a second.
struct ConsolePresenter {
    viewport: Viewport,
    obstacle_width: f32,
    every: u64,
}

impl Presenter for ConsolePresenter {
    fn present(&mut self, frame: &Frame) {
        if frame.index % self.every != 0 {
            return;
        }
        let snap = &frame.snapshot;
        let entity = self.viewport.primary_rect(&snap.primary, 20.0);
        let visible = snap
            .obstacles
            .iter()
            .filter(|o| {
                let [top, _] = self.viewport.obstacle_rects(o, self.obstacle_width);
                self.viewport.is_visible(&top)
            })
            .count();
        println!(
            "  frame {:>5}: y={:>6.2} v={:>7.2} screen=({:>5.0},{:>5.0}) score={:>3} obstacles={}",
            frame.index,
            snap.primary.y,
            snap.primary.velocity,
            entity.x,
            entity.y,
            snap.primary.score,
            visible,
        );
    }
}

/// Flaps whenever the entity is falling below the next gap's centre.
fn run_bot(
    world: Arc<SharedWorld>,
    tx: crossbeam_channel::Sender<InputEvent>,
    cancel: CancellationToken,
) {
    let mid = world.config().world_height / 2.0;
    while !cancel.is_cancelled() {
        let snap = world.snapshot();
        if !snap.primary.is_alive() {
            break;
        }
        let target = snap
            .obstacles
            .iter()
            .find(|o| !o.passed)
            .map_or(mid, |o| o.gap_y);
        let falling_low = snap.primary.y < target - 0.5 && snap.primary.velocity <= 0.0;
        if falling_low && tx.send(InputEvent::Flap).is_err() {
            break;
        }
        cancel.sleep(Duration::from_millis(10));
    }
    // Dropping `tx` tells the driver to quit.
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("=== Perch Headless Example ===\n");

    let mut engine = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("bad environment: {e}");
            std::process::exit(2);
        }
    };
    engine.driver.max_frames = Some(60 * 20);
    let world = WorldConfig {
        seed: 42,
        ..WorldConfig::default()
    };
    let obstacle_width = world.obstacle_width;

    let session = match Session::start(engine, world) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("failed to start session: {e}");
            std::process::exit(1);
        }
    };
    println!("workers: {}", session.worker_count());

    let cancel = CancellationToken::new();
    let (tx, input) = ChannelInput::unbounded();
    let bot = {
        let world = Arc::clone(session.world());
        let cancel = cancel.clone();
        thread::Builder::new()
            .name("perch-bot".into())
            .spawn(move || run_bot(world, tx, cancel))
    };

    let presenter = ConsolePresenter {
        viewport: Viewport::default(),
        obstacle_width,
        every: 30,
    };
    let report = session.run(input, presenter, cancel.clone());
    cancel.cancel();
    if let Ok(bot) = bot {
        let _ = bot.join();
    }

    match report {
        Ok(report) => {
            println!("\nexit:            {:?}", report.driver.exit);
            println!("frames:          {}", report.driver.frames);
            println!("score:           {}", report.driver.final_primary.score);
            println!("flaps pushed:    {}", report.driver.commands_pushed);
            println!("flaps applied:   {}", report.shutdown.final_stats.commands_applied);
            println!("late commands:   {}", report.shutdown.final_stats.late_commands);
            println!("max latency:     {}us", report.shutdown.final_stats.max_latency_us);
            println!(
                "workers joined:  {} ({} panicked) in {:?}",
                report.shutdown.workers_joined,
                report.shutdown.workers_panicked,
                report.shutdown.stop_to_join
            );
        }
        Err(e) => {
            eprintln!("session failed: {e}");
            std::process::exit(1);
        }
    }
}
