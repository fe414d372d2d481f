//! The latency-sensitive producer loop.
//!
//! The [`Driver`] runs on the caller's thread. Each frame it polls
//! input, turns flaps into [`Command`]s for the worker pool, advances
//! the world by one fixed step, and hands a snapshot to the
//! [`Presenter`]. It never blocks on the queue and never applies
//! commands itself.
//!
//! The driver does not own the shutdown protocol: it only stops
//! producing. Stopping the queue and joining the pool is the job of
//! [`Session`](crate::Session).

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, trace};

use perch_core::{ActionKind, Command, ConfigError};
use perch_world::{AdvanceOutcome, PrimaryState, SharedWorld, WorldSnapshot};

use crate::cancel::CancellationToken;
use crate::config::DriverConfig;
use crate::input::{InputBuffer, InputEvent, InputSource};
use crate::queue::SafeQueue;

/// One presented frame.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    /// Zero-based frame number.
    pub index: u64,
    /// World state after this frame's advance.
    pub snapshot: WorldSnapshot,
}

/// Receives every frame the driver produces.
pub trait Presenter {
    /// Present one frame. Runs on the driver thread, so keep it short.
    fn present(&mut self, frame: &Frame);
}

impl<P: Presenter + ?Sized> Presenter for &mut P {
    fn present(&mut self, frame: &Frame) {
        (**self).present(frame)
    }
}

impl<P: Presenter + ?Sized> Presenter for Box<P> {
    fn present(&mut self, frame: &Frame) {
        (**self).present(frame)
    }
}

/// Why [`Driver::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverExit {
    /// The cancellation token was cancelled.
    Cancelled,
    /// The input source produced [`InputEvent::Quit`].
    Quit,
    /// The primary entity died and `exit_on_death` is set.
    EntityDead,
    /// `max_frames` frames were produced.
    FrameLimit,
    /// The world lock is poisoned.
    WorldUnavailable,
}

/// Summary of a [`Driver::run`].
#[derive(Clone, Debug, PartialEq)]
pub struct DriverReport {
    /// Frames presented.
    pub frames: u64,
    /// Commands accepted by the queue.
    pub commands_pushed: u64,
    /// Commands refused because the queue was stopped.
    pub commands_dropped: u64,
    /// Exit reason.
    pub exit: DriverExit,
    /// Primary entity state when the loop returned.
    pub final_primary: PrimaryState,
}

/// The frame loop.
pub struct Driver<I, P> {
    queue: Arc<SafeQueue<Command>>,
    world: Arc<SharedWorld>,
    input: I,
    presenter: P,
    cancel: CancellationToken,
    config: DriverConfig,
    events: InputBuffer,
}

impl<I: InputSource, P: Presenter> Driver<I, P> {
    /// Build a driver over shared queue and world handles.
    pub fn new(
        queue: Arc<SafeQueue<Command>>,
        world: Arc<SharedWorld>,
        input: I,
        presenter: P,
        cancel: CancellationToken,
        config: DriverConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            queue,
            world,
            input,
            presenter,
            cancel,
            config,
            events: InputBuffer::new(),
        })
    }

    /// The loop configuration.
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// The token that stops this driver.
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Run frames until an exit condition is met.
    pub fn run(&mut self) -> DriverReport {
        let dt = self.config.dt();
        let budget = self.config.frame_budget();
        let mut frames = 0u64;
        let mut pushed = 0u64;
        let mut dropped = 0u64;

        info!(
            tick_rate_hz = self.config.tick_rate_hz,
            paced = self.config.paced,
            "driver started"
        );

        let exit = loop {
            // 1. Cancellation.
            if self.cancel.is_cancelled() {
                break DriverExit::Cancelled;
            }
            if !self.world.is_available() {
                break DriverExit::WorldUnavailable;
            }
            let frame_start = Instant::now();

            // 2. Input → commands.
            let input = self.poll_input();
            pushed += input.pushed;
            dropped += input.dropped;
            if input.quit {
                self.cancel.cancel();
                break DriverExit::Quit;
            }

            // 3. Advance.
            if self.world.advance(dt) == AdvanceOutcome::Unavailable {
                break DriverExit::WorldUnavailable;
            }

            // 4. Present.
            let frame = Frame {
                index: frames,
                snapshot: self.world.snapshot(),
            };
            self.presenter.present(&frame);
            frames += 1;
            trace!(
                frame = frame.index,
                tick = frame.snapshot.tick,
                y = frame.snapshot.primary.y,
                "frame presented"
            );

            // 5. Exit conditions.
            if self.config.exit_on_death && !frame.snapshot.primary.is_alive() {
                break DriverExit::EntityDead;
            }
            if self.config.max_frames.is_some_and(|max| frames >= max) {
                break DriverExit::FrameLimit;
            }

            // 6. Pace. A cancel during the sleep is picked up by step 1.
            if self.config.paced {
                if let Some(remaining) = budget.checked_sub(frame_start.elapsed()) {
                    self.cancel.sleep(remaining);
                }
            }
        };

        let report = DriverReport {
            frames,
            commands_pushed: pushed,
            commands_dropped: dropped,
            exit,
            final_primary: self.world.primary(),
        };
        info!(
            frames,
            commands_pushed = pushed,
            commands_dropped = dropped,
            ?exit,
            score = report.final_primary.score,
            "driver stopped"
        );
        report
    }

    fn poll_input(&mut self) -> PolledInput {
        let mut polled = PolledInput::default();
        self.events.clear();
        self.input.poll(&mut self.events);

        for event in &self.events {
            match event {
                InputEvent::Quit => {
                    polled.quit = true;
                    break;
                }
                // A dead entity ignores commands anyway; skip the queue.
                InputEvent::Flap if self.world.is_alive() => {
                    let cmd = Command::new(self.config.actor, ActionKind::Flap);
                    if self.queue.push(cmd) {
                        polled.pushed += 1;
                    } else {
                        polled.dropped += 1;
                        debug!("queue stopped, flap dropped");
                    }
                }
                InputEvent::Flap | InputEvent::Other => {}
            }
        }
        polled
    }
}

#[derive(Default)]
struct PolledInput {
    pushed: u64,
    dropped: u64,
    quit: bool,
}

impl<I, P> std::fmt::Debug for Driver<I, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}
