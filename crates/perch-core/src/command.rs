//! The command value handed from the driver to the worker pool.

use std::time::{Duration, Instant};

use crate::id::ActorId;

/// The kind of action a [`Command`] requests.
///
/// Only [`Flap`](ActionKind::Flap) has an effect on the world; every
/// other kind is accepted by the workers and ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// Apply an instantaneous upward impulse to the primary entity.
    Flap,
    /// Carries no effect. Useful for probing queue latency.
    Noop,
}

impl ActionKind {
    /// Whether this is the triggering action.
    pub fn is_trigger(self) -> bool {
        matches!(self, Self::Flap)
    }
}

/// A single user action, stamped with its creation time.
///
/// Fields are private: once built, a command cannot be altered. It is
/// `Copy`, so every copy carries the exact same actor, action, and
/// timestamp.
///
/// # Examples
///
/// ```
/// use perch_core::{ActionKind, ActorId, Command};
///
/// let cmd = Command::new(ActorId(1), ActionKind::Flap);
/// let copy = cmd;
///
/// assert_eq!(copy, cmd);
/// assert!(copy.action().is_trigger());
/// assert_eq!(copy.actor(), ActorId(1));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Command {
    actor: ActorId,
    action: ActionKind,
    issued_at: Instant,
}

impl Command {
    /// Create a command stamped with the current monotonic time.
    pub fn new(actor: ActorId, action: ActionKind) -> Self {
        Self::at(actor, action, Instant::now())
    }

    /// Create a command with an explicit creation time.
    pub fn at(actor: ActorId, action: ActionKind, issued_at: Instant) -> Self {
        Self {
            actor,
            action,
            issued_at,
        }
    }

    /// The actor that issued this command.
    pub fn actor(&self) -> ActorId {
        self.actor
    }

    /// The requested action.
    pub fn action(&self) -> ActionKind {
        self.action
    }

    /// When the command was created.
    pub fn issued_at(&self) -> Instant {
        self.issued_at
    }

    /// Time elapsed since creation.
    pub fn latency(&self) -> Duration {
        self.latency_at(Instant::now())
    }

    /// Time between creation and `now`, saturating at zero.
    pub fn latency_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.issued_at)
    }
}
