//! The per-worker processing seam.
//!
//! A [`QueueHandler`] owns its pop loop: each worker thread calls
//! [`drain`](QueueHandler::drain) exactly once and the thread exits
//! when it returns. Handlers are shared by every worker, so they take
//! `&self` and carry their collaborators by `Arc`.

use std::sync::Arc;

use perch_core::Command;
use perch_world::SharedWorld;

use crate::queue::SafeQueue;

/// Work run on every pool thread.
///
/// Implementations should loop on [`SafeQueue::pop`] until it returns
/// `None`, which happens once the queue is stopped and drained.
pub trait QueueHandler<T>: Send + Sync + 'static {
    /// Consume items from `queue` until it is stopped and empty.
    fn drain(&self, queue: &SafeQueue<T>);
}

impl<T, F> QueueHandler<T> for F
where
    F: Fn(&SafeQueue<T>) + Send + Sync + 'static,
{
    fn drain(&self, queue: &SafeQueue<T>) {
        self(queue)
    }
}

/// Applies each popped [`Command`] to a shared world.
#[derive(Clone)]
pub struct CommandApplier {
    world: Arc<SharedWorld>,
}

impl CommandApplier {
    /// Create an applier that mutates `world`.
    pub fn new(world: Arc<SharedWorld>) -> Self {
        Self { world }
    }

    /// The world this applier mutates.
    pub fn world(&self) -> &Arc<SharedWorld> {
        &self.world
    }
}

impl QueueHandler<Command> for CommandApplier {
    fn drain(&self, queue: &SafeQueue<Command>) {
        while let Some(cmd) = queue.pop() {
            // Outcome and latency are recorded by the world itself.
            self.world.apply(&cmd);
        }
    }
}

impl std::fmt::Debug for CommandApplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandApplier").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use perch_core::{ActionKind, ActorId};
    use perch_world::WorldConfig;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn closure_handler_drains_until_stopped() {
        let q = SafeQueue::new();
        for i in 0..4 {
            q.push(i);
        }
        q.stop();
        let seen = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&seen);
        let handler = move |queue: &SafeQueue<i32>| {
            while queue.pop().is_some() {
                counter.fetch_add(1, Ordering::Relaxed);
            }
        };
        QueueHandler::drain(&handler, &q);
        assert_eq!(seen.load(Ordering::Relaxed), 4);
        assert!(q.is_empty());
    }

    #[test]
    fn applier_applies_every_command() {
        let world = Arc::new(SharedWorld::new(WorldConfig::default()).unwrap());
        let q = SafeQueue::new();
        q.push(Command::new(ActorId(0), ActionKind::Flap));
        q.push(Command::new(ActorId(1), ActionKind::Noop));
        q.push(Command::new(ActorId(2), ActionKind::Flap));
        q.stop();

        CommandApplier::new(Arc::clone(&world)).drain(&q);

        assert!(q.is_empty());
        let stats = world.metrics();
        assert_eq!(stats.commands_applied, 2);
        assert_eq!(stats.commands_ignored, 1);
        assert_eq!(world.primary().velocity, 15.0);
    }
}
