//! Blocking multi-producer, multi-consumer FIFO with a stop signal.
//!
//! [`SafeQueue`] pairs one `Mutex` with one `Condvar`. Producers never
//! block; consumers park in [`pop`](SafeQueue::pop) until an item
//! arrives or the queue is stopped. After [`stop`](SafeQueue::stop),
//! consumers keep draining whatever is still queued and only then see
//! `None`.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

struct Inner<T> {
    items: VecDeque<T>,
    stopped: bool,
}

/// A thread-safe FIFO queue with blocking pop and a terminal stop state.
///
/// Share it through an `Arc`. All methods take `&self`.
///
/// # Examples
///
/// ```
/// use perch_engine::SafeQueue;
///
/// let q = SafeQueue::new();
/// assert!(q.push(1));
/// assert!(q.push(2));
/// q.stop();
/// assert!(!q.push(3));
/// assert_eq!(q.pop(), Some(1));
/// assert_eq!(q.pop(), Some(2));
/// assert_eq!(q.pop(), None);
/// ```
pub struct SafeQueue<T> {
    inner: Mutex<Inner<T>>,
    ready: Condvar,
}

impl<T> SafeQueue<T> {
    /// Create an empty, running queue.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::new(),
                stopped: false,
            }),
            ready: Condvar::new(),
        }
    }

    /// Append `item` and wake one waiting consumer.
    ///
    /// Returns `false` and drops the item if the queue has been stopped.
    pub fn push(&self, item: T) -> bool {
        {
            let mut inner = self.lock();
            if inner.stopped {
                return false;
            }
            inner.items.push_back(item);
        }
        self.ready.notify_one();
        true
    }

    /// Remove the front item, blocking while the queue is empty and
    /// still running.
    ///
    /// Returns `None` only once the queue is stopped *and* empty.
    pub fn pop(&self) -> Option<T> {
        let guard = self.lock();
        let mut inner = self
            .ready
            .wait_while(guard, |inner| inner.items.is_empty() && !inner.stopped)
            .unwrap_or_else(PoisonError::into_inner);
        inner.items.pop_front()
    }

    /// Remove the front item without blocking.
    pub fn try_pop(&self) -> Option<T> {
        self.lock().items.pop_front()
    }

    /// Stop the queue and wake every waiting consumer.
    ///
    /// Idempotent: a second call neither changes state nor notifies.
    pub fn stop(&self) {
        {
            let mut inner = self.lock();
            if inner.stopped {
                return;
            }
            inner.stopped = true;
        }
        self.ready.notify_all();
    }

    /// Whether [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.lock().stopped
    }

    /// Number of queued items.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether no items are queued.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }

    // Every critical section is a single VecDeque op or a flag write, so
    // a panicking holder cannot leave the state half-updated.
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Default for SafeQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for SafeQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("SafeQueue")
            .field("len", &inner.items.len())
            .field("stopped", &inner.stopped)
            .finish()
    }
}

// Compile-time assertion: SafeQueue<T> is Send + Sync for Send T.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<SafeQueue<perch_core::Command>>();
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn fifo_single_thread() {
        let q = SafeQueue::new();
        for i in 0..5 {
            assert!(q.push(i));
        }
        assert_eq!(q.len(), 5);
        let out: Vec<_> = std::iter::from_fn(|| q.try_pop()).collect();
        assert_eq!(out, vec![0, 1, 2, 3, 4]);
        assert!(q.is_empty());
    }

    #[test]
    fn push_after_stop_is_dropped() {
        let q = SafeQueue::new();
        q.stop();
        assert!(q.is_stopped());
        assert!(!q.push("late"));
        assert!(q.is_empty());
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn stop_drains_remaining_items_first() {
        let q = SafeQueue::new();
        q.push('a');
        q.push('b');
        q.stop();
        q.stop();
        assert_eq!(q.pop(), Some('a'));
        assert_eq!(q.pop(), Some('b'));
        assert_eq!(q.pop(), None);
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn try_pop_on_empty_returns_none() {
        let q: SafeQueue<u8> = SafeQueue::default();
        assert_eq!(q.try_pop(), None);
    }

    #[test]
    fn pop_blocks_until_push() {
        let q = Arc::new(SafeQueue::new());
        let consumer = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.pop())
        };
        thread::sleep(Duration::from_millis(20));
        assert!(!consumer.is_finished());
        q.push(42);
        assert_eq!(consumer.join().unwrap(), Some(42));
    }

    #[test]
    fn stop_wakes_every_blocked_consumer() {
        let q: Arc<SafeQueue<u32>> = Arc::new(SafeQueue::new());
        let consumers: Vec<_> = (0..6)
            .map(|_| {
                let q = Arc::clone(&q);
                thread::spawn(move || q.pop())
            })
            .collect();
        thread::sleep(Duration::from_millis(20));
        q.stop();
        for c in consumers {
            assert_eq!(c.join().unwrap(), None);
        }
    }

    #[test]
    fn poisoned_lock_is_recovered() {
        let q = Arc::new(SafeQueue::new());
        q.push(1);
        let poisoner = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                let _guard = q.inner.lock().unwrap();
                panic!("poisoning queue lock for test");
            })
        };
        assert!(poisoner.join().is_err());
        assert!(q.push(2));
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
    }

    #[test]
    fn debug_reports_len_and_state() {
        let q = SafeQueue::new();
        q.push(());
        assert_eq!(format!("{q:?}"), "SafeQueue { len: 1, stopped: false }");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn preserves_order_and_loses_nothing(
                items in prop::collection::vec(any::<u32>(), 0..200),
                stop_early in any::<bool>(),
            ) {
                let q = SafeQueue::new();
                for &i in &items {
                    prop_assert!(q.push(i));
                }
                if stop_early {
                    q.stop();
                }
                let mut out = Vec::with_capacity(items.len());
                while let Some(i) = q.try_pop() {
                    out.push(i);
                }
                prop_assert_eq!(out, items);
            }
        }
    }
}
