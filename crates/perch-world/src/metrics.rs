//! Lock-free counters describing what the world has processed.
//!
//! [`WorldStats`] is a plain copy; the live counters sit beside the
//! world mutex rather than inside it, so reading them never contends
//! with `apply` or `advance`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Counters collected across the lifetime of a world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldStats {
    /// Commands that changed the primary entity.
    pub commands_applied: u64,
    /// Commands accepted but ignored (non-trigger action or dead entity).
    pub commands_ignored: u64,
    /// Commands whose latency exceeded the configured threshold.
    pub late_commands: u64,
    /// Largest observed command latency, in microseconds.
    pub max_latency_us: u64,
    /// Advances that integrated the world (excludes no-op advances).
    pub ticks: u64,
    /// Number of Alive → Dead transitions (0 or 1).
    pub deaths: u64,
}

#[derive(Debug, Default)]
pub(crate) struct WorldCounters {
    commands_applied: AtomicU64,
    commands_ignored: AtomicU64,
    late_commands: AtomicU64,
    max_latency_us: AtomicU64,
    ticks: AtomicU64,
    deaths: AtomicU64,
}

impl WorldCounters {
    pub fn record_command(&self, applied: bool, latency: Duration, late: bool) {
        if applied {
            self.commands_applied.fetch_add(1, Ordering::Relaxed);
        } else {
            self.commands_ignored.fetch_add(1, Ordering::Relaxed);
        }
        if late {
            self.late_commands.fetch_add(1, Ordering::Relaxed);
        }
        let us = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.max_latency_us.fetch_max(us, Ordering::Relaxed);
    }

    pub fn record_tick(&self) {
        self.ticks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_death(&self) {
        self.deaths.fetch_add(1, Ordering::Relaxed);
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            commands_applied: self.commands_applied.load(Ordering::Relaxed),
            commands_ignored: self.commands_ignored.load(Ordering::Relaxed),
            late_commands: self.late_commands.load(Ordering::Relaxed),
            max_latency_us: self.max_latency_us.load(Ordering::Relaxed),
            ticks: self.ticks.load(Ordering::Relaxed),
            deaths: self.deaths.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_stats_are_zero() {
        assert_eq!(WorldCounters::default().stats(), WorldStats::default());
    }

    #[test]
    fn records_commands_and_keeps_max_latency() {
        let c = WorldCounters::default();
        c.record_command(true, Duration::from_micros(300), false);
        c.record_command(false, Duration::from_micros(2500), true);
        c.record_command(true, Duration::from_micros(40), false);
        c.record_tick();
        c.record_death();

        let s = c.stats();
        assert_eq!(s.commands_applied, 2);
        assert_eq!(s.commands_ignored, 1);
        assert_eq!(s.late_commands, 1);
        assert_eq!(s.max_latency_us, 2500);
        assert_eq!(s.ticks, 1);
        assert_eq!(s.deaths, 1);
    }
}
