//! Engine and driver configuration.
//!
//! [`EngineConfig`] sizes the worker pool and carries the
//! [`DriverConfig`] for the paced frame loop. The only environment
//! input is `PERCH_WORKERS`, read by [`EngineConfig::from_env`].

use std::time::Duration;

use perch_core::{ActorId, ConfigError};

/// Environment variable overriding [`EngineConfig::worker_count`].
pub const WORKERS_ENV: &str = "PERCH_WORKERS";

// ── DriverConfig ──────────────────────────────────────────────────

/// Configuration for the [`Driver`](crate::Driver) frame loop.
#[derive(Clone, Debug, PartialEq)]
pub struct DriverConfig {
    /// Frames per second; each frame advances the world by
    /// `1 / tick_rate_hz` seconds. Default: 60.
    pub tick_rate_hz: f64,
    /// Sleep the remainder of each frame budget. Disable for headless
    /// runs that should go as fast as possible. Default: true.
    pub paced: bool,
    /// Stop after this many frames. Default: `None` (unbounded).
    pub max_frames: Option<u64>,
    /// Stop on the frame the primary entity dies. Default: true.
    pub exit_on_death: bool,
    /// Actor stamped on every command the driver issues. Default: 0.
    pub actor: ActorId,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60.0,
            paced: true,
            max_frames: None,
            exit_on_death: true,
            actor: ActorId(0),
        }
    }
}

impl DriverConfig {
    /// Check that the tick rate is finite and positive, and that its
    /// frame budget fits in a `Duration`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite_positive = self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0;
        if !finite_positive || Duration::try_from_secs_f64(1.0 / self.tick_rate_hz).is_err() {
            return Err(ConfigError::InvalidTickRate {
                value: self.tick_rate_hz,
            });
        }
        Ok(())
    }

    /// World time advanced per frame, in seconds.
    pub fn dt(&self) -> f32 {
        (1.0 / self.tick_rate_hz) as f32
    }

    /// Wall-clock budget of one frame. Saturates at `Duration::MAX`.
    pub fn frame_budget(&self) -> Duration {
        Duration::try_from_secs_f64(1.0 / self.tick_rate_hz).unwrap_or(Duration::MAX)
    }
}

// ── EngineConfig ──────────────────────────────────────────────────

/// Top-level configuration for a [`Session`](crate::Session).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EngineConfig {
    /// Number of worker threads. `None` = auto-detect
    /// (`available_parallelism`, or 4 if unknown).
    pub worker_count: Option<usize>,
    /// Frame loop settings.
    pub driver: DriverConfig,
}

impl EngineConfig {
    /// Defaults, with `worker_count` taken from `PERCH_WORKERS` if set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var(WORKERS_ENV).ok();
        Ok(Self {
            worker_count: parse_worker_count(raw.as_deref())?,
            ..Self::default()
        })
    }

    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4),
        }
    }

    /// Validate the nested driver configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.driver.validate()
    }
}

/// Parse a raw `PERCH_WORKERS` value. Unset or blank means auto-detect.
fn parse_worker_count(raw: Option<&str>) -> Result<Option<usize>, ConfigError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<usize>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidWorkerCount {
                value: s.to_owned(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_defaults() {
        let c = DriverConfig::default();
        assert_eq!(c.tick_rate_hz, 60.0);
        assert!(c.paced);
        assert!(c.exit_on_death);
        assert_eq!(c.max_frames, None);
        assert!((c.dt() - 1.0 / 60.0).abs() < 1e-7);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn bad_tick_rates_rejected() {
        for value in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let c = DriverConfig {
                tick_rate_hz: value,
                ..DriverConfig::default()
            };
            assert!(
                matches!(c.validate(), Err(ConfigError::InvalidTickRate { .. })),
                "{value} accepted"
            );
        }
    }

    #[test]
    fn tick_rate_whose_budget_overflows_is_rejected() {
        let tiny = DriverConfig {
            tick_rate_hz: 1e-20,
            ..DriverConfig::default()
        };
        assert_eq!(
            tiny.validate(),
            Err(ConfigError::InvalidTickRate { value: 1e-20 })
        );
        assert_eq!(tiny.frame_budget(), Duration::MAX);

        let slow = DriverConfig {
            tick_rate_hz: 1e-3,
            ..DriverConfig::default()
        };
        assert!(slow.validate().is_ok());
        assert_eq!(slow.frame_budget(), Duration::from_secs(1000));
    }

    #[test]
    fn explicit_worker_count_is_clamped() {
        let with = |n| EngineConfig {
            worker_count: Some(n),
            ..EngineConfig::default()
        };
        assert_eq!(with(0).resolved_worker_count(), 1);
        assert_eq!(with(8).resolved_worker_count(), 8);
        assert_eq!(with(1000).resolved_worker_count(), 64);
        assert!(EngineConfig::default().resolved_worker_count() >= 1);
    }

    #[test]
    fn worker_count_parsing() {
        assert_eq!(parse_worker_count(None), Ok(None));
        assert_eq!(parse_worker_count(Some("  ")), Ok(None));
        assert_eq!(parse_worker_count(Some("6")), Ok(Some(6)));
        assert_eq!(parse_worker_count(Some(" 3 ")), Ok(Some(3)));
        assert_eq!(
            parse_worker_count(Some("lots")),
            Err(ConfigError::InvalidWorkerCount {
                value: "lots".into()
            })
        );
        assert!(parse_worker_count(Some("-2")).is_err());
    }
}
