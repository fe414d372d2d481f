//! Error types shared across the Perch workspace.

use thiserror::Error;

/// Errors detected while validating world or engine configuration.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A numeric parameter is NaN or infinite.
    #[error("{name} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A numeric parameter must be strictly positive.
    #[error("{name} must be positive, got {value}")]
    NotPositive {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// A numeric parameter falls outside its allowed range.
    #[error("{name} must be in [{min}, {max}], got {value}")]
    OutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// The randomized gap range is empty or inverted.
    #[error("gap range [{min}, {max}) is empty")]
    InvalidSpawnRange {
        /// Lower end of the range.
        min: f64,
        /// Upper end of the range.
        max: f64,
    },
    /// tick_rate_hz is NaN, infinite, zero, or negative.
    #[error("tick_rate_hz must be finite and positive, got {value}")]
    InvalidTickRate {
        /// The invalid value.
        value: f64,
    },
    /// The worker count override could not be parsed.
    #[error("invalid worker count {value:?}")]
    InvalidWorkerCount {
        /// The raw value that failed to parse.
        value: String,
    },
}
