//! Error types
//!
//! The simulation has no fatal paths. Everything here is a rejected command
//! or a configuration that failed to load; state is left untouched either way.

use thiserror::Error;

use crate::sim::RoundPhase;

/// A command the round refused to apply
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum SimError {
    #[error("Aim angle {degrees} outside [{min}, {max}] degrees")]
    AngleOutOfRange { degrees: f64, min: f64, max: f64 },

    #[error("Launch power {power} outside [{min}, {max}]")]
    PowerOutOfRange { power: f64, min: f64, max: f64 },

    #[error("Tick delta must be positive and finite, got {dt}")]
    InvalidTimestep { dt: f64 },

    #[error("Aim is locked while the round is {phase:?}")]
    AimLocked { phase: RoundPhase },
}

/// Configuration failed to load or validate
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {field} {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl SimError {
    /// Whether retrying the same command later could succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, SimError::AimLocked { .. })
    }
}
