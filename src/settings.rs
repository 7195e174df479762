//! Range configuration
//!
//! Fixed for the lifetime of a round. Defaults come from [`crate::consts`];
//! a JSON file can override any subset of fields at start-up.

use std::path::Path;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// The bow: where arrows start and how they fall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Launcher {
    /// Launch origin of the arrow tip
    pub origin: DVec2,
    /// Distance from origin to the nocked tip
    pub arrow_length: f64,
    /// Downward acceleration (pixels/s²)
    pub gravity: f64,
}

impl Default for Launcher {
    fn default() -> Self {
        Self {
            origin: DVec2::new(BOW_X, BOW_Y),
            arrow_length: ARROW_LENGTH,
            gravity: GRAVITY,
        }
    }
}

/// The moving target: a fixed column with vertical travel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetTrack {
    pub x: f64,
    pub y_min: f64,
    pub y_max: f64,
    pub width: f64,
    pub height: f64,
    pub omega_divisor: f64,
}

impl Default for TargetTrack {
    fn default() -> Self {
        Self {
            x: TARGET_X,
            y_min: TARGET_Y_MIN,
            y_max: TARGET_Y_MAX,
            width: TARGET_WIDTH,
            height: TARGET_HEIGHT,
            omega_divisor: TARGET_OMEGA_DIVISOR,
        }
    }
}

/// Visible area; leaving it through the right or bottom edge is a miss
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Playfield {
    pub width: f64,
    pub height: f64,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: PLAYFIELD_WIDTH,
            height: PLAYFIELD_HEIGHT,
        }
    }
}

/// Cooldown length and tick cadences
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timing {
    pub cooldown_secs: f64,
    pub active_cadence_ms: u64,
    pub cooldown_cadence_ms: u64,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            cooldown_secs: COOLDOWN_SECS,
            active_cadence_ms: ACTIVE_CADENCE_MS,
            cooldown_cadence_ms: COOLDOWN_CADENCE_MS,
        }
    }
}

/// Complete range configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RangeConfig {
    pub launcher: Launcher,
    pub target: TargetTrack,
    pub playfield: Playfield,
    pub timing: Timing,
}

impl RangeConfig {
    /// Parse and validate a JSON config. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: RangeConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded range config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON (for writing a starter config)
    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject configurations that would produce NaN or degenerate motion
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("launcher.arrow_length", self.launcher.arrow_length)?;
        positive("launcher.gravity", self.launcher.gravity)?;
        finite("launcher.origin.x", self.launcher.origin.x)?;
        finite("launcher.origin.y", self.launcher.origin.y)?;

        finite("target.x", self.target.x)?;
        finite("target.y_min", self.target.y_min)?;
        finite("target.y_max", self.target.y_max)?;
        if self.target.y_min >= self.target.y_max {
            return Err(ConfigError::Invalid {
                field: "target.y_min",
                reason: format!(
                    "must be below target.y_max ({} >= {})",
                    self.target.y_min, self.target.y_max
                ),
            });
        }
        positive("target.width", self.target.width)?;
        positive("target.height", self.target.height)?;
        positive("target.omega_divisor", self.target.omega_divisor)?;
        // Angular speed is a whole number of rad/s; a narrow range rounds it to 0
        if self.target.omega() < 1.0 {
            return Err(ConfigError::Invalid {
                field: "target.y_max",
                reason: format!(
                    "travel {} is shorter than target.omega_divisor ({}), target would not move",
                    self.target.y_max - self.target.y_min,
                    self.target.omega_divisor
                ),
            });
        }

        positive("playfield.width", self.playfield.width)?;
        positive("playfield.height", self.playfield.height)?;

        positive("timing.cooldown_secs", self.timing.cooldown_secs)?;
        if self.timing.active_cadence_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.active_cadence_ms",
                reason: "must be non-zero".to_string(),
            });
        }
        if self.timing.cooldown_cadence_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "timing.cooldown_cadence_ms",
                reason: "must be non-zero".to_string(),
            });
        }
        Ok(())
    }
}

fn finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be finite, got {value}"),
        })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}
