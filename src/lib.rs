//! Archery Range - a single-round archery simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (trajectory, target motion, collisions, round state)
//! - `clock`: Tick cadence contract and a fixed-step driver
//! - `settings`: Range configuration, loadable from JSON
//! - `error`: Error types for rejected commands and bad configuration
//!
//! Rendering, widgets and the window live outside this crate. A collaborator
//! feeds aim/power/shoot commands and time deltas in, and reads
//! [`sim::RoundSnapshot`] values back out.

pub mod clock;
pub mod error;
pub mod settings;
pub mod sim;

pub use clock::{Cadence, FixedStepDriver, SimulationClock};
pub use error::{ConfigError, SimError};
pub use settings::RangeConfig;

/// Range configuration constants (pixel space, y grows downward)
pub mod consts {
    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f64 = 800.0;
    pub const PLAYFIELD_HEIGHT: f64 = 600.0;

    /// Bow position (launch origin of the arrow tip)
    pub const BOW_X: f64 = 100.0;
    pub const BOW_Y: f64 = 300.0;
    /// Distance from the bow to the nocked arrow tip
    pub const ARROW_LENGTH: f64 = 50.0;

    /// Target column and vertical travel range
    pub const TARGET_X: f64 = 700.0;
    pub const TARGET_Y_MIN: f64 = 100.0;
    pub const TARGET_Y_MAX: f64 = 500.0;
    pub const TARGET_WIDTH: f64 = 10.0;
    pub const TARGET_HEIGHT: f64 = 100.0;
    /// Divisor turning the target's travel range into its angular speed.
    /// Empirical; it sets the oscillation period.
    pub const TARGET_OMEGA_DIVISOR: f64 = 134.0;

    /// Downward acceleration (pixels/s²)
    pub const GRAVITY: f64 = 90.8;

    /// Time between resolution and the next shot (seconds)
    pub const COOLDOWN_SECS: f64 = 1.0;
    /// Tick interval while aiming or flying
    pub const ACTIVE_CADENCE_MS: u64 = 17;
    /// Tick interval while a resolved round cools down
    pub const COOLDOWN_CADENCE_MS: u64 = 1000;

    /// Aim input ranges accepted from collaborators
    pub const AIM_DEGREES_MIN: f64 = 0.0;
    pub const AIM_DEGREES_MAX: f64 = 180.0;
    pub const POWER_MIN: f64 = 1.0;
    pub const POWER_MAX: f64 = 1000.0;

    /// Default aim (slider positions at start-up)
    pub const DEFAULT_AIM_DEGREES: f64 = 45.0;
    pub const DEFAULT_POWER: f64 = 500.0;
}

/// Convert an aim input in degrees ([0, 180], 90 = horizontal) to a launch
/// angle in radians measured counter-clockwise from horizontal.
#[inline]
pub fn aim_degrees_to_radians(degrees: f64) -> f64 {
    std::f64::consts::PI * (degrees - 90.0) / 180.0
}

/// Inverse of [`aim_degrees_to_radians`]
#[inline]
pub fn radians_to_aim_degrees(angle: f64) -> f64 {
    angle * 180.0 / std::f64::consts::PI + 90.0
}
