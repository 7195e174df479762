//! Round state and commands
//!
//! A [`Round`] is the only mutable state in the simulation. Collaborators
//! change it through commands (`set_aim`, `set_power`, `shoot`, `reset`) and
//! [`Round::advance`], and read it back through [`RoundSnapshot`].

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::target::target_position;
use super::trajectory::{arrow_heading, nocked_position};
use crate::aim_degrees_to_radians;
use crate::clock::Cadence;
use crate::consts::*;
use crate::error::SimError;
use crate::settings::RangeConfig;

/// How a shot ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Hit,
    Miss,
}

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Aiming; aim and power can change
    Idle,
    /// Arrow in the air
    Flying,
    /// Shot just ended (entered on the resolving tick)
    Resolved(Outcome),
    /// Waiting out the cooldown before the next shot
    Cooldown,
}

impl RoundPhase {
    /// Aim and power only change while idle
    pub fn aim_unlocked(&self) -> bool {
        matches!(self, RoundPhase::Idle)
    }
}

/// Something a collaborator may want to react to (sound, flash, message)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// Arrow released
    Launched,
    /// Shot ended; the round now wants the cooldown cadence
    Resolved(Outcome),
    /// Cooldown over, back to aiming at the active cadence
    Rearmed,
}

/// Launch angle and power
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AimSettings {
    /// Radians counter-clockwise from horizontal, in [-π/2, π/2]
    pub angle: f64,
    /// Launch speed (pixels/s)
    pub power: f64,
}

impl Default for AimSettings {
    fn default() -> Self {
        Self {
            angle: aim_degrees_to_radians(DEFAULT_AIM_DEGREES),
            power: DEFAULT_POWER,
        }
    }
}

impl AimSettings {
    /// Build from collaborator inputs (degrees in [0, 180], power in [1, 1000])
    pub fn from_inputs(degrees: f64, power: f64) -> Result<Self, SimError> {
        Ok(Self {
            angle: validate_degrees(degrees)?,
            power: validate_power(power)?,
        })
    }

    /// The angle as a collaborator input (degrees, 90 = horizontal)
    pub fn degrees(&self) -> f64 {
        crate::radians_to_aim_degrees(self.angle)
    }
}

/// Range-check an aim input and convert it to radians
pub fn validate_degrees(degrees: f64) -> Result<f64, SimError> {
    if !(AIM_DEGREES_MIN..=AIM_DEGREES_MAX).contains(&degrees) {
        return Err(SimError::AngleOutOfRange {
            degrees,
            min: AIM_DEGREES_MIN,
            max: AIM_DEGREES_MAX,
        });
    }
    Ok(aim_degrees_to_radians(degrees))
}

/// Range-check a power input
pub fn validate_power(power: f64) -> Result<f64, SimError> {
    if !(POWER_MIN..=POWER_MAX).contains(&power) {
        return Err(SimError::PowerOutOfRange {
            power,
            min: POWER_MIN,
            max: POWER_MAX,
        });
    }
    Ok(power)
}

/// The arrow: flight clock plus derived tip position and heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArrowState {
    /// Seconds since release; 0 unless flying
    pub flight_time: f64,
    /// Tip position. Nocked while idle, frozen at the last flight position
    /// once the shot resolves.
    pub pos: DVec2,
    /// Radians counter-clockwise from horizontal
    pub heading: f64,
}

/// The target's current center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TargetState {
    pub pos: DVec2,
}

/// Read-only view of a round for rendering
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoundSnapshot {
    pub phase: RoundPhase,
    /// Outcome of the last shot, kept through the cooldown
    pub outcome: Option<Outcome>,
    pub arrow_pos: DVec2,
    pub arrow_heading: f64,
    pub target_pos: DVec2,
    pub aim: AimSettings,
    pub aim_locked: bool,
    pub global_time: f64,
    pub flight_time: f64,
    /// Tick cadence the round wants from its clock
    pub cadence: Cadence,
}

/// Complete round state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub(crate) config: RangeConfig,
    pub(crate) aim: AimSettings,
    pub(crate) arrow: ArrowState,
    pub(crate) target: TargetState,
    pub(crate) phase: RoundPhase,
    pub(crate) outcome: Option<Outcome>,
    /// Seconds since the last reset; drives the target
    pub(crate) global_time: f64,
    pub(crate) cooldown_remaining: f64,
}

impl Default for Round {
    fn default() -> Self {
        Self::new(RangeConfig::default())
    }
}

impl Round {
    /// Create an idle round with default aim
    pub fn new(config: RangeConfig) -> Self {
        Self::with_aim(config, AimSettings::default())
    }

    /// Create an idle round with the given aim
    pub fn with_aim(config: RangeConfig, aim: AimSettings) -> Self {
        let mut round = Self {
            config,
            aim,
            arrow: ArrowState {
                flight_time: 0.0,
                pos: DVec2::ZERO,
                heading: 0.0,
            },
            target: TargetState {
                pos: target_position(&config.target, 0.0),
            },
            phase: RoundPhase::Idle,
            outcome: None,
            global_time: 0.0,
            cooldown_remaining: 0.0,
        };
        round.nock_arrow();
        round
    }

    pub fn config(&self) -> &RangeConfig {
        &self.config
    }

    pub fn aim(&self) -> AimSettings {
        self.aim
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn arrow(&self) -> &ArrowState {
        &self.arrow
    }

    pub fn target(&self) -> &TargetState {
        &self.target
    }

    pub fn global_time(&self) -> f64 {
        self.global_time
    }

    pub fn flight_time(&self) -> f64 {
        self.arrow.flight_time
    }

    pub fn cooldown_remaining(&self) -> f64 {
        self.cooldown_remaining
    }

    /// Cadence the driving clock should tick at right now
    pub fn cadence(&self) -> Cadence {
        match self.phase {
            RoundPhase::Idle | RoundPhase::Flying => Cadence::Active,
            RoundPhase::Resolved(_) | RoundPhase::Cooldown => Cadence::Cooldown,
        }
    }

    /// Set the aim from a collaborator input in degrees ([0, 180])
    pub fn set_aim(&mut self, degrees: f64) -> Result<(), SimError> {
        self.ensure_aim_unlocked()?;
        let angle = validate_degrees(degrees).inspect_err(|e| log::warn!("Rejected aim: {e}"))?;
        self.aim.angle = angle;
        self.nock_arrow();
        Ok(())
    }

    /// Set the launch power ([1, 1000] pixels/s)
    pub fn set_power(&mut self, power: f64) -> Result<(), SimError> {
        self.ensure_aim_unlocked()?;
        self.aim.power =
            validate_power(power).inspect_err(|e| log::warn!("Rejected power: {e}"))?;
        Ok(())
    }

    /// Release the arrow. Returns false (and changes nothing) unless idle.
    pub fn shoot(&mut self) -> bool {
        if self.phase != RoundPhase::Idle {
            log::debug!("Shoot ignored while {:?}", self.phase);
            return false;
        }
        self.arrow.flight_time = 0.0;
        self.phase = RoundPhase::Flying;
        log::info!(
            "Arrow released: angle {:.1}°, power {:.0}",
            self.aim.degrees(),
            self.aim.power
        );
        true
    }

    /// Force the round back to idle from any phase, restarting global time.
    /// Aim and power are kept.
    pub fn reset(&mut self) {
        self.phase = RoundPhase::Idle;
        self.outcome = None;
        self.global_time = 0.0;
        self.cooldown_remaining = 0.0;
        self.target.pos = target_position(&self.config.target, 0.0);
        self.nock_arrow();
        log::info!("Round reset");
    }

    /// Read-only view for rendering
    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            phase: self.phase,
            outcome: self.outcome,
            arrow_pos: self.arrow.pos,
            arrow_heading: self.arrow.heading,
            target_pos: self.target.pos,
            aim: self.aim,
            aim_locked: !self.phase.aim_unlocked(),
            global_time: self.global_time,
            flight_time: self.arrow.flight_time,
            cadence: self.cadence(),
        }
    }

    fn ensure_aim_unlocked(&self) -> Result<(), SimError> {
        if self.phase.aim_unlocked() {
            Ok(())
        } else {
            log::debug!("Aim change rejected while {:?}", self.phase);
            Err(SimError::AimLocked { phase: self.phase })
        }
    }

    /// Put the arrow back on the bow at the current aim
    pub(crate) fn nock_arrow(&mut self) {
        let launcher = &self.config.launcher;
        self.arrow = ArrowState {
            flight_time: 0.0,
            pos: nocked_position(launcher, self.aim.angle),
            heading: arrow_heading(launcher, self.aim.angle, self.aim.power, 0.0),
        };
    }
}
