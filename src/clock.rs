//! Tick cadence and fixed-step driving
//!
//! The simulation owns no timer. Whatever drives it implements
//! [`SimulationClock`] and follows the cadence the round asks for: fast while
//! aiming and flying, slow while a resolved shot cools down.
//! [`FixedStepDriver`] does this for frame-based hosts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::settings::Timing;
use crate::sim::{Round, RoundEvent, TickInput, tick};

/// Maximum ticks per `update` call, so a long stall can't snowball
pub const MAX_SUBSTEPS: u32 = 8;

/// Tick rate requested by the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cadence {
    /// Aiming or flying
    Active,
    /// Resolved shot waiting out its cooldown
    Cooldown,
}

impl Cadence {
    pub fn interval(self, timing: &Timing) -> Duration {
        match self {
            Cadence::Active => Duration::from_millis(timing.active_cadence_ms),
            Cadence::Cooldown => Duration::from_millis(timing.cooldown_cadence_ms),
        }
    }

    /// Interval in seconds, the unit `tick` takes
    pub fn interval_secs(self, timing: &Timing) -> f64 {
        self.interval(timing).as_secs_f64()
    }
}

/// Something that calls `tick` periodically and can change its period
pub trait SimulationClock {
    fn cadence(&self) -> Cadence;
    fn set_cadence(&mut self, cadence: Cadence);
}

/// Turns arbitrary frame deltas into fixed ticks at the round's cadence
#[derive(Debug, Clone)]
pub struct FixedStepDriver {
    timing: Timing,
    cadence: Cadence,
    accumulator: f64,
    input: TickInput,
}

impl FixedStepDriver {
    pub fn new(timing: Timing) -> Self {
        Self {
            timing,
            cadence: Cadence::Active,
            accumulator: 0.0,
            input: TickInput::default(),
        }
    }

    /// Current tick length in seconds
    pub fn step_secs(&self) -> f64 {
        self.cadence.interval_secs(&self.timing)
    }

    /// Most time the driver will hold between updates
    pub fn max_backlog_secs(&self) -> f64 {
        self.step_secs() * (2 * MAX_SUBSTEPS) as f64
    }

    /// Queue commands for the next tick. One-shot flags accumulate until
    /// consumed; slider values keep only the latest. Everything queued,
    /// slider values included, is handed to a single tick and then cleared;
    /// the round keeps the applied aim.
    pub fn queue(&mut self, input: TickInput) {
        if input.aim_degrees.is_some() {
            self.input.aim_degrees = input.aim_degrees;
        }
        if input.power.is_some() {
            self.input.power = input.power;
        }
        self.input.shoot |= input.shoot;
        self.input.reset |= input.reset;
    }

    /// Feed one frame's elapsed time; runs as many ticks as fit.
    pub fn update(
        &mut self,
        round: &mut Round,
        frame_dt: f64,
    ) -> Result<Vec<RoundEvent>, SimError> {
        if !frame_dt.is_finite() || frame_dt < 0.0 {
            return Err(SimError::InvalidTimestep { dt: frame_dt });
        }

        // Never bank more than two capped updates' worth of time
        self.accumulator = (self.accumulator + frame_dt).min(self.max_backlog_secs());

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= self.step_secs() && substeps < MAX_SUBSTEPS {
            let step = self.step_secs();
            let input = std::mem::take(&mut self.input);
            match tick(round, &input, step) {
                Ok(tick_events) => events.extend(tick_events),
                Err(e) => {
                    // Bad slider values are dropped; reset and shoot still apply
                    log::warn!("Tick input rejected: {e}");
                    let commands = TickInput {
                        shoot: input.shoot,
                        reset: input.reset,
                        ..Default::default()
                    };
                    events.extend(tick(round, &commands, step)?);
                }
            }
            self.accumulator -= step;
            substeps += 1;

            let wanted = round.cadence();
            if wanted != self.cadence {
                self.set_cadence(wanted);
            }
        }

        Ok(events)
    }
}

impl SimulationClock for FixedStepDriver {
    fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Switching cadence restarts the interval, like re-arming a timer
    fn set_cadence(&mut self, cadence: Cadence) {
        log::debug!("Cadence {:?} -> {:?}", self.cadence, cadence);
        self.cadence = cadence;
        self.accumulator = 0.0;
    }
}
