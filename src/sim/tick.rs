//! Round state machine
//!
//! [`Round::advance`] is the single time-stepping entry point; it branches on
//! the current phase. [`tick`] wraps it with a batch of collaborator commands
//! for drivers that collect input between ticks.

use super::collision::{Contact, classify};
use super::state::{Outcome, Round, RoundEvent, RoundPhase, validate_degrees, validate_power};
use super::target::target_position;
use super::trajectory::{arrow_heading, arrow_position};
use crate::error::SimError;

/// Leftover cooldown below this counts as elapsed (absorbs float drift from
/// summing many small deltas)
const COOLDOWN_EPSILON: f64 = 1e-9;

/// Commands collected since the previous tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest aim slider value (degrees). Ignored while aim is locked.
    pub aim_degrees: Option<f64>,
    /// Latest power slider value. Ignored while aim is locked.
    pub power: Option<f64>,
    /// Release the arrow
    pub shoot: bool,
    /// Force the round back to idle
    pub reset: bool,
}

/// Apply `input`, then advance the round by `dt` seconds.
///
/// Everything is validated before anything is applied: an out-of-range aim or
/// a bad `dt` leaves the round untouched. Aim changes that arrive while the
/// aim is locked are dropped, as a disabled slider would.
pub fn tick(round: &mut Round, input: &TickInput, dt: f64) -> Result<Vec<RoundEvent>, SimError> {
    validate_dt(dt)?;
    if let Some(degrees) = input.aim_degrees {
        validate_degrees(degrees)?;
    }
    if let Some(power) = input.power {
        validate_power(power)?;
    }

    let mut events = Vec::new();

    if input.reset {
        round.reset();
    }

    if round.phase().aim_unlocked() {
        if let Some(degrees) = input.aim_degrees {
            round.set_aim(degrees)?;
        }
        if let Some(power) = input.power {
            round.set_power(power)?;
        }
    } else if input.aim_degrees.is_some() || input.power.is_some() {
        log::debug!("Dropping aim input while {:?}", round.phase());
    }

    if input.shoot && round.shoot() {
        events.push(RoundEvent::Launched);
    }

    if let Some(event) = round.advance(dt)? {
        events.push(event);
    }

    Ok(events)
}

fn validate_dt(dt: f64) -> Result<(), SimError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(())
    } else {
        log::warn!("Rejected tick with dt {dt}");
        Err(SimError::InvalidTimestep { dt })
    }
}

impl Round {
    /// Advance the simulation by `dt` seconds.
    ///
    /// The target moves in every phase. While flying, the arrow moves and is
    /// checked against the target first and the playfield edges second.
    /// Resolved and cooldown ticks count down the cooldown and rearm once it
    /// has elapsed.
    pub fn advance(&mut self, dt: f64) -> Result<Option<RoundEvent>, SimError> {
        validate_dt(dt)?;

        self.global_time += dt;
        self.target.pos = target_position(&self.config.target, self.global_time);

        let event = match self.phase {
            RoundPhase::Idle => None,

            RoundPhase::Flying => {
                self.arrow.flight_time += dt;
                let launcher = &self.config.launcher;
                let t = self.arrow.flight_time;
                self.arrow.pos = arrow_position(launcher, self.aim.angle, self.aim.power, t);
                self.arrow.heading = arrow_heading(launcher, self.aim.angle, self.aim.power, t);

                match classify(
                    self.arrow.pos,
                    self.target.pos,
                    &self.config.target,
                    &self.config.playfield,
                ) {
                    Contact::Target => Some(self.resolve(Outcome::Hit)),
                    Contact::OutOfBounds => Some(self.resolve(Outcome::Miss)),
                    Contact::None => None,
                }
            }

            RoundPhase::Resolved(_) | RoundPhase::Cooldown => {
                self.cooldown_remaining -= dt;
                if self.cooldown_remaining <= COOLDOWN_EPSILON {
                    Some(self.rearm())
                } else {
                    self.phase = RoundPhase::Cooldown;
                    None
                }
            }
        };

        Ok(event)
    }

    /// End the shot. The arrow stays where it landed for rendering.
    fn resolve(&mut self, outcome: Outcome) -> RoundEvent {
        log::info!(
            "Shot resolved: {:?} at ({:.1}, {:.1}) after {:.3}s",
            outcome,
            self.arrow.pos.x,
            self.arrow.pos.y,
            self.arrow.flight_time
        );
        self.phase = RoundPhase::Resolved(outcome);
        self.outcome = Some(outcome);
        self.arrow.flight_time = 0.0;
        self.cooldown_remaining = self.config.timing.cooldown_secs;
        RoundEvent::Resolved(outcome)
    }

    /// Cooldown over: back to aiming. Global time keeps running.
    fn rearm(&mut self) -> RoundEvent {
        self.phase = RoundPhase::Idle;
        self.outcome = None;
        self.cooldown_remaining = 0.0;
        self.nock_arrow();
        log::info!("Rearmed at t={:.3}s", self.global_time);
        RoundEvent::Rearmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::Cadence;
    use crate::settings::{Playfield, RangeConfig};
    use glam::DVec2;

    /// Exactly representable step so positions land on whole pixels
    const DT: f64 = 1.0 / 64.0;

    /// Horizontal shot at 640 px/s: 10 px per tick, tip at x=700 on tick 60.
    /// Forty idle ticks first put the target near its center when it arrives.
    fn lined_up_round(config: RangeConfig) -> Round {
        let mut round = Round::new(config);
        round.set_aim(90.0).unwrap();
        round.set_power(640.0).unwrap();
        for _ in 0..40 {
            round.advance(DT).unwrap();
        }
        assert!(round.shoot());
        round
    }

    #[test]
    fn test_idle_tick_moves_target_only() {
        let mut round = Round::default();
        let arrow_before = round.arrow().pos;
        let event = round.advance(0.25).unwrap();
        assert!(event.is_none());
        assert_eq!(round.phase(), RoundPhase::Idle);
        assert_eq!(round.arrow().pos, arrow_before);
        assert_eq!(round.flight_time(), 0.0);
        assert_eq!(round.global_time(), 0.25);
        assert!((round.target().pos.y - (300.0 + 200.0 * 0.5f64.sin())).abs() < 1e-9);
    }

    #[test]
    fn test_flying_tick_advances_arrow() {
        let mut round = Round::default();
        round.shoot();
        round.advance(0.1).unwrap();
        assert_eq!(round.phase(), RoundPhase::Flying);
        assert_eq!(round.flight_time(), 0.1);
        let expected = arrow_position(&round.config().launcher, round.aim().angle, 500.0, 0.1);
        assert_eq!(round.arrow().pos, expected);
        // Target keeps moving on the global clock while the arrow flies
        let expected = target_position(&round.config().target, round.global_time());
        assert_eq!(round.target().pos, expected);
    }

    #[test]
    fn test_hit_when_arrow_enters_box() {
        let mut round = lined_up_round(RangeConfig::default());
        let mut events = Vec::new();
        for _ in 0..60 {
            if let Some(event) = round.advance(DT).unwrap() {
                events.push(event);
            }
        }
        assert_eq!(events, vec![RoundEvent::Resolved(Outcome::Hit)]);
        assert_eq!(round.phase(), RoundPhase::Resolved(Outcome::Hit));
        assert_eq!(round.arrow().pos.x, 700.0);
        assert_eq!(round.flight_time(), 0.0);
        assert_eq!(round.cadence(), Cadence::Cooldown);
    }

    #[test]
    fn test_hit_wins_when_also_out_of_bounds() {
        let mut config = RangeConfig::default();
        config.playfield = Playfield {
            width: 699.0,
            height: 600.0,
        };
        let mut round = lined_up_round(config);
        let mut last = None;
        for _ in 0..60 {
            last = round.advance(DT).unwrap();
            if last.is_some() {
                break;
            }
        }
        assert_eq!(last, Some(RoundEvent::Resolved(Outcome::Hit)));
        assert_eq!(round.outcome(), Some(Outcome::Hit));
    }

    #[test]
    fn test_tunneling_is_a_miss() {
        // 15.625 px per tick steps from x=693.75 straight to x=709.375
        let mut round = Round::default();
        round.set_aim(90.0).unwrap();
        round.set_power(1000.0).unwrap();
        round.shoot();
        let mut outcome = None;
        for _ in 0..200 {
            if let Some(RoundEvent::Resolved(o)) = round.advance(DT).unwrap() {
                outcome = Some(o);
                break;
            }
        }
        assert_eq!(outcome, Some(Outcome::Miss));
    }

    #[test]
    fn test_cooldown_returns_to_idle() {
        let mut round = lined_up_round(RangeConfig::default());
        while round.phase() == RoundPhase::Flying {
            round.advance(DT).unwrap();
        }
        round.set_aim(120.0).unwrap_err();

        let mut ticks = 0;
        let mut rearmed = false;
        while ticks < 1000 {
            ticks += 1;
            if round.advance(0.017).unwrap() == Some(RoundEvent::Rearmed) {
                rearmed = true;
                break;
            }
            assert_eq!(round.phase(), RoundPhase::Cooldown);
            assert_eq!(round.outcome(), Some(Outcome::Hit));
            let expected = target_position(&round.config().target, round.global_time());
            assert_eq!(round.target().pos, expected);
        }
        assert!(rearmed);
        assert_eq!(ticks, 59);
        assert_eq!(round.phase(), RoundPhase::Idle);
        assert!(round.outcome().is_none());
        assert_eq!(round.cadence(), Cadence::Active);
        round.set_aim(120.0).unwrap();
    }

    #[test]
    fn test_single_cooldown_cadence_tick_rearms() {
        let mut round = lined_up_round(RangeConfig::default());
        while round.phase() == RoundPhase::Flying {
            round.advance(DT).unwrap();
        }
        let global = round.global_time();
        assert_eq!(round.advance(1.0).unwrap(), Some(RoundEvent::Rearmed));
        // Target motion carries on through the rearm
        assert_eq!(round.global_time(), global + 1.0);
        let expected = target_position(&round.config().target, global + 1.0);
        assert_eq!(round.target().pos, expected);
    }

    #[test]
    fn test_rearm_nocks_arrow() {
        let mut round = lined_up_round(RangeConfig::default());
        while round.phase() == RoundPhase::Flying {
            round.advance(DT).unwrap();
        }
        round.advance(1.0).unwrap();
        assert_eq!(round.arrow().pos, DVec2::new(150.0, 300.0));
    }

    #[test]
    fn test_invalid_dt_rejected() {
        let mut round = Round::default();
        for dt in [0.0, -0.017, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                round.advance(dt),
                Err(SimError::InvalidTimestep { .. })
            ));
        }
        assert_eq!(round.global_time(), 0.0);
    }

    #[test]
    fn test_reset_from_every_phase() {
        let mut round = lined_up_round(RangeConfig::default());
        round.reset();
        assert_eq!(round.phase(), RoundPhase::Idle);

        let mut round = lined_up_round(RangeConfig::default());
        round.advance(DT).unwrap();
        round.reset();
        assert_eq!(round.phase(), RoundPhase::Idle);
        assert_eq!(round.flight_time(), 0.0);
        assert_eq!(round.global_time(), 0.0);

        let mut round = lined_up_round(RangeConfig::default());
        while round.phase() == RoundPhase::Flying {
            round.advance(DT).unwrap();
        }
        round.reset();
        assert!(round.outcome().is_none());

        let mut round = lined_up_round(RangeConfig::default());
        while round.phase() == RoundPhase::Flying {
            round.advance(DT).unwrap();
        }
        round.advance(0.017).unwrap();
        assert_eq!(round.phase(), RoundPhase::Cooldown);
        round.reset();
        assert_eq!(round.phase(), RoundPhase::Idle);
        assert!(round.set_aim(45.0).is_ok());
    }

    #[test]
    fn test_tick_batches_commands() {
        let mut round = Round::default();
        let input = TickInput {
            aim_degrees: Some(90.0),
            power: Some(300.0),
            shoot: true,
            ..Default::default()
        };
        let events = tick(&mut round, &input, 0.017).unwrap();
        assert_eq!(events, vec![RoundEvent::Launched]);
        assert_eq!(round.phase(), RoundPhase::Flying);
        assert_eq!(round.aim().power, 300.0);
        assert_eq!(round.aim().angle, 0.0);
        assert_eq!(round.flight_time(), 0.017);
    }

    #[test]
    fn test_tick_drops_aim_while_locked() {
        let mut round = Round::default();
        round.shoot();
        let input = TickInput {
            aim_degrees: Some(10.0),
            ..Default::default()
        };
        assert!(tick(&mut round, &input, 0.017).unwrap().is_empty());
        assert_eq!(round.aim(), crate::sim::AimSettings::default());
    }

    #[test]
    fn test_tick_rejects_before_applying() {
        let mut round = Round::default();
        let input = TickInput {
            aim_degrees: Some(90.0),
            power: Some(5000.0),
            shoot: true,
            ..Default::default()
        };
        assert!(matches!(
            tick(&mut round, &input, 0.017),
            Err(SimError::PowerOutOfRange { .. })
        ));
        assert_eq!(round.phase(), RoundPhase::Idle);
        assert_eq!(round.aim(), crate::sim::AimSettings::default());
        assert_eq!(round.global_time(), 0.0);
    }

    #[test]
    fn test_determinism() {
        // Two rounds fed the same inputs produce identical bits
        let mut a = Round::default();
        let mut b = Round::default();
        let inputs = [
            TickInput {
                aim_degrees: Some(120.0),
                ..Default::default()
            },
            TickInput {
                shoot: true,
                ..Default::default()
            },
            TickInput::default(),
            TickInput::default(),
        ];
        for input in inputs.iter().cycle().take(200) {
            let ea = tick(&mut a, input, 0.017).unwrap();
            let eb = tick(&mut b, input, 0.017).unwrap();
            assert_eq!(ea, eb);
            assert_eq!(a.arrow().pos.x.to_bits(), b.arrow().pos.x.to_bits());
            assert_eq!(a.arrow().pos.y.to_bits(), b.arrow().pos.y.to_bits());
            assert_eq!(a.target().pos.y.to_bits(), b.target().pos.y.to_bits());
        }
    }
}
