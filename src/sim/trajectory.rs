//! Arrow flight under constant gravity
//!
//! Positions are recomputed from launch parameters and flight time on every
//! call, never integrated, so a replayed shot lands on the same pixels.
//! Screen space: y grows downward, angles are counter-clockwise from +x.

use glam::DVec2;

use crate::settings::Launcher;

/// Arrow tip position after `flight_time` seconds.
///
/// At `flight_time == 0` the arrow is nocked: the tip sits `arrow_length`
/// from the bow along the aim direction. Once in flight the tip follows the
/// ballistic path starting from the bow itself.
///
/// `angle` must already be in [-π/2, π/2]; nothing is clamped here.
pub fn arrow_position(launcher: &Launcher, angle: f64, power: f64, flight_time: f64) -> DVec2 {
    if flight_time == 0.0 {
        return nocked_position(launcher, angle);
    }

    let t = flight_time;
    let x = launcher.origin.x + power * angle.cos() * t;
    let y = launcher.origin.y - (power * angle.sin() * t - launcher.gravity * t * t / 2.0);
    DVec2::new(x, y)
}

/// Rest position of the arrow tip while aiming
#[inline]
pub fn nocked_position(launcher: &Launcher, angle: f64) -> DVec2 {
    launcher.origin + launcher.arrow_length * DVec2::new(angle.cos(), -angle.sin())
}

/// Direction the arrow points, counter-clockwise from horizontal.
///
/// Equals the aim angle while nocked; follows the velocity while flying.
pub fn arrow_heading(launcher: &Launcher, angle: f64, power: f64, flight_time: f64) -> f64 {
    if flight_time == 0.0 {
        return angle;
    }
    let vx = power * angle.cos();
    let vy_up = power * angle.sin() - launcher.gravity * flight_time;
    vy_up.atan2(vx)
}

/// Flight time at which the arrow's x reaches `x`, if it ever does.
pub fn time_to_reach_x(launcher: &Launcher, angle: f64, power: f64, x: f64) -> Option<f64> {
    let vx = power * angle.cos();
    let dx = x - launcher.origin.x;
    // Straight up/down (cos ≈ 6e-17) never meaningfully advances
    if vx <= 1e-9 || dx < 0.0 {
        return None;
    }
    Some(dx / vx)
}

/// Sample the flight path for an aiming guide.
///
/// Returns `samples` positions spaced `step` seconds apart, starting one step
/// after launch. Pure; round state is never touched.
pub fn preview_path(
    launcher: &Launcher,
    angle: f64,
    power: f64,
    step: f64,
    samples: usize,
) -> Vec<DVec2> {
    if step.is_nan() || step <= 0.0 {
        return Vec::new();
    }
    (1..=samples)
        .map(|i| arrow_position(launcher, angle, power, i as f64 * step))
        .collect()
}
