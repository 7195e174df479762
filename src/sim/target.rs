//! Target motion
//!
//! The target slides up and down its column in simple harmonic motion driven
//! only by global time, so it keeps moving whatever the round is doing.

use glam::DVec2;

use crate::settings::TargetTrack;

impl TargetTrack {
    /// Midpoint of the vertical travel
    #[inline]
    pub fn center_y(&self) -> f64 {
        (self.y_min + self.y_max) / 2.0
    }

    /// Half the vertical travel
    #[inline]
    pub fn amplitude(&self) -> f64 {
        (self.y_max - self.y_min) / 2.0
    }

    /// Angular speed (rad/s).
    ///
    /// The travel range is divided as whole pixels, dropping the remainder:
    /// 400 px / 134 gives 2, not 2.985.
    #[inline]
    pub fn omega(&self) -> f64 {
        ((self.y_max - self.y_min) / self.omega_divisor).trunc()
    }

    /// Seconds for one full up-and-down cycle
    pub fn period(&self) -> f64 {
        std::f64::consts::TAU / self.omega()
    }
}

/// Target center y at `global_time`
pub fn target_y(track: &TargetTrack, global_time: f64) -> f64 {
    track.center_y() + track.amplitude() * (track.omega() * global_time).sin()
}

/// Target center at `global_time`
pub fn target_position(track: &TargetTrack, global_time: f64) -> DVec2 {
    DVec2::new(track.x, target_y(track, global_time))
}
