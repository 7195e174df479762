//! Collision and bounds checks
//!
//! Point-versus-box only. The arrow tip is sampled once per tick, so a fast
//! arrow can step over the target between ticks; that is accepted behavior.

use glam::DVec2;

use crate::settings::{Playfield, TargetTrack};

/// Result of evaluating one arrow position against the range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Still in flight
    None,
    /// Tip inside the target box
    Target,
    /// Tip past the right or bottom edge
    OutOfBounds,
}

/// Inclusive axis-aligned box test, `target` is the box center
#[inline]
pub fn hits_target(arrow: DVec2, target: DVec2, width: f64, height: f64) -> bool {
    let half_w = width / 2.0;
    let half_h = height / 2.0;
    arrow.x >= target.x - half_w
        && arrow.x <= target.x + half_w
        && arrow.y >= target.y - half_h
        && arrow.y <= target.y + half_h
}

/// Past the right or bottom edge. Leaving through the top or left is not a
/// miss: the arrow may still come back down.
#[inline]
pub fn out_of_bounds(arrow: DVec2, playfield: &Playfield) -> bool {
    arrow.x > playfield.width || arrow.y > playfield.height
}

/// Classify an arrow position. The target is checked first, so a tip that
/// is both on the target and past an edge counts as a hit.
pub fn classify(
    arrow: DVec2,
    target: DVec2,
    track: &TargetTrack,
    playfield: &Playfield,
) -> Contact {
    if hits_target(arrow, target, track.width, track.height) {
        Contact::Target
    } else if out_of_bounds(arrow, playfield) {
        Contact::OutOfBounds
    } else {
        Contact::None
    }
}
