//! Deterministic simulation module
//!
//! All round logic lives here. This module must be pure and deterministic:
//! - Time only advances through explicit deltas
//! - Positions are recomputed from elapsed time, never integrated
//! - No rendering, timer or platform dependencies

pub mod collision;
pub mod state;
pub mod target;
pub mod tick;
pub mod trajectory;

pub use collision::{Contact, classify, hits_target, out_of_bounds};
pub use state::{
    AimSettings, ArrowState, Outcome, Round, RoundEvent, RoundPhase, RoundSnapshot, TargetState,
};
pub use target::{target_position, target_y};
pub use tick::{TickInput, tick};
pub use trajectory::{
    arrow_heading, arrow_position, nocked_position, preview_path, time_to_reach_x,
};
