//! Per-move collision flags.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Contact and slope state produced by one
/// [`ActorController::move_by`](super::ActorController::move_by).
///
/// Only meaningful for the move that produced it; the next move resets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CollisionInfo {
    /// Blocked moving up
    pub above: bool,
    /// Standing on something (or blocked moving down)
    pub below: bool,
    /// Blocked moving left
    pub left: bool,
    /// Blocked moving right
    pub right: bool,
    /// Walking up a walkable slope
    pub ascending_slope: bool,
    /// Walking down a walkable slope
    pub descending_slope: bool,
    /// Sliding down a slope steeper than the walkable limit
    pub max_slope: bool,
    /// Angle of the current slope in degrees, 0 when flat
    pub slope_angle: f32,
    /// Normal of the max slope being slid down, zero otherwise
    pub slope_normal: Vec2,
    /// `slope_angle` from the previous move
    pub prev_slope_angle: f32,
}

impl CollisionInfo {
    /// Clear all flags, carrying the slope angle into `prev_slope_angle`.
    pub fn reset(&mut self) {
        *self = Self {
            prev_slope_angle: self.slope_angle,
            ..Self::default()
        };
    }

    /// Whether any side is blocked.
    #[must_use]
    pub fn any(&self) -> bool {
        self.above || self.below || self.left || self.right
    }
}
