//! Mutable movement state shared by the player states.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::MovementConfig;
use crate::controller::CollisionInfo;
use crate::smoothing::smooth_damp;

use super::timers::Countdown;

/// Velocity, timers and flags the player states read and write.
///
/// `contacts` is a copy of the controller's collision flags from the previous
/// tick's move; states never see the controller itself.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerBody {
    /// Velocity in units per second
    pub velocity: Vec2,
    /// Spring velocity carried by horizontal smoothing
    pub smoothing_x: f32,
    /// Grace period for jumping after leaving the ground
    pub coyote: Countdown,
    /// Remembered jump press
    pub jump_buffer: Countdown,
    /// Window after a bounce in which a jump becomes a late bounce jump
    pub bounce_grace: Countdown,
    /// Landed hard on a bouncy surface during the last move
    pub bounce_up: bool,
    /// The jump about to start was taken out of a bounce
    pub late_bounce_jump: bool,
    /// Collision flags from the last move
    pub contacts: CollisionInfo,
}

impl PlayerBody {
    /// A body at rest with timers sized from `movement`.
    #[must_use]
    pub fn new(movement: &MovementConfig) -> Self {
        Self {
            velocity: Vec2::ZERO,
            smoothing_x: 0.0,
            coyote: Countdown::new(movement.coyote_time),
            jump_buffer: Countdown::new(movement.jump_buffer),
            bounce_grace: Countdown::new(movement.bounce_to_jump_buffer),
            bounce_up: false,
            late_bounce_jump: false,
            contacts: CollisionInfo::default(),
        }
    }

    /// Whether the last move ended on the ground.
    #[must_use]
    pub fn is_grounded(&self) -> bool {
        self.contacts.below
    }

    /// Smooth horizontal velocity toward `target_x`.
    pub fn steer_x(&mut self, target_x: f32, smooth_time: f32, dt: f32) {
        self.velocity.x = smooth_damp(self.velocity.x, target_x, &mut self.smoothing_x, smooth_time, dt);
    }
}
