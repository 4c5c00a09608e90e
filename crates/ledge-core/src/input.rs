//! Per-tick input.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Input sampled once per tick by the embedder.
///
/// `jump_pressed` and `jump_released` are edges: true only on the tick the
/// button went down or up. The player consumes them within that tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Movement axis; only `x` drives the actor
    pub move_axis: Vec2,
    /// Jump button went down this tick
    pub jump_pressed: bool,
    /// Jump button went up this tick
    pub jump_released: bool,
    /// Walk modifier held
    pub walk_held: bool,
}

impl InputSnapshot {
    /// Horizontal input only.
    #[must_use]
    pub fn horizontal(x: f32) -> Self {
        Self {
            move_axis: Vec2::new(x, 0.0),
            ..Self::default()
        }
    }

    /// Set the jump-press edge.
    #[must_use]
    pub fn with_jump_pressed(mut self) -> Self {
        self.jump_pressed = true;
        self
    }

    /// Set the jump-release edge.
    #[must_use]
    pub fn with_jump_released(mut self) -> Self {
        self.jump_released = true;
        self
    }

    /// Hold the walk modifier.
    #[must_use]
    pub fn walking(mut self) -> Self {
        self.walk_held = true;
        self
    }
}
