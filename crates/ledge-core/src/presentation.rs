//! Presentation hooks.
//!
//! The simulation never renders. It reports visual cues through
//! [`Presentation`] so an embedder can tint sprites, start animations or play
//! sounds. Every method has a no-op default.

use ledge_world::Hit;
use serde::{Deserialize, Serialize};

use crate::controller::Axis;
use crate::player::StateKind;

/// Linear RGBA colour used for debug tints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tint {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
    /// Alpha
    pub a: f32,
}

impl Tint {
    /// Opaque colour.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// White
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    /// Blue
    pub const BLUE: Self = Self::rgb(0.0, 0.0, 1.0);
    /// Green
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    /// Red
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    /// Yellow (Unity's `Color.yellow`)
    pub const YELLOW: Self = Self::rgb(1.0, 0.92, 0.016);
    /// Grey
    pub const GREY: Self = Self::rgb(0.5, 0.5, 0.5);
    /// Magenta
    pub const MAGENTA: Self = Self::rgb(1.0, 0.0, 1.0);
}

/// Tint applied when a horizontal hit is reported.
pub const HORIZONTAL_HIT_TINT: Tint = Tint::MAGENTA;

/// Receiver of visual cues from the player.
pub trait Presentation {
    /// Called every time a state is entered.
    fn set_visual_state(&mut self, _state: StateKind) {}

    /// Called for every dispatched hit, horizontal axis first.
    fn on_surface_hit(&mut self, _axis: Axis, _hit: &Hit) {}
}

/// Presentation that ignores every cue.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullPresentation;

impl Presentation for NullPresentation {}

/// Records cues for later inspection. Useful in tests and replays.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingPresentation {
    /// States entered, in order
    pub entered: Vec<StateKind>,
    /// Hits reported, in dispatch order
    pub hits: Vec<(Axis, Hit)>,
    /// Current tint, following the last cue
    pub tint: Option<Tint>,
}

impl Presentation for RecordingPresentation {
    fn set_visual_state(&mut self, state: StateKind) {
        self.entered.push(state);
        self.tint = Some(state.tint());
    }

    fn on_surface_hit(&mut self, axis: Axis, hit: &Hit) {
        self.hits.push((axis, *hit));
        if axis == Axis::Horizontal {
            self.tint = Some(HORIZONTAL_HIT_TINT);
        }
    }
}
