//! Configuration: flat numeric tunables supplied at construction.
//!
//! Everything here is plain data with serde support so an embedder can load
//! it from JSON (see [`PlayerConfig::from_json`]). Validation happens once, at
//! load/construction time; nothing downstream re-checks these values.
//!
//! # Example
//!
//! ```
//! use ledge_core::config::{JumpModel, PlayerConfig};
//!
//! let config = PlayerConfig::from_json(r#"{ "movement": { "max_jump_height": 3.0 } }"#).unwrap();
//! assert_eq!(config.movement.max_jump_height, 3.0);
//! // Unspecified fields keep their defaults
//! assert_eq!(config.movement.move_speed, 8.0);
//!
//! let model = JumpModel::from(&config.movement);
//! assert!(model.max_jump_velocity > model.min_jump_velocity);
//! ```

use glam::Vec2;
use ledge_world::LayerMask;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::player::StateKind;

/// Errors raised while validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A tunable that must be strictly positive is not.
    #[error("{field} must be finite and positive, got {value}")]
    NonPositive {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },
    /// A duration that must not be negative is.
    #[error("{field} must be finite and non-negative, got {value}")]
    Negative {
        /// Field name
        field: &'static str,
        /// Offending value
        value: f32,
    },
    /// Minimum jump height exceeds the maximum.
    #[error("min_jump_height {min} exceeds max_jump_height {max}")]
    JumpHeights {
        /// Configured minimum
        min: f32,
        /// Configured maximum
        max: f32,
    },
    /// Skin width outside `(0, 0.5]`.
    #[error("skin_width must be in (0, 0.5], got {0}")]
    SkinWidth(f32),
    /// Max slope angle outside `(0, 90)` degrees.
    #[error("max_slope_angle must be in (0, 90) degrees, got {0}")]
    SlopeAngle(f32),
    /// The collider is too small for two rays on an axis.
    #[error("collider yields {rays} {axis} ray(s); at least 2 are required")]
    DegenerateCollider {
        /// Axis the rays are cast along ("horizontal" or "vertical")
        axis: &'static str,
        /// Resolved ray count
        rays: u32,
    },
    /// No states configured.
    #[error("state set is empty")]
    EmptyStateSet,
    /// A state listed twice.
    #[error("state {0} listed more than once")]
    DuplicateState(StateKind),
    /// The initial state is not in the configured set.
    #[error("initial state {0} is not in the configured state set")]
    InitialStateMissing(StateKind),
    /// JSON could not be parsed (includes unknown state names).
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

// =============================================================================
// Movement
// =============================================================================

/// Player movement tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// Top horizontal speed (units/s)
    pub move_speed: f32,
    /// Apex height of a full jump
    pub max_jump_height: f32,
    /// Apex height of a jump released immediately
    pub min_jump_height: f32,
    /// Seconds from take-off to apex of a full jump
    pub time_to_jump_apex: f32,
    /// Seconds after leaving the ground during which a jump still succeeds
    pub coyote_time: f32,
    /// Seconds a jump press is remembered before landing
    pub jump_buffer: f32,
    /// Seconds after a bounce during which a jump becomes a late bounce jump
    pub bounce_to_jump_buffer: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            move_speed: 8.0,
            max_jump_height: 4.0,
            min_jump_height: 2.0,
            time_to_jump_apex: 0.4,
            coyote_time: 0.1,
            jump_buffer: 0.5,
            bounce_to_jump_buffer: 0.2,
        }
    }
}

impl MovementConfig {
    /// Validate the tunables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for non-positive speeds/heights/apex time,
    /// negative timer durations, or a minimum jump above the maximum.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("move_speed", self.move_speed)?;
        positive("max_jump_height", self.max_jump_height)?;
        positive("min_jump_height", self.min_jump_height)?;
        positive("time_to_jump_apex", self.time_to_jump_apex)?;
        non_negative("coyote_time", self.coyote_time)?;
        non_negative("jump_buffer", self.jump_buffer)?;
        non_negative("bounce_to_jump_buffer", self.bounce_to_jump_buffer)?;
        if self.min_jump_height > self.max_jump_height {
            return Err(ConfigError::JumpHeights {
                min: self.min_jump_height,
                max: self.max_jump_height,
            });
        }
        Ok(())
    }
}

/// Gravity and jump velocities derived from [`MovementConfig`].
///
/// `gravity = 2h / t²`, `max_jump_velocity = g·t`,
/// `min_jump_velocity = sqrt(2·g·h_min)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpModel {
    /// Downward acceleration magnitude
    pub gravity: f32,
    /// Take-off speed of a full jump
    pub max_jump_velocity: f32,
    /// Speed a released jump is cut down to
    pub min_jump_velocity: f32,
}

impl From<&MovementConfig> for JumpModel {
    fn from(config: &MovementConfig) -> Self {
        let gravity = 2.0 * config.max_jump_height / config.time_to_jump_apex.powi(2);
        Self {
            gravity,
            max_jump_velocity: gravity * config.time_to_jump_apex,
            min_jump_velocity: (2.0 * gravity * config.min_jump_height).sqrt(),
        }
    }
}

// =============================================================================
// Controller
// =============================================================================

/// Collision resolution tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Inward margin rays are cast from
    pub skin_width: f32,
    /// Upper bound on the gap between adjacent rays
    pub max_distance_between_rays: f32,
    /// Steepest walkable surface, in degrees from vertical-up
    pub max_slope_angle: f32,
    /// Layers that block motion
    pub collision_mask: LayerMask,
    /// Layers that report hits without blocking
    pub passthrough_mask: LayerMask,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            skin_width: 0.02,
            max_distance_between_rays: 0.25,
            max_slope_angle: 45.0,
            collision_mask: LayerMask::SOLID,
            passthrough_mask: LayerMask::PASSTHROUGH,
        }
    }
}

impl ControllerConfig {
    /// Validate the tunables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a skin width outside `(0, 0.5]`, a
    /// non-positive ray gap, or a slope limit outside `(0, 90)`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.skin_width > 0.0 && self.skin_width <= 0.5) {
            return Err(ConfigError::SkinWidth(self.skin_width));
        }
        positive("max_distance_between_rays", self.max_distance_between_rays)?;
        if !(self.max_slope_angle > 0.0 && self.max_slope_angle < 90.0) {
            return Err(ConfigError::SlopeAngle(self.max_slope_angle));
        }
        Ok(())
    }
}

// =============================================================================
// Per-state tuning
// =============================================================================

/// Per-state constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StateTuning {
    /// Run: smoothing time while input is held
    pub run_accel_time: f32,
    /// Run: smoothing time while coasting to a stop (no input)
    pub run_decel_time: f32,
    /// Run: below this |vx| with no input the actor idles
    pub idle_threshold: f32,
    /// Run: speed factor while walk is held
    pub walk_factor: f32,
    /// Jump: horizontal smoothing time
    pub jump_accel_time: f32,
    /// Fall: horizontal smoothing time
    pub fall_accel_time: f32,
    /// Bounce: horizontal smoothing time
    pub bounce_accel_time: f32,
    /// Bounce: fraction of impact speed kept
    pub bounce_restitution: f32,
    /// Landing speed a bouncy surface needs to bounce the actor
    pub bounce_min_impact_speed: f32,
    /// Jump velocity factor right after a bounce impact
    pub bounce_jump_multiplier: f32,
    /// Jump velocity factor for a jump taken from the Bounce state
    pub late_bounce_jump_multiplier: f32,
}

impl Default for StateTuning {
    fn default() -> Self {
        Self {
            run_accel_time: 0.015,
            run_decel_time: 0.04,
            idle_threshold: 0.2,
            walk_factor: 0.5,
            jump_accel_time: 0.3,
            fall_accel_time: 0.6,
            bounce_accel_time: 0.3,
            bounce_restitution: 0.5,
            bounce_min_impact_speed: 10.0,
            bounce_jump_multiplier: 1.25,
            late_bounce_jump_multiplier: 1.15,
        }
    }
}

impl StateTuning {
    /// Validate the tunables.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for negative smoothing times or thresholds
    /// and non-positive multipliers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("run_accel_time", self.run_accel_time)?;
        non_negative("run_decel_time", self.run_decel_time)?;
        non_negative("idle_threshold", self.idle_threshold)?;
        positive("walk_factor", self.walk_factor)?;
        non_negative("jump_accel_time", self.jump_accel_time)?;
        non_negative("fall_accel_time", self.fall_accel_time)?;
        non_negative("bounce_accel_time", self.bounce_accel_time)?;
        non_negative("bounce_restitution", self.bounce_restitution)?;
        non_negative("bounce_min_impact_speed", self.bounce_min_impact_speed)?;
        positive("bounce_jump_multiplier", self.bounce_jump_multiplier)?;
        positive("late_bounce_jump_multiplier", self.late_bounce_jump_multiplier)?;
        Ok(())
    }
}

// =============================================================================
// Player
// =============================================================================

/// Complete configuration for a [`Player`](crate::player::Player).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Movement tunables
    pub movement: MovementConfig,
    /// Collision tunables
    pub controller: ControllerConfig,
    /// Per-state constants
    pub tuning: StateTuning,
    /// Half size of the actor's box collider
    pub half_extents: Vec2,
    /// States the machine is built with. Listing `SlopeSlide` enables it.
    pub states: Vec<StateKind>,
    /// State the machine starts in
    pub initial_state: StateKind,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            movement: MovementConfig::default(),
            controller: ControllerConfig::default(),
            tuning: StateTuning::default(),
            half_extents: Vec2::new(0.5, 1.0),
            states: StateKind::DEFAULT_SET.to_vec(),
            initial_state: StateKind::Idle,
        }
    }
}

impl PlayerConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown state
    /// names, and any validation error from [`PlayerConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section and the state set.
    ///
    /// Collider ray counts are checked by
    /// [`ActorController::new`](crate::controller::ActorController::new),
    /// which needs the resolved box size.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.movement.validate()?;
        self.controller.validate()?;
        self.tuning.validate()?;
        positive("half_extents.x", self.half_extents.x)?;
        positive("half_extents.y", self.half_extents.y)?;

        if self.states.is_empty() {
            return Err(ConfigError::EmptyStateSet);
        }
        for (i, kind) in self.states.iter().enumerate() {
            if self.states[..i].contains(kind) {
                return Err(ConfigError::DuplicateState(*kind));
            }
        }
        if !self.states.contains(&self.initial_state) {
            return Err(ConfigError::InitialStateMissing(self.initial_state));
        }
        Ok(())
    }

    /// Whether the optional SlopeSlide state is enabled.
    #[must_use]
    pub fn slope_slide_enabled(&self) -> bool {
        self.states.contains(&StateKind::SlopeSlide)
    }
}
