//! # Ledge Core
//!
//! Deterministic fixed-tick 2D kinematic character controller.
//!
//! This crate resolves a box-shaped actor's motion against world geometry
//! with raycasts and drives it with a finite state machine tuned for
//! platformers: variable-height jumps, coyote time, jump buffering and
//! bounce pads.
//!
//! ## Architecture
//!
//! - **Controller** ([`controller`]): raycast collision resolution with slope
//!   ascent, descent and max-slope sliding
//! - **State machine** ([`state`]): generic keyed states with change, enter,
//!   execute and exit hooks
//! - **Player** ([`player`]): the Idle/Run/Jump/Fall/Bounce states, their
//!   timers and the per-tick driver
//!
//! World geometry is reached only through the
//! [`RayCaster`](ledge_world::RayCaster) port; `ledge_world::World` is the
//! bundled implementation.
//!
//! ## Usage
//!
//! ```
//! use glam::Vec2;
//! use ledge_core::{InputSnapshot, NullPresentation, Player, PlayerConfig, StateKind};
//! use ledge_world::tilemap;
//!
//! let world = tilemap::parse(
//!     r"
//! ..........
//! ##########
//! ",
//!     1.0,
//! )
//! .unwrap();
//! let mut player = Player::new(PlayerConfig::default(), Vec2::new(2.0, 2.0)).unwrap();
//!
//! for _ in 0..20 {
//!     player.tick(&world, InputSnapshot::horizontal(1.0), 1.0 / 50.0, &mut NullPresentation).unwrap();
//! }
//! assert_eq!(player.state(), StateKind::Run);
//! assert!(player.position().x > 2.0);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// Re-export the collision port crate
pub use ledge_world;

pub mod config;
pub mod controller;
pub mod hash;
pub mod input;
pub mod player;
pub mod presentation;
pub mod smoothing;
pub mod state;

pub use config::{ConfigError, ControllerConfig, JumpModel, MovementConfig, PlayerConfig, StateTuning};
pub use controller::{ActorController, Axis, CollisionInfo, HitListener, MoveError};
pub use input::InputSnapshot;
pub use player::{Player, PlayerState, StateKind, TickError, TickReport};
pub use presentation::{NullPresentation, Presentation, RecordingPresentation, Tint, HORIZONTAL_HIT_TINT};
pub use state::{Keyed, State, StateError, StateMachine};

#[cfg(test)]
mod tests;
