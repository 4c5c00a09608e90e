//! The player: a state machine driving an [`ActorController`].
//!
//! # Tick order
//!
//! Each [`Player::tick`] runs, in order:
//!
//! 1. **STATES**: change, maybe transition, then execute the current state
//! 2. **GRAVITY**: `vy -= gravity * dt`
//! 3. **MOVE**: clear the bounce flags, resolve `velocity * dt` against the
//!    world; a hard landing on a bouncy surface sets `bounce_up` for the
//!    next tick
//! 4. **SNAPSHOT**: copy the collision flags into the body for the next
//!    tick's transition checks
//!
//! Input edges (`jump_pressed`, `jump_released`) only live for the tick they
//! arrive in.
//!
//! # Transactions
//!
//! Like the simulation in a lockstep game, the player is double-buffered. A
//! tick runs on a scratch copy of the current frame and is committed by
//! swapping buffers only if the move succeeds. A failed tick leaves the
//! player and the presentation untouched, so it can be retried.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use ledge_core::config::PlayerConfig;
//! use ledge_core::input::InputSnapshot;
//! use ledge_core::player::{Player, StateKind};
//! use ledge_core::presentation::NullPresentation;
//! use ledge_world::tilemap;
//!
//! let world = tilemap::parse("..........\n##########", 1.0).unwrap();
//! let mut player = Player::new(PlayerConfig::default(), Vec2::new(5.0, 2.0)).unwrap();
//!
//! for _ in 0..10 {
//!     player.tick(&world, InputSnapshot::default(), 0.02, &mut NullPresentation).unwrap();
//! }
//! assert_eq!(player.state(), StateKind::Idle);
//! ```

mod body;
mod states;
mod timers;

pub use body::PlayerBody;
pub use states::{
    Bounce, Fall, Idle, Jump, ParseStateKindError, PlayerState, Run, SlopeSlide, StateContext, StateKind,
};
pub use timers::Countdown;

use glam::Vec2;
use ledge_world::{Hit, RayCaster, SurfaceTags};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::config::{ConfigError, JumpModel, PlayerConfig};
use crate::controller::{ActorController, Axis, CollisionInfo, HitListener, MoveError};
use crate::input::InputSnapshot;
use crate::presentation::Presentation;
use crate::state::{StateError, StateMachine};

/// Failure of a tick.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TickError {
    /// Tick duration must be finite and positive.
    #[error("tick duration must be finite and positive, got {0}")]
    InvalidDelta(f32),
    /// The move could not be resolved.
    #[error(transparent)]
    Move(#[from] MoveError),
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TickReport {
    /// Number of this tick, starting at 1
    pub tick: u64,
    /// State after the tick
    pub state: StateKind,
    /// Transition taken this tick
    pub transition: Option<(StateKind, StateKind)>,
    /// Velocity right after the state executed, before gravity
    pub velocity_after_execute: Vec2,
    /// Velocity at the end of the tick
    pub velocity: Vec2,
    /// Displacement applied by the controller
    pub applied_delta: Vec2,
    /// Collision flags from this tick's move
    pub collisions: CollisionInfo,
}

// =============================================================================
// Frame
// =============================================================================

/// Everything a tick mutates.
#[derive(Debug)]
struct Frame {
    controller: ActorController,
    body: PlayerBody,
    machine: StateMachine<PlayerState>,
}

impl Clone for Frame {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            body: self.body,
            machine: self.machine.clone(),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.controller.clone_from(&source.controller);
        self.body = source.body;
        self.machine.clone_from(&source.machine);
    }
}

// =============================================================================
// Cue buffering
// =============================================================================

/// A visual cue held back until its tick commits.
#[derive(Debug, Clone, Copy)]
enum Cue {
    Visual(StateKind),
    Hit(Axis, Hit),
}

#[derive(Debug, Default)]
struct CueBuffer {
    cues: Vec<Cue>,
}

impl CueBuffer {
    fn replay<P: Presentation + ?Sized>(self, presentation: &mut P) {
        for cue in self.cues {
            match cue {
                Cue::Visual(state) => presentation.set_visual_state(state),
                Cue::Hit(axis, hit) => presentation.on_surface_hit(axis, &hit),
            }
        }
    }
}

impl Presentation for CueBuffer {
    fn set_visual_state(&mut self, state: StateKind) {
        self.cues.push(Cue::Visual(state));
    }

    fn on_surface_hit(&mut self, axis: Axis, hit: &Hit) {
        self.cues.push(Cue::Hit(axis, *hit));
    }
}

/// Hit listener used during the player's move.
struct MoveListener<'a> {
    body: &'a mut PlayerBody,
    cues: &'a mut CueBuffer,
    bounce_min_impact_speed: f32,
}

impl HitListener for MoveListener<'_> {
    fn on_horizontal_hit(&mut self, hit: &Hit) {
        self.cues.on_surface_hit(Axis::Horizontal, hit);
    }

    fn on_vertical_hit(&mut self, hit: &Hit) {
        let hard_landing = hit.tags.contains(SurfaceTags::BOUNCY)
            && hit.normal.y > 0.0
            && self.body.velocity.y < -self.bounce_min_impact_speed;
        if hard_landing {
            self.body.bounce_up = true;
            debug!(collider = %hit.collider, vy = self.body.velocity.y, "bounce impact");
        }
        self.cues.on_surface_hit(Axis::Vertical, hit);
    }
}

// =============================================================================
// Player
// =============================================================================

/// A state-machine-driven platformer character.
#[derive(Debug, Clone)]
pub struct Player {
    config: PlayerConfig,
    jump: JumpModel,
    current: Frame,
    next: Frame,
    tick: u64,
}

impl Player {
    /// Create a player whose collider is centred on `spawn`, in the
    /// configured initial state.
    ///
    /// The initial state is not entered, so no visual cue is sent for it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration is invalid or the
    /// collider is too small.
    pub fn new(config: PlayerConfig, spawn: Vec2) -> Result<Self, ConfigError> {
        config.validate()?;
        let controller = ActorController::new(config.half_extents, spawn, config.controller)?;

        let slope_slide = config.slope_slide_enabled();
        let states = config
            .states
            .iter()
            .map(|kind| PlayerState::new(*kind, &config.tuning, slope_slide));
        let machine = StateMachine::with_states(states, config.initial_state)
            .map_err(|_| ConfigError::InitialStateMissing(config.initial_state))?;

        let frame = Frame {
            controller,
            body: PlayerBody::new(&config.movement),
            machine,
        };

        Ok(Self {
            jump: JumpModel::from(&config.movement),
            config,
            next: frame.clone(),
            current: frame,
            tick: 0,
        })
    }

    /// Advance one fixed step of `dt` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`TickError::InvalidDelta`] for a non-finite or non-positive
    /// `dt` and [`TickError::Move`] if the world query fails. Either way the
    /// player is unchanged and `presentation` receives nothing.
    pub fn tick<W, P>(
        &mut self,
        world: &W,
        input: InputSnapshot,
        dt: f32,
        presentation: &mut P,
    ) -> Result<TickReport, TickError>
    where
        W: RayCaster + ?Sized,
        P: Presentation + ?Sized,
    {
        if !(dt.is_finite() && dt > 0.0) {
            return Err(TickError::InvalidDelta(dt));
        }

        self.next.clone_from(&self.current);
        let frame = &mut self.next;
        let mut cues = CueBuffer::default();

        // STATES
        let transition = {
            let mut ctx = StateContext {
                body: &mut frame.body,
                input: &input,
                movement: &self.config.movement,
                jump: &self.jump,
                dt,
                presentation: &mut cues,
            };
            frame.machine.run(&mut ctx)
        };
        let velocity_after_execute = frame.body.velocity;

        // GRAVITY
        frame.body.velocity.y -= self.jump.gravity * dt;

        // MOVE
        frame.body.bounce_up = false;
        frame.body.late_bounce_jump = false;
        let delta = frame.body.velocity * dt;
        let mut listener = MoveListener {
            body: &mut frame.body,
            cues: &mut cues,
            bounce_min_impact_speed: self.config.tuning.bounce_min_impact_speed,
        };
        let applied_delta = frame.controller.move_by(world, delta, &mut listener)?;

        // SNAPSHOT
        frame.body.contacts = *frame.controller.collisions();

        std::mem::swap(&mut self.current, &mut self.next);
        self.tick += 1;

        let state = self.state();
        if let Some((from, to)) = transition {
            debug!(tick = self.tick, from = %from, to = %to, "player state changed");
        }
        cues.replay(presentation);

        Ok(TickReport {
            tick: self.tick,
            state,
            transition,
            velocity_after_execute,
            velocity: self.current.body.velocity,
            applied_delta,
            collisions: self.current.body.contacts,
        })
    }

    /// Switch state immediately, running exit and enter hooks.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::UnknownState`] if the state is not configured.
    pub fn force_state<P: Presentation>(&mut self, kind: StateKind, presentation: &mut P) -> Result<(), StateError> {
        let input = InputSnapshot::default();
        let frame = &mut self.current;
        let mut ctx = StateContext {
            body: &mut frame.body,
            input: &input,
            movement: &self.config.movement,
            jump: &self.jump,
            dt: 0.0,
            presentation,
        };
        frame.machine.force(kind, &mut ctx)
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> StateKind {
        // The machine is built with a valid initial state and only ever
        // switches to known states.
        self.current.machine.current().unwrap_or(self.config.initial_state)
    }

    /// Centre of the collider.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.current.controller.position()
    }

    /// Current velocity.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.current.body.velocity
    }

    /// Movement state.
    #[must_use]
    pub fn body(&self) -> &PlayerBody {
        &self.current.body
    }

    /// Collision flags from the last move.
    #[must_use]
    pub fn collisions(&self) -> &CollisionInfo {
        self.current.controller.collisions()
    }

    /// The current state's data.
    #[must_use]
    pub fn current_state(&self) -> Option<&PlayerState> {
        self.current.machine.get(self.state())
    }

    /// Ticks committed so far.
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.tick
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Derived jump model.
    #[must_use]
    pub fn jump_model(&self) -> &JumpModel {
        &self.jump
    }
}
