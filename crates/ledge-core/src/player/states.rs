//! Player states.
//!
//! Each state is a variant of [`PlayerState`] carrying only its own tunables
//! and a frame counter. Transition rules are evaluated in a fixed order and
//! the last rule that matches wins, so later rules take priority.
//!
//! | State | Grounded | Leaves for |
//! |---|---|---|
//! | Idle | yes | Run, SlopeSlide, Fall, Jump |
//! | Run | yes | Idle, SlopeSlide, Fall, Jump |
//! | Jump | no | Fall |
//! | Fall | no | Idle, Run, Bounce, Jump, SlopeSlide |
//! | Bounce | no | Jump, Fall |
//! | SlopeSlide | yes | Run, Idle, Fall, Jump |

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::config::{JumpModel, MovementConfig, StateTuning};
use crate::input::InputSnapshot;
use crate::presentation::{Presentation, Tint};
use crate::state::{Keyed, State};

use super::body::PlayerBody;

// =============================================================================
// StateKind
// =============================================================================

/// Key of a player state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Standing still on the ground
    Idle,
    /// Moving along the ground
    Run,
    /// Rising after a jump
    Jump,
    /// Airborne and falling
    Fall,
    /// Rising after landing hard on a bouncy surface
    Bounce,
    /// Sliding down a slope too steep to walk
    SlopeSlide,
}

impl StateKind {
    /// Every state.
    pub const ALL: [StateKind; 6] = [
        Self::Idle,
        Self::Run,
        Self::Jump,
        Self::Fall,
        Self::Bounce,
        Self::SlopeSlide,
    ];

    /// States enabled by default (everything but SlopeSlide).
    pub const DEFAULT_SET: [StateKind; 5] = [Self::Idle, Self::Run, Self::Jump, Self::Fall, Self::Bounce];

    /// Name used in configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Run => "Run",
            Self::Jump => "Jump",
            Self::Fall => "Fall",
            Self::Bounce => "Bounce",
            Self::SlopeSlide => "SlopeSlide",
        }
    }

    /// Grounded states refresh coyote time; airborne states run it down.
    #[must_use]
    pub const fn is_grounded(self) -> bool {
        matches!(self, Self::Idle | Self::Run | Self::SlopeSlide)
    }

    /// Debug tint shown while in this state.
    #[must_use]
    pub const fn tint(self) -> Tint {
        match self {
            Self::Idle => Tint::WHITE,
            Self::Run => Tint::BLUE,
            Self::Jump => Tint::GREEN,
            Self::Fall => Tint::RED,
            Self::Bounce => Tint::YELLOW,
            Self::SlopeSlide => Tint::GREY,
        }
    }
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unknown state name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown state name {0:?}")]
pub struct ParseStateKindError(pub String);

impl FromStr for StateKind {
    type Err = ParseStateKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParseStateKindError(s.to_string()))
    }
}

// =============================================================================
// Context
// =============================================================================

/// Everything a player state may read or write during one tick.
pub struct StateContext<'a> {
    /// Mutable movement state
    pub body: &'a mut PlayerBody,
    /// This tick's input
    pub input: &'a InputSnapshot,
    /// Movement tunables
    pub movement: &'a MovementConfig,
    /// Derived gravity and jump speeds
    pub jump: &'a JumpModel,
    /// Tick duration in seconds
    pub dt: f32,
    /// Visual cue sink
    pub presentation: &'a mut dyn Presentation,
}

impl fmt::Debug for StateContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateContext")
            .field("body", &self.body)
            .field("input", &self.input)
            .field("dt", &self.dt)
            .finish_non_exhaustive()
    }
}

impl StateContext<'_> {
    fn input_x(&self) -> f32 {
        self.input.move_axis.x
    }

    fn has_buffered_jump(&self) -> bool {
        self.body.jump_buffer.is_active()
    }

    /// Smooth horizontal velocity toward full input speed.
    fn steer(&mut self, smooth_time: f32, speed_factor: f32) {
        let target = self.input_x() * self.movement.move_speed * speed_factor;
        self.body.steer_x(target, smooth_time, self.dt);
    }
}

// =============================================================================
// State variants
// =============================================================================

/// Standing still.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Idle {
    /// Ticks since entering
    pub frames_active: u32,
    /// Whether SlopeSlide is available
    pub slope_slide: bool,
}

/// Moving along the ground.
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    /// Ticks since entering
    pub frames_active: u32,
    /// Whether SlopeSlide is available
    pub slope_slide: bool,
    /// Smoothing time with input held
    pub accel_time: f32,
    /// Smoothing time with no input
    pub decel_time: f32,
    /// Below this speed with no input the actor idles
    pub idle_threshold: f32,
    /// Speed factor while walking
    pub walk_factor: f32,
}

/// Rising after a jump.
#[derive(Debug, Clone, PartialEq)]
pub struct Jump {
    /// Ticks since entering
    pub frames_active: u32,
    /// Horizontal smoothing time
    pub accel_time: f32,
    /// Take-off factor right after a bounce impact
    pub bounce_multiplier: f32,
    /// Take-off factor for a jump out of Bounce
    pub late_bounce_multiplier: f32,
}

/// Falling.
#[derive(Debug, Clone, PartialEq)]
pub struct Fall {
    /// Ticks since entering
    pub frames_active: u32,
    /// Whether SlopeSlide is available
    pub slope_slide: bool,
    /// Horizontal smoothing time
    pub accel_time: f32,
    /// Landing speed needed to bounce
    pub bounce_min_impact_speed: f32,
}

/// Rising after a bounce.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounce {
    /// Ticks since entering
    pub frames_active: u32,
    /// Horizontal smoothing time
    pub accel_time: f32,
    /// Fraction of impact speed kept
    pub restitution: f32,
}

/// Sliding down a max slope.
///
/// Lasts one tick: its `change` always leaves for Run, Idle or Fall, and
/// Idle, Run or Fall re-enter it on the next tick while the max slope holds.
/// The state therefore alternates tick by tick on a steep slope, and that
/// alternation is intended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlopeSlide {
    /// Ticks since entering
    pub frames_active: u32,
}

/// A player state.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerState {
    /// See [`Idle`]
    Idle(Idle),
    /// See [`Run`]
    Run(Run),
    /// See [`Jump`]
    Jump(Jump),
    /// See [`Fall`]
    Fall(Fall),
    /// See [`Bounce`]
    Bounce(Bounce),
    /// See [`SlopeSlide`]
    SlopeSlide(SlopeSlide),
}

impl PlayerState {
    /// Build the state for `kind` from the tuning tables.
    #[must_use]
    pub fn new(kind: StateKind, tuning: &StateTuning, slope_slide: bool) -> Self {
        match kind {
            StateKind::Idle => Self::Idle(Idle {
                frames_active: 0,
                slope_slide,
            }),
            StateKind::Run => Self::Run(Run {
                frames_active: 0,
                slope_slide,
                accel_time: tuning.run_accel_time,
                decel_time: tuning.run_decel_time,
                idle_threshold: tuning.idle_threshold,
                walk_factor: tuning.walk_factor,
            }),
            StateKind::Jump => Self::Jump(Jump {
                frames_active: 0,
                accel_time: tuning.jump_accel_time,
                bounce_multiplier: tuning.bounce_jump_multiplier,
                late_bounce_multiplier: tuning.late_bounce_jump_multiplier,
            }),
            StateKind::Fall => Self::Fall(Fall {
                frames_active: 0,
                slope_slide,
                accel_time: tuning.fall_accel_time,
                bounce_min_impact_speed: tuning.bounce_min_impact_speed,
            }),
            StateKind::Bounce => Self::Bounce(Bounce {
                frames_active: 0,
                accel_time: tuning.bounce_accel_time,
                restitution: tuning.bounce_restitution,
            }),
            StateKind::SlopeSlide => Self::SlopeSlide(SlopeSlide::default()),
        }
    }

    /// Ticks executed since this state was last entered.
    #[must_use]
    pub fn frames_active(&self) -> u32 {
        match self {
            Self::Idle(s) => s.frames_active,
            Self::Run(s) => s.frames_active,
            Self::Jump(s) => s.frames_active,
            Self::Fall(s) => s.frames_active,
            Self::Bounce(s) => s.frames_active,
            Self::SlopeSlide(s) => s.frames_active,
        }
    }

    fn frames_active_mut(&mut self) -> &mut u32 {
        match self {
            Self::Idle(s) => &mut s.frames_active,
            Self::Run(s) => &mut s.frames_active,
            Self::Jump(s) => &mut s.frames_active,
            Self::Fall(s) => &mut s.frames_active,
            Self::Bounce(s) => &mut s.frames_active,
            Self::SlopeSlide(s) => &mut s.frames_active,
        }
    }

    /// Shared per-tick bookkeeping run before each state's own logic.
    fn execute_base(&mut self, ctx: &mut StateContext<'_>) {
        *self.frames_active_mut() += 1;

        let body = &mut *ctx.body;
        if self.key().is_grounded() {
            body.coyote.refresh();
        } else {
            body.coyote.tick(ctx.dt);
        }
        body.jump_buffer.tick(ctx.dt);
        if ctx.input.jump_pressed {
            body.jump_buffer.refresh();
        }
    }
}

impl Keyed for PlayerState {
    type Key = StateKind;

    fn key(&self) -> StateKind {
        match self {
            Self::Idle(_) => StateKind::Idle,
            Self::Run(_) => StateKind::Run,
            Self::Jump(_) => StateKind::Jump,
            Self::Fall(_) => StateKind::Fall,
            Self::Bounce(_) => StateKind::Bounce,
            Self::SlopeSlide(_) => StateKind::SlopeSlide,
        }
    }
}

impl<'a> State<StateContext<'a>> for PlayerState {
    fn enter(&mut self, ctx: &mut StateContext<'a>) {
        *self.frames_active_mut() = 0;
        let body = &mut *ctx.body;

        match self {
            Self::Jump(jump) => {
                body.jump_buffer.clear();
                let factor = if body.late_bounce_jump {
                    jump.late_bounce_multiplier
                } else if body.bounce_up {
                    jump.bounce_multiplier
                } else {
                    1.0
                };
                body.velocity.y = ctx.jump.max_jump_velocity * factor;
            }
            Self::Bounce(bounce) => {
                body.jump_buffer.clear();
                body.velocity.y = -body.velocity.y * bounce.restitution;
                body.bounce_grace.refresh();
            }
            Self::SlopeSlide(_) => body.velocity.x = 0.0,
            Self::Idle(_) | Self::Run(_) | Self::Fall(_) => {}
        }

        ctx.presentation.set_visual_state(self.key());
    }

    #[allow(clippy::float_cmp)]
    fn execute(&mut self, ctx: &mut StateContext<'a>) {
        self.execute_base(ctx);

        match self {
            Self::Idle(_) => {
                ctx.body.velocity = Vec2::ZERO;
                ctx.body.smoothing_x = 0.0;
            }
            Self::Run(run) => {
                let smooth_time = if ctx.input_x() == 0.0 {
                    run.decel_time
                } else {
                    run.accel_time
                };
                let factor = if ctx.input.walk_held { run.walk_factor } else { 1.0 };
                ctx.steer(smooth_time, factor);
                ctx.body.velocity.y = 0.0;
            }
            Self::Jump(jump) => {
                if ctx.body.contacts.above {
                    ctx.body.velocity.y = 0.0;
                }
                if ctx.input.jump_released && ctx.body.velocity.y > ctx.jump.min_jump_velocity {
                    ctx.body.velocity.y = ctx.jump.min_jump_velocity;
                }
                ctx.steer(jump.accel_time, 1.0);
            }
            Self::Fall(fall) => {
                ctx.steer(fall.accel_time, 1.0);
                // Falls faster than it rises.
                ctx.body.velocity.y -= ctx.jump.gravity * ctx.dt;
            }
            Self::Bounce(bounce) => {
                if ctx.body.contacts.above {
                    ctx.body.velocity.y = 0.0;
                    ctx.body.bounce_grace.clear();
                }
                ctx.body.bounce_grace.tick(ctx.dt);
                ctx.steer(bounce.accel_time, 1.0);
            }
            Self::SlopeSlide(_) => {
                let steepness = 1.0 - ctx.body.contacts.slope_normal.y;
                ctx.body.velocity.y -= steepness * ctx.jump.gravity * ctx.dt;
            }
        }
    }

    #[allow(clippy::float_cmp)]
    fn change(&mut self, ctx: &mut StateContext<'a>) -> Option<StateKind> {
        let grounded = ctx.body.is_grounded();
        let max_slope = ctx.body.contacts.max_slope;
        let buffered = ctx.has_buffered_jump();
        let mut next = None;

        match self {
            Self::Idle(idle) => {
                if ctx.input_x() != 0.0 {
                    next = Some(StateKind::Run);
                }
                if idle.slope_slide && max_slope {
                    next = Some(StateKind::SlopeSlide);
                }
                if !grounded {
                    next = Some(StateKind::Fall);
                }
                if buffered {
                    next = Some(StateKind::Jump);
                }
            }
            Self::Run(run) => {
                if ctx.input_x() == 0.0 && ctx.body.velocity.x.abs() < run.idle_threshold {
                    next = Some(StateKind::Idle);
                }
                if run.slope_slide && max_slope {
                    next = Some(StateKind::SlopeSlide);
                }
                if !grounded {
                    next = Some(StateKind::Fall);
                }
                if buffered {
                    next = Some(StateKind::Jump);
                }
            }
            Self::Jump(_) => {
                if ctx.body.velocity.y < 0.0 {
                    next = Some(StateKind::Fall);
                }
            }
            Self::Fall(fall) => {
                if grounded {
                    next = Some(StateKind::Idle);
                    if ctx.body.velocity.x != 0.0 {
                        next = Some(StateKind::Run);
                    }
                    if ctx.body.bounce_up && ctx.body.velocity.y < -fall.bounce_min_impact_speed {
                        next = Some(StateKind::Bounce);
                    }
                    if buffered {
                        next = Some(StateKind::Jump);
                    }
                }
                if ctx.input.jump_pressed && ctx.body.coyote.is_active() {
                    next = Some(StateKind::Jump);
                }
                if fall.slope_slide && max_slope {
                    next = Some(StateKind::SlopeSlide);
                }
            }
            Self::Bounce(_) => {
                if ctx.body.bounce_grace.is_active() && buffered {
                    ctx.body.late_bounce_jump = true;
                    next = Some(StateKind::Jump);
                }
                if ctx.body.velocity.y < 0.0 {
                    next = Some(StateKind::Fall);
                }
            }
            Self::SlopeSlide(_) => {
                next = Some(if ctx.body.velocity.x != 0.0 {
                    StateKind::Run
                } else {
                    StateKind::Idle
                });
                if !grounded {
                    next = Some(StateKind::Fall);
                }
                if grounded && buffered {
                    next = Some(StateKind::Jump);
                }
            }
        }

        next
    }
}
