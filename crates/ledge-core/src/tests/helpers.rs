//! Test helper functions for building worlds, players and input scripts.
//!
//! This module provides factory functions and setup utilities that make
//! writing scenario tests more ergonomic and consistent.

use glam::Vec2;
use ledge_world::{Aabb, LayerMask, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::PlayerConfig;
use crate::input::InputSnapshot;
use crate::player::{Player, StateKind, TickReport};
use crate::presentation::{NullPresentation, Presentation};

/// Fixed tick used by every scenario (50 Hz).
pub const DT: f32 = 0.02;

// =============================================================================
// Worlds
// =============================================================================

/// A wide floor whose top surface is `y = 0`.
pub fn flat_world() -> World {
    let mut world = World::new();
    world.add_box(Aabb::new(Vec2::new(-50.0, -1.0), Vec2::new(50.0, 0.0)), LayerMask::SOLID);
    world
}

/// A floor that ends at `x = edge`, with nothing beyond it.
///
/// # Arguments
///
/// * `edge` - World x coordinate of the ledge
///
/// # Returns
///
/// A world with a single floor box from `x = -50` to `edge`.
pub fn ledge_world(edge: f32) -> World {
    let mut world = World::new();
    world.add_box(Aabb::new(Vec2::new(-50.0, -1.0), Vec2::new(edge, 0.0)), LayerMask::SOLID);
    world
}

/// A floor leading into a ramp that rises to the right.
///
/// # Arguments
///
/// * `foot` - World x coordinate where the ramp starts
/// * `angle_degrees` - Ramp steepness
///
/// # Returns
///
/// A world with a floor ending at `foot` and a 20-unit-wide ramp after it.
pub fn ramp_world(foot: f32, angle_degrees: f32) -> World {
    let mut world = ledge_world(foot);
    world
        .add_ramp(Vec2::new(foot, 0.0), 20.0, angle_degrees, true)
        .expect("ramp angle in range");
    world
}

// =============================================================================
// Players
// =============================================================================

/// Spawns a default-config player standing on a `y = 0` floor at `x`.
pub fn spawn_on_floor(x: f32) -> Player {
    spawn_with(PlayerConfig::default(), Vec2::new(x, 1.0))
}

/// Spawns a player with an explicit config.
pub fn spawn_with(config: PlayerConfig, position: Vec2) -> Player {
    Player::new(config, position).expect("valid player config")
}

/// Ticks with no input until the player stands idle on the ground.
///
/// # Arguments
///
/// * `player` - The player to settle
/// * `world` - World to tick against
///
/// # Panics
///
/// Panics if the player is not idle after two seconds.
pub fn settle(player: &mut Player, world: &World) {
    for _ in 0..100 {
        step(player, world, InputSnapshot::default());
        if player.state() == StateKind::Idle && player.collisions().below {
            return;
        }
    }
    panic!("player did not settle, state {}", player.state());
}

/// Runs one tick, discarding visual cues.
pub fn step(player: &mut Player, world: &World, input: InputSnapshot) -> TickReport {
    player
        .tick(world, input, DT, &mut NullPresentation)
        .expect("tick succeeds")
}

/// Runs `count` ticks with the same input.
///
/// # Arguments
///
/// * `player` - The player to advance
/// * `world` - World to tick against
/// * `input` - Input held for every tick (edges repeat every tick)
/// * `count` - Number of ticks
/// * `presentation` - Cue sink
///
/// # Returns
///
/// One report per tick, in order.
pub fn run_ticks<P: Presentation>(
    player: &mut Player,
    world: &World,
    input: InputSnapshot,
    count: usize,
    presentation: &mut P,
) -> Vec<TickReport> {
    (0..count)
        .map(|_| player.tick(world, input, DT, presentation).expect("tick succeeds"))
        .collect()
}

/// Ticks with `input` until `predicate` holds for the player.
///
/// # Returns
///
/// The number of ticks taken, or `None` if `limit` ticks pass first.
pub fn ticks_until(
    player: &mut Player,
    world: &World,
    input: InputSnapshot,
    limit: usize,
    predicate: impl Fn(&Player) -> bool,
) -> Option<usize> {
    for taken in 1..=limit {
        step(player, world, input);
        if predicate(player) {
            return Some(taken);
        }
    }
    None
}

// =============================================================================
// Input scripts
// =============================================================================

/// Generates a seeded script of plausible player input.
///
/// Held directions persist for a few ticks and jump edges are sparse, so the
/// script exercises every state rather than jittering in place.
///
/// # Arguments
///
/// * `seed` - RNG seed
/// * `len` - Number of ticks
///
/// # Returns
///
/// One input snapshot per tick.
pub fn random_script(seed: u64, len: usize) -> Vec<InputSnapshot> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut axis = 0.0;
    let mut script = Vec::with_capacity(len);

    for _ in 0..len {
        if rng.gen_bool(0.1) {
            axis = [-1.0, 0.0, 1.0, rng.gen_range(-1.0..=1.0)][rng.gen_range(0..4)];
        }
        let mut input = InputSnapshot::horizontal(axis);
        if rng.gen_bool(0.05) {
            input = input.with_jump_pressed();
        } else if rng.gen_bool(0.05) {
            input = input.with_jump_released();
        }
        if rng.gen_bool(0.1) {
            input = input.walking();
        }
        script.push(input);
    }
    script
}
