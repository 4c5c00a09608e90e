//! State hashing for determinism checks and replay verification.
//!
//! Floats are hashed by bit pattern, so two hashes match only if every value
//! is bit-for-bit identical. `DefaultHasher::new()` uses fixed keys, so the
//! hash is stable within one build of the crate.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use glam::Vec2;

use crate::controller::CollisionInfo;
use crate::player::{Countdown, Player};

fn hash_f32(value: f32, hasher: &mut impl Hasher) {
    value.to_bits().hash(hasher);
}

fn hash_vec2(value: Vec2, hasher: &mut impl Hasher) {
    hash_f32(value.x, hasher);
    hash_f32(value.y, hasher);
}

fn hash_countdown(timer: &Countdown, hasher: &mut impl Hasher) {
    hash_f32(timer.remaining(), hasher);
    hash_f32(timer.max(), hasher);
}

fn hash_collisions(info: &CollisionInfo, hasher: &mut impl Hasher) {
    [
        info.above,
        info.below,
        info.left,
        info.right,
        info.ascending_slope,
        info.descending_slope,
        info.max_slope,
    ]
    .hash(hasher);
    hash_f32(info.slope_angle, hasher);
    hash_vec2(info.slope_normal, hasher);
    hash_f32(info.prev_slope_angle, hasher);
}

/// Hash everything that evolves over a player's ticks.
///
/// Covers position, velocity, smoothing, timers, flags, collision info, the
/// current state with its frame counter, and the tick count.
#[must_use]
pub fn hash_player(player: &Player) -> u64 {
    let mut hasher = DefaultHasher::new();
    player.ticks().hash(&mut hasher);
    player.state().hash(&mut hasher);
    player
        .current_state()
        .map(crate::player::PlayerState::frames_active)
        .hash(&mut hasher);

    hash_vec2(player.position(), &mut hasher);

    let body = player.body();
    hash_vec2(body.velocity, &mut hasher);
    hash_f32(body.smoothing_x, &mut hasher);
    hash_countdown(&body.coyote, &mut hasher);
    hash_countdown(&body.jump_buffer, &mut hasher);
    hash_countdown(&body.bounce_grace, &mut hasher);
    body.bounce_up.hash(&mut hasher);
    body.late_bounce_jump.hash(&mut hasher);
    hash_collisions(&body.contacts, &mut hasher);

    hasher.finish()
}
