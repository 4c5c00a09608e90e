//! Raycast collision resolution for a box-shaped kinematic actor.
//!
//! [`ActorController::move_by`] takes a requested displacement for one tick
//! and shrinks or redirects it so the actor's box never enters solid
//! geometry. Walkable slopes are climbed and descended smoothly, slopes
//! steeper than the walkable limit are slid down, and every surface touched is
//! reported to a [`HitListener`] once the move has been committed.
//!
//! # Pipeline
//!
//! Each call runs, in order:
//!
//! 1. **Origins**: corners of the collider box shrunk by the skin width
//! 2. **Reset**: clear [`CollisionInfo`], keeping the previous slope angle
//! 3. **Slopes** (moving down only): slide down max slopes, else snap onto a
//!    descending slope
//! 4. **Horizontal pass**: a fan of rays along the direction of motion
//! 5. **Vertical pass**: a fan of rays offset by the resolved horizontal move
//! 6. **Steeper-slope probe** (ascending only)
//! 7. **Commit**: translate and publish the collision flags
//! 8. **Dispatch**: nearest hits per axis, horizontal first
//!
//! A failed query aborts the move before step 7: position, collision flags and
//! listeners are untouched.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use ledge_core::config::ControllerConfig;
//! use ledge_core::controller::ActorController;
//! use ledge_world::{Aabb, LayerMask, World};
//!
//! let mut world = World::new();
//! world.add_box(Aabb::new(Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0)), LayerMask::SOLID);
//!
//! let mut actor = ActorController::new(Vec2::new(0.5, 1.0), Vec2::new(0.0, 1.0), ControllerConfig::default()).unwrap();
//! let applied = actor.move_by(&world, Vec2::new(0.0, -0.5), &mut ()).unwrap();
//!
//! assert!(actor.collisions().below);
//! assert!(applied.y.abs() < 1e-4);
//! ```

mod collision;
mod hits;
mod slope;

pub use collision::CollisionInfo;
pub use hits::{Axis, HitSet};

use glam::Vec2;
use ledge_world::{Aabb, CastError, Hit, LayerMask, Ray, RayCaster};
use thiserror::Error;
use tracing::trace;

use crate::config::{ConfigError, ControllerConfig};

/// Failure of a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The collision query port could not answer.
    #[error("collision query failed: {0}")]
    Query(#[from] CastError),
}

/// Receiver of hits dispatched after a move is committed.
///
/// Only hits tied for the nearest distance on each axis are dispatched.
pub trait HitListener {
    /// A nearest hit found by a horizontal ray.
    fn on_horizontal_hit(&mut self, _hit: &Hit) {}

    /// A nearest hit found by a vertical or slope probe.
    fn on_vertical_hit(&mut self, _hit: &Hit) {}
}

impl HitListener for () {}

/// Corners of the skin-shrunk collider box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayOrigins {
    /// Top-left corner
    pub top_left: Vec2,
    /// Top-right corner
    pub top_right: Vec2,
    /// Bottom-left corner
    pub bottom_left: Vec2,
    /// Bottom-right corner
    pub bottom_right: Vec2,
}

impl RayOrigins {
    fn from_bounds(bounds: Aabb) -> Self {
        Self {
            top_left: Vec2::new(bounds.min.x, bounds.max.y),
            top_right: bounds.max,
            bottom_left: bounds.min,
            bottom_right: Vec2::new(bounds.max.x, bounds.min.y),
        }
    }
}

/// Ray counts and gaps, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaySpacing {
    /// Rays cast left/right, stacked bottom to top
    pub horizontal_count: u32,
    /// Rays cast up/down, spread left to right
    pub vertical_count: u32,
    /// Gap between horizontal rays
    pub horizontal_spacing: f32,
    /// Gap between vertical rays
    pub vertical_spacing: f32,
}

impl RaySpacing {
    /// Spread rays over `bounds` no further apart than `max_gap`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::DegenerateCollider`] if either axis gets fewer
    /// than two rays.
    pub fn new(bounds: Aabb, max_gap: f32) -> Result<Self, ConfigError> {
        let size = bounds.size();
        let horizontal_count = ray_count(size.y, max_gap, "horizontal")?;
        let vertical_count = ray_count(size.x, max_gap, "vertical")?;

        #[allow(clippy::cast_precision_loss)]
        let spacing = Self {
            horizontal_count,
            vertical_count,
            horizontal_spacing: size.y / (horizontal_count - 1) as f32,
            vertical_spacing: size.x / (vertical_count - 1) as f32,
        };
        Ok(spacing)
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ray_count(extent: f32, max_gap: f32, axis: &'static str) -> Result<u32, ConfigError> {
    let count = (extent / max_gap).ceil();
    if count.is_finite() && count >= 2.0 {
        Ok(count as u32)
    } else {
        let rays = if count.is_finite() { count.max(0.0) as u32 } else { 0 };
        Err(ConfigError::DegenerateCollider { axis, rays })
    }
}

/// Sign with zero treated as positive.
pub(crate) fn direction(value: f32) -> f32 {
    if value < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Angle in degrees between `normal` and straight up.
pub(crate) fn surface_angle(normal: Vec2) -> f32 {
    let len = normal.length();
    if len <= f32::EPSILON {
        return 0.0;
    }
    (normal.y / len).clamp(-1.0, 1.0).acos().to_degrees()
}

// =============================================================================
// ActorController
// =============================================================================

/// A box-shaped kinematic actor that resolves its moves against a
/// [`RayCaster`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActorController {
    position: Vec2,
    half_extents: Vec2,
    config: ControllerConfig,
    spacing: RaySpacing,
    collisions: CollisionInfo,
}

impl ActorController {
    /// Create an actor whose box is centred on `position`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` is invalid or the box is too
    /// small for two rays per axis after the skin is removed.
    pub fn new(half_extents: Vec2, position: Vec2, config: ControllerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let bounds = Aabb::from_center_half_extents(position, half_extents).shrink(config.skin_width);
        let spacing = RaySpacing::new(bounds, config.max_distance_between_rays)?;
        Ok(Self {
            position,
            half_extents,
            config,
            spacing,
            collisions: CollisionInfo::default(),
        })
    }

    /// Centre of the collider box.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Teleport without collision checks.
    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    /// Half size of the collider box.
    #[must_use]
    pub fn half_extents(&self) -> Vec2 {
        self.half_extents
    }

    /// Full collider box.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        Aabb::from_center_half_extents(self.position, self.half_extents)
    }

    /// Ray layout.
    #[must_use]
    pub fn spacing(&self) -> RaySpacing {
        self.spacing
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// Collision flags from the last committed move.
    #[must_use]
    pub fn collisions(&self) -> &CollisionInfo {
        &self.collisions
    }

    /// Corners rays are cast from at the current position.
    #[must_use]
    pub fn ray_origins(&self) -> RayOrigins {
        RayOrigins::from_bounds(self.bounds().shrink(self.config.skin_width))
    }

    /// Resolve `delta` against `world`, move, and report hits to `listener`.
    ///
    /// Returns the displacement actually applied.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::Query`] if any ray query fails. The actor is then
    /// left exactly as it was and no hit is dispatched.
    pub fn move_by<W, L>(&mut self, world: &W, delta: Vec2, listener: &mut L) -> Result<Vec2, MoveError>
    where
        W: RayCaster + ?Sized,
        L: HitListener + ?Sized,
    {
        let mut info = self.collisions;
        info.reset();

        let mut pass = MovePass {
            world,
            config: &self.config,
            spacing: &self.spacing,
            origins: self.ray_origins(),
            info,
            horizontal: HitSet::new(),
            vertical: HitSet::new(),
        };
        let applied = pass.resolve(delta)?;

        let MovePass {
            info,
            horizontal,
            vertical,
            ..
        } = pass;

        self.position += applied;
        self.collisions = info;

        trace!(
            requested = ?delta,
            applied = ?applied,
            above = info.above,
            below = info.below,
            left = info.left,
            right = info.right,
            slope_angle = info.slope_angle,
            "resolved move"
        );

        for hit in horizontal.nearest() {
            listener.on_horizontal_hit(&hit);
        }
        for hit in vertical.nearest() {
            listener.on_vertical_hit(&hit);
        }

        Ok(applied)
    }
}

// =============================================================================
// Move pass
// =============================================================================

/// Working state for a single move. Nothing here outlives the call.
struct MovePass<'a, W: ?Sized> {
    world: &'a W,
    config: &'a ControllerConfig,
    spacing: &'a RaySpacing,
    origins: RayOrigins,
    info: CollisionInfo,
    horizontal: HitSet,
    vertical: HitSet,
}

impl<W: RayCaster + ?Sized> MovePass<'_, W> {
    fn resolve(&mut self, mut delta: Vec2) -> Result<Vec2, CastError> {
        if delta.y < 0.0 {
            self.slide_max_slope(&mut delta)?;
            if !self.info.max_slope && delta.x != 0.0 {
                self.descend_slope(&mut delta)?;
            }
        }

        if delta.x != 0.0 {
            self.horizontal_collisions(&mut delta)?;
        }

        if delta.y != 0.0 {
            self.vertical_collisions(&mut delta)?;
        }

        if self.info.ascending_slope {
            self.adjust_steeper_slope(&mut delta)?;
        }

        Ok(delta)
    }

    /// Cast against the solid layers only.
    fn cast_solid(&self, origin: Vec2, dir: Vec2, length: f32) -> Result<Option<Hit>, CastError> {
        self.world.cast(&Ray::new(origin, dir), length, self.config.collision_mask)
    }

    /// Cast against solid and passthrough layers.
    ///
    /// Triggers in front of the obstruction are recorded on `axis`; the
    /// returned hit is the nearest blocking one, if any.
    fn cast_blocking(&mut self, origin: Vec2, dir: Vec2, length: f32, axis: Axis) -> Result<Option<Hit>, CastError> {
        let ray = Ray::new(origin, dir);
        let mask: LayerMask = self.config.collision_mask | self.config.passthrough_mask;
        let Some(first) = self.world.cast(&ray, length, mask)? else {
            return Ok(None);
        };
        if !first.is_trigger {
            return Ok(Some(first));
        }

        if first.distance > 0.0 {
            self.record(axis, first);
        }
        let solid = self.world.cast(&ray, length, self.config.collision_mask)?;
        Ok(solid.filter(|hit| !hit.is_trigger))
    }

    fn record(&mut self, axis: Axis, hit: Hit) {
        match axis {
            Axis::Horizontal => self.horizontal.push(hit),
            Axis::Vertical => self.vertical.push(hit),
        }
    }

    fn horizontal_collisions(&mut self, delta: &mut Vec2) -> Result<(), CastError> {
        let dir_x = direction(delta.x);
        let mut ray_length = delta.x.abs() + self.config.skin_width;
        let mut origin = if dir_x < 0.0 {
            self.origins.bottom_left
        } else {
            self.origins.bottom_right
        };

        for i in 0..self.spacing.horizontal_count {
            let hit = self.cast_blocking(origin, Vec2::X * dir_x, ray_length, Axis::Horizontal)?;
            origin += Vec2::Y * self.spacing.horizontal_spacing;

            let Some(hit) = hit else { continue };
            // Already overlapping; the vertical pass or a later move resolves it.
            if hit.distance == 0.0 {
                continue;
            }
            self.record(Axis::Horizontal, hit);

            let angle = surface_angle(hit.normal);

            if i == 0 && angle <= self.config.max_slope_angle {
                self.info.descending_slope = false;
                let to_slope = hit.distance - self.config.skin_width;
                delta.x -= to_slope * dir_x;
                self.ascend_slope(delta, angle);
                delta.x += to_slope * dir_x;
            }

            if !self.info.ascending_slope || angle > self.config.max_slope_angle {
                delta.x = (hit.distance - self.config.skin_width) * dir_x;
                ray_length = hit.distance;

                if self.info.ascending_slope {
                    delta.y = self.info.slope_angle.to_radians().tan() * delta.x.abs();
                }

                if dir_x < 0.0 {
                    self.info.left = true;
                } else {
                    self.info.right = true;
                }
            }
        }
        Ok(())
    }

    fn vertical_collisions(&mut self, delta: &mut Vec2) -> Result<(), CastError> {
        let dir_y = direction(delta.y);
        let mut ray_length = delta.y.abs() + self.config.skin_width;
        let corner = if dir_y < 0.0 {
            self.origins.bottom_left
        } else {
            self.origins.top_left
        };
        let mut origin = corner + Vec2::X * delta.x;

        for _ in 0..self.spacing.vertical_count {
            let hit = self.cast_blocking(origin, Vec2::Y * dir_y, ray_length, Axis::Vertical)?;
            origin += Vec2::X * self.spacing.vertical_spacing;

            let Some(hit) = hit else { continue };
            if hit.distance == 0.0 {
                continue;
            }
            self.record(Axis::Vertical, hit);

            delta.y = (hit.distance - self.config.skin_width) * dir_y;
            ray_length = hit.distance;

            if self.info.ascending_slope {
                delta.x = delta.y / self.info.slope_angle.to_radians().tan();
            }

            if dir_y < 0.0 {
                self.info.below = true;
            } else {
                self.info.above = true;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledge_world::{Collider, Shape, SurfaceTags, World};

    const HALF: Vec2 = Vec2::new(0.5, 1.0);
    const SKIN: f32 = 0.02;

    fn floor_world() -> World {
        let mut world = World::new();
        world.add_box(Aabb::new(Vec2::new(-50.0, -1.0), Vec2::new(50.0, 0.0)), LayerMask::SOLID);
        world
    }

    /// Actor resting `gap` above y = 0.
    fn actor_above_floor(gap: f32) -> ActorController {
        ActorController::new(HALF, Vec2::new(0.0, HALF.y + gap), ControllerConfig::default()).unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        horizontal: Vec<Hit>,
        vertical: Vec<Hit>,
    }

    impl HitListener for Recorder {
        fn on_horizontal_hit(&mut self, hit: &Hit) {
            self.horizontal.push(*hit);
        }

        fn on_vertical_hit(&mut self, hit: &Hit) {
            self.vertical.push(*hit);
        }
    }

    struct FailingCaster;

    impl RayCaster for FailingCaster {
        fn cast(&self, _ray: &Ray, _max_distance: f32, _mask: LayerMask) -> Result<Option<Hit>, CastError> {
            Err(CastError::Backend("offline".to_string()))
        }
    }

    mod construction_tests {
        use super::*;

        #[test]
        fn spacing_from_default_box() {
            let actor = actor_above_floor(0.0);
            let spacing = actor.spacing();
            // 1.96 / 0.25 -> 8 rays, 0.96 / 0.25 -> 4 rays
            assert_eq!(spacing.horizontal_count, 8);
            assert_eq!(spacing.vertical_count, 4);
            assert!((spacing.horizontal_spacing - 1.96 / 7.0).abs() < 1e-6);
            assert!((spacing.vertical_spacing - 0.96 / 3.0).abs() < 1e-6);
        }

        #[test]
        fn rejects_degenerate_collider() {
            let result = ActorController::new(Vec2::new(0.1, 1.0), Vec2::ZERO, ControllerConfig::default());
            assert!(matches!(
                result,
                Err(ConfigError::DegenerateCollider { axis: "vertical", rays: 1 })
            ));
        }

        #[test]
        fn rejects_invalid_config() {
            let config = ControllerConfig {
                skin_width: 0.0,
                ..ControllerConfig::default()
            };
            assert!(ActorController::new(HALF, Vec2::ZERO, config).is_err());
        }

        #[test]
        fn ray_origins_are_shrunk_corners() {
            let actor = actor_above_floor(0.0);
            let origins = actor.ray_origins();
            assert!((origins.bottom_left - Vec2::new(-0.48, SKIN)).length() < 1e-6);
            assert!((origins.top_right - Vec2::new(0.48, 2.0 - SKIN)).length() < 1e-6);
        }
    }

    mod flat_tests {
        use super::*;

        #[test]
        fn zero_move_in_empty_world_is_identity() {
            let world = World::new();
            let mut actor = actor_above_floor(3.0);
            let before = actor.position();
            let applied = actor.move_by(&world, Vec2::ZERO, &mut ()).unwrap();
            assert_eq!(applied, Vec2::ZERO);
            assert_eq!(actor.position(), before);
            assert!(!actor.collisions().any());
        }

        #[test]
        fn free_fall_is_unobstructed() {
            let world = floor_world();
            let mut actor = actor_above_floor(3.0);
            let applied = actor.move_by(&world, Vec2::new(0.1, -0.5), &mut ()).unwrap();
            assert_eq!(applied, Vec2::new(0.1, -0.5));
            assert!(!actor.collisions().below);
        }

        #[test]
        fn landing_stops_at_surface() {
            let world = floor_world();
            let mut actor = actor_above_floor(0.3);
            let mut recorder = Recorder::default();
            let applied = actor.move_by(&world, Vec2::new(0.0, -1.0), &mut recorder).unwrap();

            assert!((applied.y + 0.3).abs() < 1e-5);
            assert!((actor.bounds().min.y).abs() < 1e-5);
            assert!(actor.collisions().below);
            // Every vertical ray hits the floor at the same distance.
            assert_eq!(recorder.vertical.len(), 1);
            assert!(recorder.horizontal.is_empty());
        }

        #[test]
        fn below_iff_floor_within_reach() {
            let world = floor_world();

            let mut near = actor_above_floor(0.05);
            near.move_by(&world, Vec2::new(0.0, -0.1), &mut ()).unwrap();
            assert!(near.collisions().below);

            let mut far = actor_above_floor(0.2);
            far.move_by(&world, Vec2::new(0.0, -0.05), &mut ()).unwrap();
            assert!(!far.collisions().below);
        }

        #[test]
        fn wall_blocks_horizontal_motion() {
            let mut world = floor_world();
            world.add_box(Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 5.0)), LayerMask::SOLID);
            let mut actor = actor_above_floor(0.0);
            let mut recorder = Recorder::default();

            let applied = actor.move_by(&world, Vec2::new(1.0, 0.0), &mut recorder).unwrap();

            assert!((applied.x - 0.5).abs() < 1e-5);
            assert!(actor.collisions().right);
            assert!(!actor.collisions().left);
            assert_eq!(recorder.horizontal.len(), 1);
        }

        #[test]
        fn ceiling_sets_above() {
            let mut world = World::new();
            world.add_box(Aabb::new(Vec2::new(-5.0, 2.5), Vec2::new(5.0, 3.0)), LayerMask::SOLID);
            let mut actor = actor_above_floor(0.0);
            let applied = actor.move_by(&world, Vec2::new(0.0, 1.0), &mut ()).unwrap();
            assert!((applied.y - 0.5).abs() < 1e-5);
            assert!(actor.collisions().above);
        }

        #[test]
        fn vertical_move_skips_horizontal_pass() {
            let mut world = floor_world();
            // Flush against the actor's left side.
            world.add_box(Aabb::new(Vec2::new(-2.0, 0.0), Vec2::new(-0.5, 5.0)), LayerMask::SOLID);
            let mut actor = actor_above_floor(0.05);
            let mut recorder = Recorder::default();

            let applied = actor.move_by(&world, Vec2::new(0.0, -0.1), &mut recorder).unwrap();

            assert_eq!(applied.x, 0.0);
            assert!((applied.y + 0.05).abs() < 1e-5);
            let info = actor.collisions();
            assert!(!info.left);
            assert!(!info.right);
            assert!(info.below);
            assert!(recorder.horizontal.is_empty());
            assert_eq!(recorder.vertical.len(), 1);
            assert_eq!(recorder.vertical[0].normal, Vec2::Y);
        }

        #[test]
        fn horizontal_move_skips_vertical_pass() {
            let mut world = floor_world();
            // Flush against the actor's top.
            world.add_box(Aabb::new(Vec2::new(-5.0, 2.0), Vec2::new(5.0, 3.0)), LayerMask::SOLID);
            let mut actor = actor_above_floor(0.0);
            let mut recorder = Recorder::default();

            let applied = actor.move_by(&world, Vec2::new(0.3, 0.0), &mut recorder).unwrap();

            assert_eq!(applied, Vec2::new(0.3, 0.0));
            let info = actor.collisions();
            assert!(!info.above);
            assert!(!info.below);
            assert!(!info.right);
            assert!(recorder.horizontal.is_empty());
            assert!(recorder.vertical.is_empty());
        }

        #[test]
        fn zero_distance_hits_are_ignored() {
            let mut world = World::new();
            // Box overlapping the actor's lower half.
            world.add_box(Aabb::new(Vec2::new(-5.0, -1.0), Vec2::new(5.0, 0.5)), LayerMask::SOLID);
            let mut actor = actor_above_floor(0.0);
            let mut recorder = Recorder::default();
            let applied = actor.move_by(&world, Vec2::new(0.0, -0.2), &mut recorder).unwrap();
            assert_eq!(applied, Vec2::new(0.0, -0.2));
            assert!(!actor.collisions().below);
            assert!(recorder.vertical.is_empty());
        }
    }

    mod trigger_tests {
        use super::*;

        #[test]
        fn trigger_reports_but_does_not_block() {
            let mut world = floor_world();
            let trigger = world.spawn(Collider::trigger(Shape::Box(Aabb::new(
                Vec2::new(0.7, 0.0),
                Vec2::new(0.9, 2.0),
            ))));
            let mut actor = actor_above_floor(0.0);
            let mut recorder = Recorder::default();

            let applied = actor.move_by(&world, Vec2::new(1.0, 0.0), &mut recorder).unwrap();

            assert_eq!(applied.x, 1.0);
            assert!(!actor.collisions().right);
            assert_eq!(recorder.horizontal.len(), 1);
            assert_eq!(recorder.horizontal[0].collider, trigger);
            assert!(recorder.horizontal[0].is_trigger);
        }

        #[test]
        fn wall_behind_trigger_still_blocks() {
            let mut world = floor_world();
            world.spawn(Collider::trigger(Shape::Box(Aabb::new(
                Vec2::new(0.6, 0.0),
                Vec2::new(0.7, 2.0),
            ))));
            world.add_box(Aabb::new(Vec2::new(1.0, 0.0), Vec2::new(2.0, 5.0)), LayerMask::SOLID);
            let mut actor = actor_above_floor(0.0);
            let mut recorder = Recorder::default();

            let applied = actor.move_by(&world, Vec2::new(1.0, 0.0), &mut recorder).unwrap();

            assert!((applied.x - 0.5).abs() < 1e-5);
            assert!(actor.collisions().right);
            // Only the nearest (the trigger) is dispatched.
            assert_eq!(recorder.horizontal.len(), 1);
            assert!(recorder.horizontal[0].is_trigger);
        }
    }

    mod dispatch_tests {
        use super::*;

        #[test]
        fn tied_hits_are_all_dispatched() {
            let mut world = World::new();
            let left = world.add_box(Aabb::new(Vec2::new(-5.0, -1.0), Vec2::new(0.0, 0.0)), LayerMask::SOLID);
            let right = world.add_box(Aabb::new(Vec2::new(0.0, -1.0), Vec2::new(5.0, 0.0)), LayerMask::SOLID);
            let mut actor = actor_above_floor(0.25);
            let mut recorder = Recorder::default();

            actor.move_by(&world, Vec2::new(0.0, -0.5), &mut recorder).unwrap();

            let ids: Vec<_> = recorder.vertical.iter().map(|h| h.collider).collect();
            assert_eq!(ids.len(), 2);
            assert!(ids.contains(&left));
            assert!(ids.contains(&right));
        }

        #[test]
        fn only_nearest_is_dispatched() {
            let mut world = World::new();
            world.add_box(Aabb::new(Vec2::new(-5.0, -1.0), Vec2::new(0.0, 0.0)), LayerMask::SOLID);
            let high = world.add_box(Aabb::new(Vec2::new(0.0, -1.0), Vec2::new(5.0, 0.1)), LayerMask::SOLID);
            let mut actor = actor_above_floor(0.25);
            let mut recorder = Recorder::default();

            actor.move_by(&world, Vec2::new(0.0, -0.5), &mut recorder).unwrap();

            assert_eq!(recorder.vertical.len(), 1);
            assert_eq!(recorder.vertical[0].collider, high);
        }

        #[test]
        fn tags_reach_listener() {
            let mut world = World::new();
            world.spawn(
                Collider::solid(Shape::Box(Aabb::new(Vec2::new(-5.0, -1.0), Vec2::new(5.0, 0.0))))
                    .with_tags(SurfaceTags::BOUNCY),
            );
            let mut actor = actor_above_floor(0.25);
            let mut recorder = Recorder::default();
            actor.move_by(&world, Vec2::new(0.0, -0.5), &mut recorder).unwrap();
            assert!(recorder.vertical[0].tags.contains(SurfaceTags::BOUNCY));
        }
    }

    mod failure_tests {
        use super::*;

        #[test]
        fn failed_query_leaves_actor_untouched() {
            let world = floor_world();
            let mut actor = actor_above_floor(0.0);
            actor.move_by(&world, Vec2::new(0.0, -0.1), &mut ()).unwrap();
            let before = actor.clone();

            let mut recorder = Recorder::default();
            let result = actor.move_by(&FailingCaster, Vec2::new(0.3, -0.1), &mut recorder);

            assert_eq!(result, Err(MoveError::Query(CastError::Backend("offline".to_string()))));
            assert_eq!(actor, before);
            assert!(recorder.horizontal.is_empty() && recorder.vertical.is_empty());
        }

        #[test]
        fn zero_move_queries_nothing() {
            let mut actor = actor_above_floor(0.0);
            let applied = actor.move_by(&FailingCaster, Vec2::ZERO, &mut ()).unwrap();
            assert_eq!(applied, Vec2::ZERO);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn zero_move_is_identity(x in -40.0f32..40.0, gap in 0.0f32..10.0) {
                let world = floor_world();
                let mut actor = ActorController::new(HALF, Vec2::new(x, HALF.y + gap), ControllerConfig::default()).unwrap();
                actor.move_by(&world, Vec2::new(0.0, -0.05), &mut ()).unwrap();
                let before = actor.position();

                let applied = actor.move_by(&world, Vec2::ZERO, &mut ()).unwrap();

                prop_assert_eq!(applied, Vec2::ZERO);
                prop_assert_eq!(actor.position(), before);
                prop_assert!(!actor.collisions().any());
            }

            #[test]
            fn never_ends_below_floor(x in -40.0f32..40.0, gap in 0.0f32..3.0, dx in -1.0f32..1.0, dy in -5.0f32..0.0) {
                let world = floor_world();
                let mut actor = ActorController::new(HALF, Vec2::new(x, HALF.y + gap), ControllerConfig::default()).unwrap();

                actor.move_by(&world, Vec2::new(dx, dy), &mut ()).unwrap();

                prop_assert!(actor.bounds().min.y > -1e-4);
            }
        }
    }
}
