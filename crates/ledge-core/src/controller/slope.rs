//! Slope handling: ascent, descent, max-slope sliding and the steeper-slope
//! probe.
//!
//! Angles are degrees from straight up. A surface is walkable when its angle
//! is at most `max_slope_angle`.

use glam::Vec2;
use ledge_world::{CastError, RayCaster};

use super::{direction, surface_angle, Axis, MovePass};

impl<W: RayCaster + ?Sized> MovePass<'_, W> {
    /// Redirect a horizontal move up a walkable slope of `angle` degrees.
    ///
    /// Keeps the distance travelled along the surface equal to `|delta.x|`.
    /// Does nothing if the actor is already rising faster than the slope
    /// would lift it (e.g. mid-jump).
    pub(super) fn ascend_slope(&mut self, delta: &mut Vec2, angle: f32) {
        let dir_x = direction(delta.x);
        let distance = delta.x.abs();
        let (sin, cos) = angle.to_radians().sin_cos();

        let climb = sin * distance;
        if delta.y > climb {
            return;
        }

        delta.x = cos * distance * dir_x;
        delta.y = climb;

        self.info.slope_angle = angle;
        self.info.ascending_slope = true;
        self.info.below = true;
    }

    /// Snap a horizontal move onto a walkable slope falling away in the
    /// direction of motion.
    ///
    /// Probes straight down from the trailing bottom corner.
    pub(super) fn descend_slope(&mut self, delta: &mut Vec2) -> Result<(), CastError> {
        let dir_x = direction(delta.x);
        let distance = delta.x.abs();
        let origin = if dir_x < 0.0 {
            self.origins.bottom_right
        } else {
            self.origins.bottom_left
        };

        let Some(hit) = self.cast_solid(origin, Vec2::NEG_Y, distance + self.config.skin_width)? else {
            return Ok(());
        };

        let angle = surface_angle(hit.normal);
        #[allow(clippy::float_cmp)]
        if angle == 0.0 || direction(hit.normal.x) != dir_x {
            return Ok(());
        }

        let (sin, cos) = angle.to_radians().sin_cos();
        let drop = distance * angle.to_radians().tan();
        if hit.distance - self.config.skin_width > drop {
            return Ok(());
        }

        delta.x = cos * distance * dir_x;
        delta.y = -sin * distance;

        self.record(Axis::Vertical, hit);
        self.info.slope_angle = angle;
        self.info.descending_slope = true;
        self.info.below = true;
        Ok(())
    }

    /// Slide down a slope steeper than the walkable limit.
    ///
    /// Probes down from both bottom corners; the nearer hit wins and the
    /// right corner wins a tie. The downward part of `delta` that would sink
    /// into the slope becomes motion along it, unless the requested
    /// horizontal motion already moves away from the slope faster.
    pub(super) fn slide_max_slope(&mut self, delta: &mut Vec2) -> Result<(), CastError> {
        let skin = self.config.skin_width;
        let length = delta.y.abs() + skin;

        let left = self.cast_solid(self.origins.bottom_left, Vec2::NEG_Y, length)?;
        let right = self.cast_solid(self.origins.bottom_right, Vec2::NEG_Y, length)?;

        let hit = match (left, right) {
            (Some(l), Some(r)) if l.distance < r.distance => l,
            (_, Some(r)) => r,
            (Some(l), None) => l,
            (None, None) => return Ok(()),
        };

        let normal = hit.normal;
        let angle = surface_angle(normal);
        if angle <= self.config.max_slope_angle {
            return Ok(());
        }

        let (sin, cos) = angle.to_radians().sin_cos();
        let mut magnitude = delta.y.abs() - (hit.distance - skin);
        let slide_x = direction(normal.x) * magnitude * cos;

        #[allow(clippy::float_cmp)]
        let away_faster = direction(delta.x) == direction(slide_x) && delta.x.abs() >= slide_x.abs();
        if away_faster {
            return Ok(());
        }

        self.record(Axis::Vertical, hit);
        delta.x = slide_x;
        delta.y = -magnitude * sin;

        // Re-probe along the slide; something may be in the way further down.
        let dir_x = direction(delta.x);
        let origin = if dir_x < 0.0 {
            self.origins.bottom_left
        } else {
            self.origins.bottom_right
        };
        let angled_skin = skin / (90.0 - angle).to_radians().cos();
        let slide_dir = delta.normalize_or_zero();

        let blocker = if slide_dir == Vec2::ZERO {
            None
        } else {
            self.cast_solid(origin, slide_dir, magnitude + angled_skin)?
        };

        if let Some(blocker) = blocker {
            magnitude = blocker.distance - angled_skin;
            delta.x = dir_x * magnitude * cos;
            delta.y = -magnitude * sin;
        } else {
            self.info.slope_angle = angle;
            self.info.max_slope = true;
            self.info.slope_normal = normal;
        }
        self.info.below = true;
        Ok(())
    }

    /// After climbing, check whether the slope gets steeper within this move
    /// and stop at the change of angle if so.
    ///
    /// Probes horizontally from the leading bottom corner raised by the
    /// resolved climb.
    pub(super) fn adjust_steeper_slope(&mut self, delta: &mut Vec2) -> Result<(), CastError> {
        let dir_x = direction(delta.x);
        let length = delta.x.abs() + self.config.skin_width;
        let corner = if dir_x < 0.0 {
            self.origins.bottom_left
        } else {
            self.origins.bottom_right
        };
        let origin = corner + Vec2::Y * delta.y;

        let Some(hit) = self.cast_solid(origin, Vec2::X * dir_x, length)? else {
            return Ok(());
        };

        let angle = surface_angle(hit.normal);
        #[allow(clippy::float_cmp)]
        if angle != self.info.slope_angle {
            delta.x = (hit.distance - self.config.skin_width) * dir_x;
            self.info.slope_angle = angle;
        }
        Ok(())
    }
}
