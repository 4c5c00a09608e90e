//! Collider shapes and their ray intersection routines.
//!
//! Two shapes cover a tilemap world: axis-aligned boxes for floors and walls,
//! and convex polygons for ramps and anything angled.
//!
//! A ray whose origin lies inside (or exactly on the boundary of) a shape
//! hits it at distance `0.0` with normal `-direction`. Callers that cast from
//! just inside their own skin rely on this to detect "already touching".

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ray::Ray;
use crate::Aabb;

/// Direction components below this are treated as parallel to an axis/edge.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Errors building a shape.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    /// Fewer than three vertices.
    #[error("polygon needs at least 3 vertices, got {0}")]
    TooFewVertices(usize),
    /// A vertex is NaN or infinite.
    #[error("polygon vertex {0} is not finite")]
    NonFiniteVertex(usize),
    /// Vertices are collinear, repeated or not convex.
    #[error("polygon is degenerate or not convex")]
    NotConvex,
    /// Box with min > max on some axis.
    #[error("box min corner exceeds max corner")]
    InvertedBox,
}

/// A convex polygon with counter-clockwise winding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvexPolygon {
    vertices: Vec<Vec2>,
    bounds: Aabb,
}

impl ConvexPolygon {
    /// Build a polygon from vertices in either winding order.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] if there are fewer than three vertices, any
    /// vertex is not finite, or the outline is not strictly convex.
    pub fn new(vertices: Vec<Vec2>) -> Result<Self, ShapeError> {
        if vertices.len() < 3 {
            return Err(ShapeError::TooFewVertices(vertices.len()));
        }
        if let Some(index) = vertices.iter().position(|v| !v.is_finite()) {
            return Err(ShapeError::NonFiniteVertex(index));
        }

        let n = vertices.len();
        let turns: Vec<f32> = (0..n)
            .map(|i| {
                let a = vertices[i];
                let b = vertices[(i + 1) % n];
                let c = vertices[(i + 2) % n];
                (b - a).perp_dot(c - b)
            })
            .collect();

        let all_left = turns.iter().all(|t| *t > 0.0);
        let all_right = turns.iter().all(|t| *t < 0.0);
        if !all_left && !all_right {
            return Err(ShapeError::NotConvex);
        }

        let mut vertices = vertices;
        if all_right {
            vertices.reverse();
        }

        let bounds = vertices.iter().skip(1).fold(
            Aabb::new(vertices[0], vertices[0]),
            |acc, v| acc.union(&Aabb::new(*v, *v)),
        );

        Ok(Self { vertices, bounds })
    }

    /// Right-triangle ramp standing on `base_min` (its bottom-left corner).
    ///
    /// With `rising_right` the slope climbs from left to right, otherwise it
    /// climbs from right to left. The slope angle is `atan(height / width)`.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::NotConvex`] for zero or negative dimensions.
    pub fn ramp(base_min: Vec2, width: f32, height: f32, rising_right: bool) -> Result<Self, ShapeError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ShapeError::NotConvex);
        }
        let bottom_left = base_min;
        let bottom_right = base_min + Vec2::new(width, 0.0);
        let top = if rising_right {
            base_min + Vec2::new(width, height)
        } else {
            base_min + Vec2::new(0.0, height)
        };
        Self::new(vec![bottom_left, bottom_right, top])
    }

    /// Vertices in counter-clockwise order.
    #[must_use]
    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    /// Bounding box of the polygon.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// Check if a point is inside the polygon (boundary included).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        self.edges().all(|(a, b)| (b - a).perp_dot(point - a) >= 0.0)
    }

    fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<(f32, Vec2)> {
        if self.contains(ray.origin) {
            return Some((0.0, -ray.direction));
        }

        let mut best: Option<(f32, Vec2)> = None;
        for (a, b) in self.edges() {
            let edge = b - a;
            // Outward normal for counter-clockwise winding.
            let normal = Vec2::new(edge.y, -edge.x).normalize();
            if normal.dot(ray.direction) >= 0.0 {
                continue;
            }

            let denom = ray.direction.perp_dot(edge);
            if denom.abs() < PARALLEL_EPSILON {
                continue;
            }
            let to_a = a - ray.origin;
            let t = to_a.perp_dot(edge) / denom;
            let s = to_a.perp_dot(ray.direction) / denom;
            if t < 0.0 || t > max_distance || !(0.0..=1.0).contains(&s) {
                continue;
            }
            if best.map_or(true, |(best_t, _)| t < best_t) {
                best = Some((t, normal));
            }
        }
        best
    }
}

/// Geometry of a collider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Axis-aligned box
    Box(Aabb),
    /// Convex polygon (ramps, wedges)
    Polygon(ConvexPolygon),
}

impl Shape {
    /// Build a box shape, validating the corners.
    ///
    /// # Errors
    ///
    /// Returns [`ShapeError::InvertedBox`] if `min > max` on either axis and
    /// [`ShapeError::NonFiniteVertex`] for NaN or infinite corners.
    pub fn aabb(aabb: Aabb) -> Result<Self, ShapeError> {
        if !aabb.min.is_finite() || !aabb.max.is_finite() {
            return Err(ShapeError::NonFiniteVertex(0));
        }
        if aabb.min.x > aabb.max.x || aabb.min.y > aabb.max.y {
            return Err(ShapeError::InvertedBox);
        }
        Ok(Self::Box(aabb))
    }

    /// Bounding box of the shape.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        match self {
            Self::Box(aabb) => *aabb,
            Self::Polygon(polygon) => polygon.bounds(),
        }
    }

    /// Intersect a ray with this shape.
    ///
    /// Returns the distance along the ray and the unit surface normal of the
    /// first surface crossed within `max_distance`.
    #[must_use]
    pub fn raycast(&self, ray: &Ray, max_distance: f32) -> Option<(f32, Vec2)> {
        match self {
            Self::Box(aabb) => raycast_aabb(aabb, ray, max_distance),
            Self::Polygon(polygon) => polygon.raycast(ray, max_distance),
        }
    }
}

/// Slab test against an axis-aligned box.
fn raycast_aabb(aabb: &Aabb, ray: &Ray, max_distance: f32) -> Option<(f32, Vec2)> {
    if aabb.contains(ray.origin) {
        return Some((0.0, -ray.direction));
    }

    let mut t_near = 0.0_f32;
    let mut t_far = max_distance;
    let mut normal = Vec2::ZERO;

    for (axis, unit) in [(0, Vec2::X), (1, Vec2::Y)] {
        let origin = ray.origin[axis];
        let direction = ray.direction[axis];
        let (min, max) = (aabb.min[axis], aabb.max[axis]);

        if direction.abs() < PARALLEL_EPSILON {
            if origin < min || origin > max {
                return None;
            }
            continue;
        }

        let inv = 1.0 / direction;
        let (t_enter, t_exit, face_normal) = if inv >= 0.0 {
            ((min - origin) * inv, (max - origin) * inv, -unit)
        } else {
            ((max - origin) * inv, (min - origin) * inv, unit)
        };

        if t_enter > t_near {
            t_near = t_enter;
            normal = face_normal;
        }
        t_far = t_far.min(t_exit);
        if t_near > t_far {
            return None;
        }
    }

    if normal == Vec2::ZERO {
        // Origin outside yet no entering face: only possible for zero-length rays.
        return None;
    }
    Some((t_near, normal))
}
