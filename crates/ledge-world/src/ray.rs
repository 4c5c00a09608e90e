//! The collision query port: rays, hits and the [`RayCaster`] trait.
//!
//! # Contract
//!
//! `cast(ray, max_distance, mask)` returns the nearest hit along `ray` within
//! `max_distance` against colliders whose layers intersect `mask`, or `None`.
//! A backend that cannot answer must return an error rather than `None`:
//! "no hit" grants the full requested motion, so a failed query reported as a
//! miss would let the actor tunnel through geometry.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::layers::{LayerMask, SurfaceTags};

/// Tolerance used when validating that a ray direction is unit length.
const UNIT_TOLERANCE: f32 = 1e-3;

/// Unique identifier for a collider inside a world.
///
/// Ordered by numeric value; the reference [`World`](crate::World) resolves
/// exact distance ties to the lowest id.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ColliderId(u32);

impl ColliderId {
    /// Creates a new `ColliderId` from a raw value.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw value of this identifier.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ColliderId({})", self.0)
    }
}

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A half-line with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// Start point
    pub origin: Vec2,
    /// Unit direction
    pub direction: Vec2,
}

impl Ray {
    /// Create a ray. `direction` is expected to be unit length.
    #[must_use]
    pub fn new(origin: Vec2, direction: Vec2) -> Self {
        Self { origin, direction }
    }

    /// Point at distance `t` along the ray.
    #[must_use]
    pub fn at(&self, t: f32) -> Vec2 {
        self.origin + self.direction * t
    }

    /// Validate a query built from this ray.
    ///
    /// # Errors
    ///
    /// Returns [`CastError::InvalidRay`] if the origin is not finite, the
    /// direction is not a finite unit vector, or `max_distance` is negative
    /// or not finite.
    pub fn validate(&self, max_distance: f32) -> Result<(), CastError> {
        if !self.origin.is_finite() {
            return Err(CastError::InvalidRay("origin is not finite"));
        }
        if !self.direction.is_finite() || (self.direction.length() - 1.0).abs() > UNIT_TOLERANCE {
            return Err(CastError::InvalidRay("direction is not a unit vector"));
        }
        if !max_distance.is_finite() || max_distance < 0.0 {
            return Err(CastError::InvalidRay("max distance is negative or not finite"));
        }
        Ok(())
    }
}

/// Result of a successful ray query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hit {
    /// Collider that was hit
    pub collider: ColliderId,
    /// Distance from the ray origin to the hit point
    pub distance: f32,
    /// Unit surface normal at the hit point
    pub normal: Vec2,
    /// World-space hit point
    pub point: Vec2,
    /// Whether the collider is a trigger (never blocks motion)
    pub is_trigger: bool,
    /// Gameplay tags of the collider
    pub tags: SurfaceTags,
}

/// Failure of a ray query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CastError {
    /// The ray or distance was malformed.
    #[error("invalid ray: {0}")]
    InvalidRay(&'static str),
    /// The backing collision service could not answer.
    #[error("collision backend unavailable: {0}")]
    Backend(String),
}

/// Ray-vs-world intersection primitive.
///
/// Implementations must be pure with respect to their geometry: the same
/// query against the same world returns the same answer.
pub trait RayCaster {
    /// Cast `ray` up to `max_distance` against colliders on `mask`.
    ///
    /// # Errors
    ///
    /// Returns a [`CastError`] when the query is malformed or the backend
    /// cannot answer. Implementations must never report a failure as `Ok(None)`.
    fn cast(&self, ray: &Ray, max_distance: f32, mask: LayerMask)
        -> Result<Option<Hit>, CastError>;
}

impl<T: RayCaster + ?Sized> RayCaster for &T {
    fn cast(
        &self,
        ray: &Ray,
        max_distance: f32,
        mask: LayerMask,
    ) -> Result<Option<Hit>, CastError> {
        (**self).cast(ray, max_distance, mask)
    }
}
