//! # Ledge World
//!
//! Collider world and ray query port for the ledge kinematic controller.
//!
//! The controller never touches geometry directly. Everything it knows about
//! the world comes from a single primitive: cast a ray from an origin along a
//! unit direction, up to a maximum distance, against a layer mask, and return
//! the nearest hit (if any). That primitive is the [`RayCaster`] trait.
//!
//! This crate provides:
//!
//! - **The port**: [`RayCaster`], [`Ray`], [`Hit`], [`CastError`]
//! - **Filtering**: [`LayerMask`] for collision/passthrough layers and
//!   [`SurfaceTags`] for gameplay markers such as bouncy floors
//! - **A reference world**: [`World`], a flat list of boxes and convex
//!   polygons that implements [`RayCaster`] deterministically
//! - **Tilemaps**: [`tilemap::parse`] builds a [`World`] from ASCII rows
//!
//! ## Quick Start
//!
//! ```
//! use glam::Vec2;
//! use ledge_world::{Aabb, LayerMask, Ray, RayCaster, World};
//!
//! let mut world = World::new();
//! world.add_box(Aabb::new(Vec2::new(-10.0, -1.0), Vec2::new(10.0, 0.0)), LayerMask::SOLID);
//!
//! let ray = Ray::new(Vec2::new(0.0, 2.0), Vec2::NEG_Y);
//! let hit = world.cast(&ray, 5.0, LayerMask::SOLID).unwrap().unwrap();
//! assert!((hit.distance - 2.0).abs() < 1e-5);
//! assert_eq!(hit.normal, Vec2::Y);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod layers;
pub mod ray;
pub mod shape;
pub mod tilemap;
pub mod world;

// Re-exports for convenience
pub use layers::{LayerMask, SurfaceTags};
pub use ray::{CastError, ColliderId, Hit, Ray, RayCaster};
pub use shape::{ConvexPolygon, Shape, ShapeError};
pub use tilemap::TileMapError;
pub use world::{Collider, World};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec2,
    /// Maximum corner
    pub max: Vec2,
}

impl Aabb {
    /// Create a box from min/max corners.
    #[must_use]
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Create a box from its center and half extents.
    #[must_use]
    pub fn from_center_half_extents(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            min: center - half_extents,
            max: center + half_extents,
        }
    }

    /// Get the center of the box.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Get the size of the box.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Shrink every side by `amount` (negative values grow the box).
    #[must_use]
    pub fn shrink(&self, amount: f32) -> Self {
        Self {
            min: self.min + Vec2::splat(amount),
            max: self.max - Vec2::splat(amount),
        }
    }

    /// Check if a point is inside the box (edges included).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if this box overlaps another (touching edges do not count).
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    /// Smallest box containing both boxes.
    #[must_use]
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }
}
