//! World: a flat collection of colliders answering ray queries.
//!
//! The world stores colliders in a `BTreeMap` keyed by [`ColliderId`], so
//! iteration order (and therefore tie-breaking between equally distant hits)
//! is deterministic across runs and platforms. Ids are handed out
//! monotonically and never reused.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use ledge_world::{Aabb, Collider, LayerMask, Ray, RayCaster, Shape, SurfaceTags, World};
//!
//! let mut world = World::new();
//! let floor = world.spawn(
//!     Collider::solid(Shape::Box(Aabb::new(Vec2::new(-5.0, -1.0), Vec2::new(5.0, 0.0))))
//!         .with_tags(SurfaceTags::BOUNCY),
//! );
//!
//! let hit = world
//!     .cast(&Ray::new(Vec2::new(0.0, 1.0), Vec2::NEG_Y), 2.0, LayerMask::SOLID)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(hit.collider, floor);
//! assert!(hit.tags.contains(SurfaceTags::BOUNCY));
//! ```

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::layers::{LayerMask, SurfaceTags};
use crate::ray::{CastError, ColliderId, Hit, Ray, RayCaster};
use crate::shape::{ConvexPolygon, Shape, ShapeError};
use crate::Aabb;

/// A piece of world geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collider {
    /// Geometry
    pub shape: Shape,
    /// Layers this collider is on
    pub layers: LayerMask,
    /// Triggers report hits but never block motion
    pub trigger: bool,
    /// Gameplay tags copied into hits
    pub tags: SurfaceTags,
}

impl Collider {
    /// A blocking collider on the solid layer.
    #[must_use]
    pub fn solid(shape: Shape) -> Self {
        Self {
            shape,
            layers: LayerMask::SOLID,
            trigger: false,
            tags: SurfaceTags::empty(),
        }
    }

    /// A trigger collider on the passthrough layer.
    #[must_use]
    pub fn trigger(shape: Shape) -> Self {
        Self {
            shape,
            layers: LayerMask::PASSTHROUGH,
            trigger: true,
            tags: SurfaceTags::empty(),
        }
    }

    /// Replace the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: SurfaceTags) -> Self {
        self.tags = tags;
        self
    }

    /// Replace the layers.
    #[must_use]
    pub fn with_layers(mut self, layers: LayerMask) -> Self {
        self.layers = layers;
        self
    }
}

/// Reference implementation of the collision query port.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct World {
    colliders: BTreeMap<ColliderId, Collider>,
    next_id: u32,
}

impl World {
    /// Create an empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a collider and return its id.
    pub fn spawn(&mut self, collider: Collider) -> ColliderId {
        let id = ColliderId::new(self.next_id);
        self.next_id += 1;
        self.colliders.insert(id, collider);
        id
    }

    /// Add a solid box on the given layers.
    pub fn add_box(&mut self, aabb: Aabb, layers: LayerMask) -> ColliderId {
        self.spawn(Collider::solid(Shape::Box(aabb)).with_layers(layers))
    }

    /// Add a solid convex polygon.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] if the vertices do not form a convex polygon.
    pub fn add_polygon(&mut self, vertices: Vec<Vec2>) -> Result<ColliderId, ShapeError> {
        let polygon = ConvexPolygon::new(vertices)?;
        Ok(self.spawn(Collider::solid(Shape::Polygon(polygon))))
    }

    /// Add a solid ramp whose slope angle is `angle_degrees`.
    ///
    /// The ramp stands on `base_min` and is `width` wide; its height follows
    /// from the angle.
    ///
    /// # Errors
    ///
    /// Returns a [`ShapeError`] for non-positive width or an angle outside `(0, 90)`.
    pub fn add_ramp(
        &mut self,
        base_min: Vec2,
        width: f32,
        angle_degrees: f32,
        rising_right: bool,
    ) -> Result<ColliderId, ShapeError> {
        if !(angle_degrees > 0.0 && angle_degrees < 90.0) {
            return Err(ShapeError::NotConvex);
        }
        let height = width * angle_degrees.to_radians().tan();
        let polygon = ConvexPolygon::ramp(base_min, width, height, rising_right)?;
        Ok(self.spawn(Collider::solid(Shape::Polygon(polygon))))
    }

    /// Remove a collider, returning it if present.
    pub fn remove(&mut self, id: ColliderId) -> Option<Collider> {
        self.colliders.remove(&id)
    }

    /// Look up a collider.
    #[must_use]
    pub fn get(&self, id: ColliderId) -> Option<&Collider> {
        self.colliders.get(&id)
    }

    /// Number of colliders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    /// Whether the world has no colliders.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    /// Iterate colliders in id order.
    pub fn iter(&self) -> impl Iterator<Item = (ColliderId, &Collider)> {
        self.colliders.iter().map(|(id, c)| (*id, c))
    }
}

impl RayCaster for World {
    fn cast(
        &self,
        ray: &Ray,
        max_distance: f32,
        mask: LayerMask,
    ) -> Result<Option<Hit>, CastError> {
        ray.validate(max_distance)?;

        let mut nearest: Option<Hit> = None;
        for (id, collider) in &self.colliders {
            if !collider.layers.intersects(mask) {
                continue;
            }
            let Some((distance, normal)) = collider.shape.raycast(ray, max_distance) else {
                continue;
            };
            // Strict comparison keeps the lowest id on exact ties.
            if nearest.map_or(true, |hit| distance < hit.distance) {
                nearest = Some(Hit {
                    collider: *id,
                    distance,
                    normal,
                    point: ray.at(distance),
                    is_trigger: collider.trigger,
                    tags: collider.tags,
                });
            }
        }
        Ok(nearest)
    }
}
