//! Hits collected during a move, dispatched nearest-first.

use std::fmt;

use ledge_world::Hit;
use serde::{Deserialize, Serialize};

/// Axis a hit was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Rays cast left or right
    Horizontal,
    /// Rays cast up or down
    Vertical,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Horizontal => write!(f, "horizontal"),
            Self::Vertical => write!(f, "vertical"),
        }
    }
}

/// Hits recorded on one axis during a single move.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitSet {
    hits: Vec<Hit>,
}

impl HitSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a hit. Each collider is kept once, at its nearest distance.
    pub fn push(&mut self, hit: Hit) {
        match self.hits.iter_mut().find(|h| h.collider == hit.collider) {
            Some(existing) if hit.distance < existing.distance => *existing = hit,
            Some(_) => {}
            None => self.hits.push(hit),
        }
    }

    /// Number of recorded hits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Whether nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Drop all hits.
    #[cfg(test)]
    fn clear(&mut self) {
        self.hits.clear();
    }

    /// All hits in recording order.
    #[cfg(test)]
    fn as_slice(&self) -> &[Hit] {
        &self.hits
    }

    /// Every hit tied for the smallest distance, in recording order.
    ///
    /// Ties use exact float equality.
    #[must_use]
    pub fn nearest(&self) -> Vec<Hit> {
        let mut sorted = self.hits.clone();
        // Stable sort keeps recording order among equal distances.
        sorted.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        let Some(min) = sorted.first().map(|hit| hit.distance) else {
            return sorted;
        };
        #[allow(clippy::float_cmp)]
        let run = sorted.iter().take_while(|hit| hit.distance == min).count();
        sorted.truncate(run);
        sorted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use ledge_world::{ColliderId, SurfaceTags};

    fn hit(id: u32, distance: f32) -> Hit {
        Hit {
            collider: ColliderId::new(id),
            distance,
            normal: Vec2::Y,
            point: Vec2::ZERO,
            is_trigger: false,
            tags: SurfaceTags::empty(),
        }
    }

    #[test]
    fn empty_set_has_no_nearest() {
        assert!(HitSet::new().nearest().is_empty());
    }

    #[test]
    fn nearest_returns_single_minimum() {
        let mut set = HitSet::new();
        set.push(hit(0, 0.5));
        set.push(hit(1, 0.2));
        set.push(hit(2, 0.9));
        let nearest = set.nearest();
        assert_eq!(nearest.len(), 1);
        assert_eq!(nearest[0].collider, ColliderId::new(1));
    }

    #[test]
    fn nearest_returns_all_ties_in_order() {
        let mut set = HitSet::new();
        set.push(hit(3, 0.2));
        set.push(hit(1, 0.4));
        set.push(hit(2, 0.2));
        let ids: Vec<u32> = set.nearest().iter().map(|h| h.collider.as_u32()).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn same_collider_keeps_nearest() {
        let mut set = HitSet::new();
        set.push(hit(4, 0.6));
        set.push(hit(4, 0.3));
        set.push(hit(4, 0.8));
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].distance, 0.3);
    }

    #[test]
    fn clear_empties() {
        let mut set = HitSet::new();
        set.push(hit(0, 1.0));
        assert_eq!(set.len(), 1);
        set.clear();
        assert!(set.is_empty());
    }
}
