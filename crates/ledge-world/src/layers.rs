//! Layer masks and surface tags used to filter and classify hits.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Collision layers a collider lives on, or a ray is allowed to hit.
    ///
    /// A ray hits a collider when the collider's layers intersect the ray's
    /// mask. Masks are combined with `|`, so the controller's horizontal pass
    /// casts against `SOLID | PASSTHROUGH` and re-queries with `SOLID` alone.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct LayerMask: u32 {
        /// Blocking geometry (floors, walls, ramps)
        const SOLID = 1 << 0;
        /// Non-blocking geometry that still reports hits (triggers)
        const PASSTHROUGH = 1 << 1;
        /// Every layer
        const ALL = u32::MAX;
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        Self::SOLID
    }
}

bitflags! {
    /// Gameplay markers carried by a collider and copied into every [`Hit`](crate::Hit).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct SurfaceTags: u16 {
        /// Landing on this surface fast enough bounces the actor
        const BOUNCY = 1 << 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_combine() {
        let mask = LayerMask::SOLID | LayerMask::PASSTHROUGH;
        assert!(mask.intersects(LayerMask::SOLID));
        assert!(mask.intersects(LayerMask::PASSTHROUGH));
        assert!(!LayerMask::SOLID.intersects(LayerMask::PASSTHROUGH));
        assert!(LayerMask::ALL.contains(mask));
    }

    #[test]
    fn default_mask_is_solid() {
        assert_eq!(LayerMask::default(), LayerMask::SOLID);
        assert!(SurfaceTags::default().is_empty());
    }

    #[test]
    fn tags_serialize() {
        let tags = SurfaceTags::BOUNCY;
        let json = serde_json::to_string(&tags).unwrap();
        let back: SurfaceTags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tags);
    }
}
