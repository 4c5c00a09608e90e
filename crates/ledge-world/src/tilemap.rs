//! ASCII tilemap loader.
//!
//! Each character is one square tile of `tile_size` world units. The first
//! line is the top row; the bottom-left corner of the last line sits at the
//! world origin.
//!
//! | Glyph | Collider |
//! |---|---|
//! | `#` | solid box (horizontal runs merge into one box) |
//! | `B` | solid box tagged [`SurfaceTags::BOUNCY`] (runs merge) |
//! | `T` | trigger box on [`LayerMask::PASSTHROUGH`] |
//! | `/` | 45° ramp rising to the right |
//! | `\` | 45° ramp rising to the left |
//! | `.` or space | empty |
//!
//! Leading and trailing blank lines are ignored so raw string literals can
//! start on their own line.
//!
//! ```
//! use ledge_world::tilemap;
//!
//! let world = tilemap::parse(
//!     r"
//! ....
//! ./##
//! ####
//! ",
//!     1.0,
//! )
//! .unwrap();
//! // one merged run on the middle row, one ramp, one merged floor
//! assert_eq!(world.len(), 3);
//! ```

use glam::Vec2;
use thiserror::Error;
use tracing::debug;

use crate::layers::SurfaceTags;
use crate::shape::{ConvexPolygon, Shape};
use crate::world::{Collider, World};
use crate::Aabb;

/// Errors parsing a tilemap.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TileMapError {
    /// The source had no non-blank lines.
    #[error("tilemap is empty")]
    Empty,
    /// Tile size must be finite and positive.
    #[error("invalid tile size {0}")]
    InvalidTileSize(f32),
    /// A character that is not a known glyph.
    #[error("unknown glyph {glyph:?} at row {row}, column {column}")]
    UnknownGlyph {
        /// Glyph found
        glyph: char,
        /// Zero-based row (top row is 0)
        row: usize,
        /// Zero-based column
        column: usize,
    },
}

/// Parse an ASCII tilemap into a [`World`].
///
/// # Errors
///
/// Returns a [`TileMapError`] for an empty map, a non-positive tile size or an
/// unknown glyph.
pub fn parse(source: &str, tile_size: f32) -> Result<World, TileMapError> {
    if !(tile_size.is_finite() && tile_size > 0.0) {
        return Err(TileMapError::InvalidTileSize(tile_size));
    }

    let lines: Vec<&str> = source.lines().map(|l| l.trim_end_matches('\r')).collect();
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return Err(TileMapError::Empty);
    };
    let rows = &lines[first..=last];

    let mut world = World::new();
    let row_count = rows.len();

    for (row, line) in rows.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let y_min = (row_count - 1 - row) as f32 * tile_size;
        let glyphs: Vec<char> = line.chars().collect();

        let mut column = 0;
        while column < glyphs.len() {
            let glyph = glyphs[column];
            #[allow(clippy::cast_precision_loss)]
            let x_min = column as f32 * tile_size;
            let base = Vec2::new(x_min, y_min);

            match glyph {
                '.' | ' ' => column += 1,
                '#' | 'B' => {
                    let run = glyphs[column..].iter().take_while(|g| **g == glyph).count();
                    #[allow(clippy::cast_precision_loss)]
                    let max = base + Vec2::new(run as f32 * tile_size, tile_size);
                    let mut collider = Collider::solid(Shape::Box(Aabb::new(base, max)));
                    if glyph == 'B' {
                        collider = collider.with_tags(SurfaceTags::BOUNCY);
                    }
                    world.spawn(collider);
                    column += run;
                }
                'T' => {
                    let aabb = Aabb::new(base, base + Vec2::splat(tile_size));
                    world.spawn(Collider::trigger(Shape::Box(aabb)));
                    column += 1;
                }
                '/' | '\\' => {
                    // Dimensions are positive, so the ramp is always valid.
                    if let Ok(ramp) = ConvexPolygon::ramp(base, tile_size, tile_size, glyph == '/') {
                        world.spawn(Collider::solid(Shape::Polygon(ramp)));
                    }
                    column += 1;
                }
                other => {
                    return Err(TileMapError::UnknownGlyph {
                        glyph: other,
                        row,
                        column,
                    })
                }
            }
        }
    }

    debug!(rows = row_count, colliders = world.len(), "parsed tilemap");
    Ok(world)
}
