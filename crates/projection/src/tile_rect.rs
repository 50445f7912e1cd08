//! Resolution of a route's bounding box to an inclusive tile rectangle.

use route_common::{GeoBounds, TileCoord};

use crate::mercator::{project_to_tile, tile_count};

/// Inclusive rectangle `[min_x..=max_x] x [min_y..=max_y]` of tiles at one zoom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub zoom: u32,
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl TileRect {
    /// The minimal tile rectangle covering `bounds` at `zoom`.
    ///
    /// The north-west corner yields the minimum tile indices and the
    /// south-east corner the maximum. Indices are clamped onto the tile grid,
    /// so the rectangle always holds at least one tile.
    pub fn covering(bounds: &GeoBounds, zoom: u32) -> Self {
        let nw = bounds.north_west();
        let se = bounds.south_east();
        let top_left = project_to_tile(nw.lat, nw.lng, zoom);
        let bottom_right = project_to_tile(se.lat, se.lng, zoom);

        let last = tile_count(zoom) - 1.0;
        let index = |v: f64| v.floor().clamp(0.0, last) as u32;

        let (x0, x1) = (index(top_left.x), index(bottom_right.x));
        let (y0, y1) = (index(top_left.y), index(bottom_right.y));

        Self {
            zoom,
            min_x: x0.min(x1),
            min_y: y0.min(y1),
            max_x: x0.max(x1),
            max_y: y0.max(y1),
        }
    }

    /// Number of tile columns.
    pub fn tiles_x(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Number of tile rows.
    pub fn tiles_y(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    /// Total number of tiles in the rectangle.
    pub fn len(&self) -> usize {
        self.tiles_x() as usize * self.tiles_y() as usize
    }

    /// Always false: `covering` clamps onto the grid and the bounds are
    /// inclusive, so a rectangle holds at least one tile.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.z == self.zoom
            && (self.min_x..=self.max_x).contains(&coord.x)
            && (self.min_y..=self.max_y).contains(&coord.y)
    }

    /// All tiles, outer loop over columns and inner loop over rows.
    pub fn iter(&self) -> impl Iterator<Item = TileCoord> + '_ {
        (self.min_x..=self.max_x).flat_map(move |x| {
            (self.min_y..=self.max_y).map(move |y| TileCoord::new(self.zoom, x, y))
        })
    }

    /// Pixel offset of `coord` on a canvas holding the whole rectangle.
    ///
    /// `None` when `coord` lies outside the rectangle or the offset does not
    /// fit in `u32`.
    pub fn pixel_offset(&self, coord: TileCoord, tile_size: u32) -> Option<(u32, u32)> {
        if !self.contains(coord) {
            return None;
        }
        Some((
            (coord.x - self.min_x).checked_mul(tile_size)?,
            (coord.y - self.min_y).checked_mul(tile_size)?,
        ))
    }

    /// Pixel dimensions of a canvas holding the whole rectangle, or `None`
    /// when they do not fit in `u32`.
    pub fn pixel_size(&self, tile_size: u32) -> Option<(u32, u32)> {
        Some((
            self.tiles_x().checked_mul(tile_size)?,
            self.tiles_y().checked_mul(tile_size)?,
        ))
    }
}
