//! Mapping from geographic coordinates to output-canvas pixels.

use route_common::Waypoint;

use crate::mercator::project_to_tile;
use crate::tile_rect::TileRect;

/// A pixel position on the output canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    pub fn within(&self, width: u32, height: u32) -> bool {
        self.x >= 0.0 && self.x < width as f64 && self.y >= 0.0 && self.y < height as f64
    }
}

/// The stitched tile rectangle stretched onto a `width` x `height` canvas.
///
/// Stretching is uniform per axis and does not preserve aspect ratio, so
/// points are mapped with the same per-axis scale the raster gets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    rect: TileRect,
    tile_size: u32,
    width: u32,
    height: u32,
}

impl Viewport {
    pub fn new(rect: TileRect, tile_size: u32, width: u32, height: u32) -> Self {
        Self {
            rect,
            tile_size,
            width,
            height,
        }
    }

    pub fn rect(&self) -> &TileRect {
        &self.rect
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Per-axis factors from stitched-canvas pixels to output pixels.
    pub fn scale(&self) -> (f64, f64) {
        let tile_size = self.tile_size as f64;
        (
            self.width as f64 / (self.rect.tiles_x() as f64 * tile_size),
            self.height as f64 / (self.rect.tiles_y() as f64 * tile_size),
        )
    }

    /// Size of one tile slot on the output canvas.
    pub fn slot_size(&self) -> (f64, f64) {
        (
            self.width as f64 / self.rect.tiles_x() as f64,
            self.height as f64 / self.rect.tiles_y() as f64,
        )
    }

    /// Output-canvas pixel of a geographic point.
    pub fn to_pixel(&self, lat: f64, lng: f64) -> PixelPoint {
        let tile = project_to_tile(lat, lng, self.rect.zoom);
        let (slot_w, slot_h) = self.slot_size();

        PixelPoint {
            x: (tile.x - self.rect.min_x as f64) * slot_w,
            y: (tile.y - self.rect.min_y as f64) * slot_h,
        }
    }

    pub fn waypoint_to_pixel(&self, p: Waypoint) -> PixelPoint {
        self.to_pixel(p.lat, p.lng)
    }
}
