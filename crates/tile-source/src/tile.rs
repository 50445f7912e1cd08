//! Decoded tile images.

use image::RgbaImage;
use route_common::TileCoord;

use crate::error::TileError;

/// A decoded tile in straight (non-premultiplied) RGBA.
///
/// Tile servers normally deliver 256x256 images; other sizes are accepted
/// here and stretched into their slot when drawn.
#[derive(Debug, Clone)]
pub struct TileImage {
    coord: TileCoord,
    pixels: RgbaImage,
}

impl TileImage {
    pub fn new(coord: TileCoord, pixels: RgbaImage) -> Result<Self, TileError> {
        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(TileError::Empty);
        }
        Ok(Self { coord, pixels })
    }

    /// Decode an encoded tile body (PNG, JPEG, ...).
    pub fn decode(coord: TileCoord, bytes: &[u8]) -> Result<Self, TileError> {
        let pixels = image::load_from_memory(bytes)?.to_rgba8();
        Self::new(coord, pixels)
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}
