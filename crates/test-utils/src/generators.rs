//! Synthetic map tiles.
//!
//! Tiles are encoded with the `image` crate so they go through the same
//! decode path as tiles fetched from a real server.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageOutputFormat, Rgba, RgbaImage};

/// Encode an RGBA image as PNG bytes.
pub fn encode_png(img: RgbaImage) -> Vec<u8> {
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), ImageOutputFormat::Png)
        .expect("PNG encoding of test tile failed");
    out
}

/// A single-color square tile.
pub fn solid_tile_png(size: u32, rgba: [u8; 4]) -> Vec<u8> {
    encode_png(RgbaImage::from_pixel(size, size, Rgba(rgba)))
}

/// A deterministic opaque color for a tile position, so tests can check
/// where each tile landed on a stitched canvas.
pub fn tile_color(x: u32, y: u32) -> [u8; 4] {
    [
        (x.wrapping_mul(37) % 256) as u8,
        (y.wrapping_mul(91) % 256) as u8,
        ((x ^ y).wrapping_mul(53) % 256) as u8,
        255,
    ]
}

/// Decode PNG bytes for assertions.
pub fn decode_png(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes)
        .expect("not a decodable image")
        .to_rgba8()
}

/// Write a `{z}/{x}/{y}.png` tile into a directory tree.
pub fn write_tile(root: &Path, z: u32, x: u32, y: u32, png: &[u8]) {
    let dir = root.join(z.to_string()).join(x.to_string());
    std::fs::create_dir_all(&dir).expect("failed to create tile directory");
    std::fs::write(dir.join(format!("{}.png", y)), png).expect("failed to write tile");
}

/// Create a temporary tile tree holding solid tiles for every `(x, y)`
/// in the inclusive ranges, colored with [`tile_color`].
pub fn temp_tile_tree(
    z: u32,
    xs: std::ops::RangeInclusive<u32>,
    ys: std::ops::RangeInclusive<u32>,
    size: u32,
) -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    for x in xs {
        for y in ys.clone() {
            write_tile(dir.path(), z, x, y, &solid_tile_png(size, tile_color(x, y)));
        }
    }
    dir
}
