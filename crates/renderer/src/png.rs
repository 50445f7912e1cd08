//! PNG encoding for finished route maps.
//!
//! Two color types are produced:
//! - **Indexed (color type 3)** when the map has at most 256 distinct colors,
//!   which is typical for a route drawn over a blank basemap.
//! - **RGBA (color type 6)** for anything richer, e.g. stitched street tiles.

use std::collections::HashMap;
use std::io::Write;

use tiny_skia::Pixmap;

use crate::error::{RenderError, RenderResult};

const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Maximum colors for indexed PNG (PNG8)
const MAX_PALETTE_SIZE: usize = 256;

type Palette = Vec<[u8; 4]>;

/// Encode a premultiplied canvas as PNG, demultiplying first.
pub fn encode_pixmap(pixmap: &Pixmap) -> RenderResult<Vec<u8>> {
    let pixels = crate::canvas::to_straight_rgba(pixmap);
    encode_auto(&pixels, pixmap.width(), pixmap.height())
}

/// Encode straight RGBA pixels, choosing indexed output when the palette fits.
pub fn encode_auto(pixels: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    check_dimensions(pixels, width, height, 4)?;

    match extract_palette(pixels) {
        Some((palette, indices)) => encode_indexed(width, height, &palette, &indices),
        None => encode_rgba(pixels, width, height),
    }
}

/// Encode straight RGBA pixels as a color type 6 PNG.
pub fn encode_rgba(pixels: &[u8], width: u32, height: u32) -> RenderResult<Vec<u8>> {
    check_dimensions(pixels, width, height, 4)?;

    let mut png = Vec::with_capacity(pixels.len() / 2);
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 6));

    let idat = deflate_scanlines(pixels, width as usize * 4)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

/// Encode a palette and one index byte per pixel as a color type 3 PNG.
pub fn encode_indexed(
    width: u32,
    height: u32,
    palette: &[[u8; 4]],
    indices: &[u8],
) -> RenderResult<Vec<u8>> {
    check_dimensions(indices, width, height, 1)?;
    if palette.is_empty() || palette.len() > MAX_PALETTE_SIZE {
        return Err(RenderError::Encoding(format!(
            "palette must hold 1..={} colors, got {}",
            MAX_PALETTE_SIZE,
            palette.len()
        )));
    }

    let mut png = Vec::new();
    png.extend_from_slice(&PNG_SIGNATURE);
    write_chunk(&mut png, b"IHDR", &ihdr(width, height, 3));

    let plte: Vec<u8> = palette.iter().flat_map(|c| [c[0], c[1], c[2]]).collect();
    write_chunk(&mut png, b"PLTE", &plte);

    if palette.iter().any(|c| c[3] < 255) {
        let trns: Vec<u8> = palette.iter().map(|c| c[3]).collect();
        write_chunk(&mut png, b"tRNS", &trns);
    }

    let idat = deflate_scanlines(indices, width as usize)?;
    write_chunk(&mut png, b"IDAT", &idat);
    write_chunk(&mut png, b"IEND", &[]);

    Ok(png)
}

fn check_dimensions(
    data: &[u8],
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> RenderResult<()> {
    if width == 0 || height == 0 {
        return Err(RenderError::Encoding(format!(
            "image dimensions must be non-zero, got {}x{}",
            width, height
        )));
    }
    let expected = width as usize * height as usize * bytes_per_pixel;
    if data.len() != expected {
        return Err(RenderError::Encoding(format!(
            "expected {} bytes for {}x{}, got {}",
            expected,
            width,
            height,
            data.len()
        )));
    }
    Ok(())
}

fn ihdr(width: u32, height: u32, color_type: u8) -> [u8; 13] {
    let mut data = [0u8; 13];
    data[0..4].copy_from_slice(&width.to_be_bytes());
    data[4..8].copy_from_slice(&height.to_be_bytes());
    data[8] = 8; // bit depth
    data[9] = color_type;
    // compression, filter and interlace methods stay 0
    data
}

/// Collect up to 256 distinct colors, or `None` if the image has more.
fn extract_palette(pixels: &[u8]) -> Option<(Palette, Vec<u8>)> {
    let mut color_to_index: HashMap<u32, u8> = HashMap::with_capacity(MAX_PALETTE_SIZE);
    let mut palette: Palette = Vec::with_capacity(MAX_PALETTE_SIZE);
    let mut indices = Vec::with_capacity(pixels.len() / 4);

    for chunk in pixels.chunks_exact(4) {
        let packed = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        let index = match color_to_index.get(&packed) {
            Some(&idx) => idx,
            None => {
                if palette.len() >= MAX_PALETTE_SIZE {
                    return None;
                }
                let idx = palette.len() as u8;
                palette.push([chunk[0], chunk[1], chunk[2], chunk[3]]);
                color_to_index.insert(packed, idx);
                idx
            }
        };
        indices.push(index);
    }

    Some((palette, indices))
}

/// Prefix each row with filter type 0 and zlib-compress.
fn deflate_scanlines(data: &[u8], row_bytes: usize) -> RenderResult<Vec<u8>> {
    let rows = data.len() / row_bytes;
    let mut uncompressed = Vec::with_capacity(rows * (row_bytes + 1));
    for row in data.chunks_exact(row_bytes) {
        uncompressed.push(0);
        uncompressed.extend_from_slice(row);
    }

    let mut encoder = flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::fast());
    encoder
        .write_all(&uncompressed)
        .and_then(|_| encoder.finish())
        .map_err(|e| RenderError::Encoding(format!("IDAT compression failed: {}", e)))
}

fn write_chunk(png: &mut Vec<u8>, chunk_type: &[u8; 4], data: &[u8]) {
    png.extend_from_slice(&(data.len() as u32).to_be_bytes());
    png.extend_from_slice(chunk_type);
    png.extend_from_slice(data);

    let mut hasher = crc32fast::Hasher::new();
    hasher.update(chunk_type);
    hasher.update(data);
    png.extend_from_slice(&hasher.finalize().to_be_bytes());
}
