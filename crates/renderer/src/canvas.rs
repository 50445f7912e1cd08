//! Raster plumbing: tile stitching and the final stretch onto the output size.
//!
//! Canvases are `tiny_skia::Pixmap`s and therefore premultiplied. Tiles come
//! in as straight-alpha RGBA and the finished map goes out the same way.

use projection::TileRect;
use route_common::Color as RouteColor;
use tile_source::TileImage;
use tiny_skia::{Color, ColorU8, FilterQuality, Pixmap, PixmapPaint, Transform};
use tracing::debug;

use crate::error::{RenderError, RenderResult};

/// Allocate a transparent canvas.
pub fn new_canvas(width: u32, height: u32) -> RenderResult<Pixmap> {
    Pixmap::new(width, height).ok_or(RenderError::Canvas { width, height })
}

/// Fill a whole canvas with one color.
pub fn fill(pixmap: &mut Pixmap, color: &RouteColor) {
    let (r, g, b, a) = color.to_rgba();
    pixmap.fill(Color::from_rgba8(r, g, b, a));
}

/// Copy a decoded tile into a premultiplied pixmap.
pub fn tile_pixmap(tile: &TileImage) -> Option<Pixmap> {
    let image = tile.pixels();
    let mut pixmap = Pixmap::new(image.width(), image.height())?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
        let [r, g, b, a] = src.0;
        *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
    }
    Some(pixmap)
}

/// Largest stitched canvas, in pixels, built before the stretch. Bigger
/// rectangles are drawn slot by slot straight onto the output.
pub const STITCH_PIXEL_BUDGET: u64 = 4096 * 4096;

/// Whether `rect` at `tile_size` stays within [`STITCH_PIXEL_BUDGET`].
pub fn fits_stitch_budget(rect: &TileRect, tile_size: u32) -> bool {
    rect.pixel_size(tile_size)
        .is_some_and(|(w, h)| w as u64 * h as u64 <= STITCH_PIXEL_BUDGET)
}

/// Draw every tile of `rect` into its slot on a `(tilesX*ts) x (tilesY*ts)`
/// canvas. Slots without a tile stay transparent. Placement depends only on
/// each tile's coordinate, never on arrival order.
pub fn stitch(rect: &TileRect, tiles: &[TileImage], tile_size: u32) -> RenderResult<Pixmap> {
    let (width, height) = rect.pixel_size(tile_size).ok_or(RenderError::Canvas {
        width: rect.tiles_x().saturating_mul(tile_size),
        height: rect.tiles_y().saturating_mul(tile_size),
    })?;
    let mut canvas = new_canvas(width, height)?;

    for tile in tiles {
        let coord = tile.coord();
        let Some((dx, dy)) = rect.pixel_offset(coord, tile_size) else {
            debug!(tile = %coord, "Skipping tile outside the route rectangle");
            continue;
        };
        let Some(pixmap) = tile_pixmap(tile) else {
            continue;
        };
        let slot = tile_size as f32;
        draw_into(&mut canvas, &pixmap, dx as f32, dy as f32, slot, slot);
    }

    Ok(canvas)
}

/// Draw every tile of `rect` directly into its scaled slot on `dst`.
///
/// The slot grid is the stitched canvas stretched onto `dst`, so the result
/// matches [`stitch`] followed by [`stretch_onto`] without the intermediate
/// canvas.
pub fn draw_into_slots(rect: &TileRect, tiles: &[TileImage], dst: &mut Pixmap) {
    let slot_w = dst.width() as f32 / rect.tiles_x() as f32;
    let slot_h = dst.height() as f32 / rect.tiles_y() as f32;

    for tile in tiles {
        let coord = tile.coord();
        if !rect.contains(coord) {
            debug!(tile = %coord, "Skipping tile outside the route rectangle");
            continue;
        }
        let Some(pixmap) = tile_pixmap(tile) else {
            continue;
        };
        let dx = (coord.x - rect.min_x) as f32 * slot_w;
        let dy = (coord.y - rect.min_y) as f32 * slot_h;
        draw_into(dst, &pixmap, dx, dy, slot_w, slot_h);
    }
}

/// Draw `src` scaled to `slot_w x slot_h` with its top-left at `(dx, dy)`.
fn draw_into(dst: &mut Pixmap, src: &Pixmap, dx: f32, dy: f32, slot_w: f32, slot_h: f32) {
    let sx = slot_w / src.width() as f32;
    let sy = slot_h / src.height() as f32;
    let quality = if sx == 1.0 && sy == 1.0 {
        FilterQuality::Nearest
    } else {
        FilterQuality::Bilinear
    };

    dst.draw_pixmap(
        0,
        0,
        src.as_ref(),
        &PixmapPaint {
            quality,
            ..PixmapPaint::default()
        },
        Transform::from_row(sx, 0.0, 0.0, sy, dx, dy),
        None,
    );
}

/// Scale `src` onto the whole of `dst`, per axis, with bilinear filtering.
pub fn stretch_onto(src: &Pixmap, dst: &mut Pixmap) {
    let sx = dst.width() as f32 / src.width() as f32;
    let sy = dst.height() as f32 / src.height() as f32;
    dst.draw_pixmap(
        0,
        0,
        src.as_ref(),
        &PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        },
        Transform::from_scale(sx, sy),
        None,
    );
}

/// Straight-alpha RGBA bytes, row-major.
pub fn to_straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}
