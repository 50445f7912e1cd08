//! Route overlay: the polyline, the endpoint markers and their labels.

use projection::PixelPoint;
use route_common::Color;
use tiny_skia::{FillRule, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Stroke, Transform};

/// Line segments of a glyph in a unit box, y pointing down.
type Glyph = &'static [((f32, f32), (f32, f32))];

const GLYPH_A: Glyph = &[
    ((0.0, 1.0), (0.5, 0.0)),
    ((0.5, 0.0), (1.0, 1.0)),
    ((0.2, 0.6), (0.8, 0.6)),
];

const GLYPH_B: Glyph = &[
    ((0.0, 0.0), (0.0, 1.0)),
    ((0.0, 0.0), (0.7, 0.0)),
    ((0.7, 0.0), (0.9, 0.15)),
    ((0.9, 0.15), (0.9, 0.35)),
    ((0.9, 0.35), (0.7, 0.5)),
    ((0.0, 0.5), (0.7, 0.5)),
    ((0.7, 0.5), (1.0, 0.65)),
    ((1.0, 0.65), (1.0, 0.85)),
    ((1.0, 0.85), (0.75, 1.0)),
    ((0.75, 1.0), (0.0, 1.0)),
];

/// Horizontal gap between a marker center and its label.
pub const LABEL_OFFSET: f32 = 10.0;

fn paint_for(color: &Color) -> Paint<'static> {
    let (r, g, b, a) = color.to_rgba();
    let mut paint = Paint::default();
    paint.set_color_rgba8(r, g, b, a);
    paint.anti_alias = true;
    paint
}

/// Stroke the route through `points` in order.
pub fn draw_route(pixmap: &mut Pixmap, points: &[PixelPoint], color: &Color, width: f32) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };

    let mut pb = PathBuilder::new();
    pb.move_to(first.x as f32, first.y as f32);
    for p in rest {
        pb.line_to(p.x as f32, p.y as f32);
    }

    // A route of identical points collapses to nothing
    let Some(path) = pb.finish() else {
        return;
    };

    let stroke = Stroke {
        width,
        line_cap: LineCap::Round,
        line_join: LineJoin::Round,
        ..Stroke::default()
    };
    pixmap.stroke_path(&path, &paint_for(color), &stroke, Transform::identity(), None);
}

/// Filled circle with an optional one-character label to its right.
pub fn draw_marker(
    pixmap: &mut Pixmap,
    at: PixelPoint,
    radius: f32,
    color: &Color,
    label: Option<(char, f32)>,
) {
    let paint = paint_for(color);
    let (x, y) = (at.x as f32, at.y as f32);

    if let Some(circle) = PathBuilder::from_circle(x, y, radius) {
        pixmap.fill_path(&circle, &paint, FillRule::Winding, Transform::identity(), None);
    }

    if let Some((ch, size)) = label {
        draw_glyph(pixmap, x + LABEL_OFFSET, y, ch, size, &paint);
    }
}

fn glyph(ch: char) -> Option<Glyph> {
    match ch.to_ascii_uppercase() {
        'A' => Some(GLYPH_A),
        'B' => Some(GLYPH_B),
        _ => None,
    }
}

/// Draw `ch` with its left edge at `x` and its baseline at `y`.
/// Returns false for characters without a glyph.
pub fn draw_glyph(pixmap: &mut Pixmap, x: f32, y: f32, ch: char, size: f32, paint: &Paint) -> bool {
    let Some(segments) = glyph(ch) else {
        return false;
    };

    let width = size * 0.7;
    let top = y - size;
    let mut pb = PathBuilder::new();
    for ((x1, y1), (x2, y2)) in segments {
        pb.move_to(x + x1 * width, top + y1 * size);
        pb.line_to(x + x2 * width, top + y2 * size);
    }

    if let Some(path) = pb.finish() {
        let stroke = Stroke {
            width: (size * 0.15).max(1.0),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Stroke::default()
        };
        pixmap.stroke_path(&path, paint, &stroke, Transform::identity(), None);
    }
    true
}
