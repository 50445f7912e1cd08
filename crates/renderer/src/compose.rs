//! Synchronous composition of a route map from tiles already in hand.

use projection::{TileRect, Viewport};
use route_common::Route;
use tile_source::TileImage;
use tiny_skia::Pixmap;
use tracing::debug;

use crate::canvas;
use crate::config::RenderConfig;
use crate::error::RenderResult;
use crate::overlay;

/// Stitch `tiles`, stretch them to the output size and draw the route on top.
pub fn compose(
    route: &Route,
    rect: &TileRect,
    tiles: &[TileImage],
    config: &RenderConfig,
) -> RenderResult<Pixmap> {
    let mut map = canvas::new_canvas(config.width, config.height)?;
    if let Some(background) = &config.background {
        canvas::fill(&mut map, background);
    }

    if canvas::fits_stitch_budget(rect, config.tile_size) {
        let stitched = canvas::stitch(rect, tiles, config.tile_size)?;
        canvas::stretch_onto(&stitched, &mut map);
    } else {
        debug!(
            tiles_x = rect.tiles_x(),
            tiles_y = rect.tiles_y(),
            "Rectangle too large to stitch, drawing tiles into output slots"
        );
        canvas::draw_into_slots(rect, tiles, &mut map);
    }

    let viewport = Viewport::new(*rect, config.tile_size, config.width, config.height);
    let pixels: Vec<_> = route
        .waypoints()
        .iter()
        .map(|p| viewport.waypoint_to_pixel(*p))
        .collect();

    overlay::draw_route(&mut map, &pixels, &config.route_color, config.route_width);

    let label = |ch: char| config.labels.then_some((ch, config.label_size));
    let start = viewport.waypoint_to_pixel(route.start());
    let end = viewport.waypoint_to_pixel(route.end());
    let radius = config.marker_radius;
    overlay::draw_marker(&mut map, start, radius, &config.start_color, label('A'));
    overlay::draw_marker(&mut map, end, radius, &config.end_color, label('B'));

    Ok(map)
}
