//! Route map rendering.
//!
//! A render resolves the route to the tile rectangle covering it, fetches
//! those tiles with bounded concurrency, stitches them, stretches the result
//! to the output size and draws the route, start marker "A" and end marker
//! "B" on top. Missing tiles leave transparent (or background) gaps; they
//! never fail a render, and neither does the size of the route.

pub mod canvas;
pub mod compose;
pub mod config;
pub mod error;
pub mod fetch;
pub mod overlay;
pub mod png;

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use metrics::{counter, histogram};
use projection::TileRect;
use route_common::{GeoBounds, Route, Waypoint};
use tile_source::TileSource;
use tracing::{info, instrument, warn};

pub use compose::compose;
pub use config::RenderConfig;
pub use error::{RenderError, RenderResult};
pub use fetch::{fetch_tiles, FetchedTiles};

/// A finished map.
#[derive(Debug, Clone)]
pub struct RouteMap {
    /// PNG-encoded image
    pub png: Bytes,
    pub width: u32,
    pub height: u32,
    /// Tiles the map was built from
    pub tile_rect: TileRect,
    /// Tiles that were unavailable or late
    pub missing_tiles: usize,
}

impl RouteMap {
    /// File name used when the map is attached to a message.
    pub const FILENAME: &'static str = "route.png";

    pub fn is_complete(&self) -> bool {
        self.missing_tiles == 0
    }

    pub fn into_bytes(self) -> Bytes {
        self.png
    }
}

/// Renders routes over tiles from one source.
#[derive(Clone)]
pub struct RouteMapRenderer {
    source: Arc<dyn TileSource>,
    config: RenderConfig,
}

impl RouteMapRenderer {
    pub fn new(source: Arc<dyn TileSource>, config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        Ok(Self { source, config })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// The tile rectangle a route would be drawn over.
    pub fn tile_rect(&self, bounds: &GeoBounds) -> TileRect {
        TileRect::covering(bounds, self.config.zoom)
    }

    /// Render from raw `[lat, lng]` pairs.
    pub async fn render_pairs(&self, pairs: &[[f64; 2]]) -> RenderResult<RouteMap> {
        let route = Route::from_pairs(pairs)?;
        self.render(&route).await
    }

    /// Render from waypoints that have not been validated yet.
    pub async fn render_waypoints(&self, points: &[Waypoint]) -> RenderResult<RouteMap> {
        let route = Route::new(points.to_vec())?;
        self.render(&route).await
    }

    #[instrument(
        skip_all,
        fields(points = route.len(), zoom = self.config.zoom, source = self.source.name())
    )]
    pub async fn render(&self, route: &Route) -> RenderResult<RouteMap> {
        let started = Instant::now();
        counter!("route_map_renders_total").increment(1);

        let result = self.render_inner(route).await;

        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        histogram!("route_map_render_duration_ms").record(elapsed_ms);
        match &result {
            Ok(map) => info!(
                tiles = map.tile_rect.len(),
                missing = map.missing_tiles,
                bytes = map.png.len(),
                "Rendered route map"
            ),
            Err(e) => {
                counter!("route_map_render_errors_total", "kind" => e.kind()).increment(1);
                warn!(error = %e, "Route map render failed");
            }
        }
        result
    }

    async fn render_inner(&self, route: &Route) -> RenderResult<RouteMap> {
        let rect = self.tile_rect(&route.bounds());

        let fetched = fetch_tiles(
            self.source.as_ref(),
            &rect,
            self.config.max_concurrent_fetches,
            self.config.max_tiles,
            self.config.deadline(),
        )
        .await;

        let map = compose(route, &rect, &fetched.tiles, &self.config)?;
        let png = png::encode_pixmap(&map)?;

        Ok(RouteMap {
            png: Bytes::from(png),
            width: map.width(),
            height: map.height(),
            tile_rect: rect,
            missing_tiles: fetched.missing,
        })
    }
}

impl std::fmt::Debug for RouteMapRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteMapRenderer")
            .field("source", &self.source.name())
            .field("config", &self.config)
            .finish()
    }
}
