//! Render settings.

use std::time::Duration;

use route_common::Color;
use serde::{Deserialize, Serialize};

use crate::error::RenderError;

/// Highest zoom level public tile servers publish.
pub const MAX_TILE_ZOOM: u32 = 22;

/// Largest tile slot edge accepted in pixels.
pub const MAX_TILE_SIZE: u32 = 4096;

/// Everything that shapes a route map. Defaults give an 800x600 map at
/// zoom 14 with a blue route, a green start marker and a red end marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Tile zoom level
    pub zoom: u32,
    /// Edge length of a tile slot in pixels
    pub tile_size: u32,
    /// Output width in pixels
    pub width: u32,
    /// Output height in pixels
    pub height: u32,
    pub route_color: Color,
    /// Route stroke width in pixels
    pub route_width: f32,
    pub marker_radius: f32,
    pub start_color: Color,
    pub end_color: Color,
    /// Draw "A"/"B" next to the markers
    pub labels: bool,
    /// Label glyph height in pixels
    pub label_size: f32,
    /// Fill behind the basemap; `None` leaves missing tiles transparent
    pub background: Option<Color>,
    /// Tile requests in flight at once
    pub max_concurrent_fetches: usize,
    /// Most tiles requested for one render; slots past it stay blank
    pub max_tiles: usize,
    /// Overall budget for tile acquisition in milliseconds
    pub deadline_ms: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            zoom: 14,
            tile_size: 256,
            width: 800,
            height: 600,
            route_color: Color::text("#0066ff"),
            route_width: 4.0,
            marker_radius: 8.0,
            start_color: Color::text("green"),
            end_color: Color::text("red"),
            labels: true,
            label_size: 10.0,
            background: None,
            max_concurrent_fetches: 4,
            max_tiles: 2048,
            deadline_ms: None,
        }
    }
}

impl RenderConfig {
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.zoom > MAX_TILE_ZOOM {
            return Err(RenderError::Config(format!(
                "zoom {} exceeds {}",
                self.zoom, MAX_TILE_ZOOM
            )));
        }
        if self.tile_size == 0 || self.tile_size > MAX_TILE_SIZE {
            return Err(RenderError::Config(format!(
                "tile_size {} outside 1..={}",
                self.tile_size, MAX_TILE_SIZE
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::Config("width and height must be > 0".to_string()));
        }
        let strokes_ok =
            self.route_width > 0.0 && self.marker_radius >= 0.0 && self.label_size > 0.0;
        if !strokes_ok {
            return Err(RenderError::Config(
                "route_width and label_size must be > 0, marker_radius >= 0".to_string(),
            ));
        }
        if self.max_concurrent_fetches == 0 {
            return Err(RenderError::Config("max_concurrent_fetches must be > 0".to_string()));
        }
        if self.max_tiles == 0 {
            return Err(RenderError::Config("max_tiles must be > 0".to_string()));
        }
        Ok(())
    }
}
