//! Map tile acquisition.
//!
//! A [`TileSource`] turns a tile coordinate into a decoded image or nothing.
//! Every failure (transport error, non-2xx status, unreadable file,
//! undecodable body) is logged and counted here and reported to the caller
//! as a missing tile, so a render never aborts on a single bad tile.

pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod tile;

use async_trait::async_trait;
use metrics::counter;
use route_common::TileCoord;
use tracing::warn;

pub use config::TileSourceConfig;
pub use directory::DirectoryTileSource;
pub use error::TileError;
pub use http::HttpTileSource;
pub use tile::TileImage;

/// Anything that can supply map tiles by coordinate.
#[async_trait]
pub trait TileSource: Send + Sync {
    /// Fetch one tile. `None` means the tile is unavailable for any reason.
    async fn fetch_tile(&self, coord: TileCoord) -> Option<TileImage>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}

/// A source with no tiles at all; renders get a blank basemap.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullTileSource;

#[async_trait]
impl TileSource for NullTileSource {
    async fn fetch_tile(&self, _coord: TileCoord) -> Option<TileImage> {
        None
    }

    fn name(&self) -> &str {
        "null"
    }
}

/// Convert a fetch result into the optional tile, recording why a tile is missing.
pub(crate) fn tile_or_absent(
    source: &str,
    coord: TileCoord,
    result: Result<TileImage, TileError>,
) -> Option<TileImage> {
    counter!("route_map_tile_requests_total").increment(1);
    match result {
        Ok(tile) => Some(tile),
        Err(e) => {
            counter!("route_map_tiles_missing_total", "reason" => e.reason()).increment(1);
            warn!(source = source, tile = %coord, error = %e, "Tile unavailable");
            None
        }
    }
}
