//! Web-Mercator projection for slippy-map tiles.
//!
//! Maps geographic coordinates onto the fractional tile grid used by
//! standard web tile servers, resolves the tile rectangle covering a route,
//! and maps points onto a fixed-size output canvas.

pub mod mercator;
pub mod tile_rect;
pub mod viewport;

pub use mercator::{project_to_tile, tile_count, tile_to_lat_lng, TilePoint, MAX_LATITUDE};
pub use tile_rect::TileRect;
pub use viewport::{PixelPoint, Viewport};
