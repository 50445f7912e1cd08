//! Common types shared across the route-map crates.

pub mod bbox;
pub mod error;
pub mod style;
pub mod tile;
pub mod waypoint;

pub use bbox::GeoBounds;
pub use error::{RouteError, RouteResult};
pub use style::Color;
pub use tile::TileCoord;
pub use waypoint::{Route, Waypoint};
