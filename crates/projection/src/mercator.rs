//! Spherical Web-Mercator (EPSG:3857) in tile units.

use std::f64::consts::PI;

use route_common::Waypoint;

/// Latitude at which the Mercator square ends (atan(sinh(pi))).
pub const MAX_LATITUDE: f64 = 85.05112877980659;

/// Highest zoom level supported by tile math here.
pub const MAX_ZOOM: u32 = 30;

/// A fractional position on the tile grid at some zoom level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TilePoint {
    pub x: f64,
    pub y: f64,
}

/// Number of tiles along one axis at `zoom` (2^zoom).
pub fn tile_count(zoom: u32) -> f64 {
    2f64.powi(zoom.min(MAX_ZOOM) as i32)
}

/// Project a latitude/longitude onto fractional tile coordinates.
///
/// ```text
/// x = (lng + 180) / 360 * 2^zoom
/// y = (1 - ln(tan(lat) + sec(lat)) / pi) / 2 * 2^zoom
/// ```
///
/// Latitude is clamped to `±MAX_LATITUDE` so the result stays finite at and
/// beyond the poles. Longitude is used as given.
pub fn project_to_tile(lat: f64, lng: f64, zoom: u32) -> TilePoint {
    let n = tile_count(zoom);
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();

    let x = (lng + 180.0) / 360.0 * n;
    let y = (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0 * n;

    TilePoint { x, y }
}

/// Inverse of [`project_to_tile`]: the geographic position of a tile-grid point.
pub fn tile_to_lat_lng(x: f64, y: f64, zoom: u32) -> Waypoint {
    let n = tile_count(zoom);
    let lng = x / n * 360.0 - 180.0;
    let lat = (PI * (1.0 - 2.0 * y / n)).sinh().atan().to_degrees();
    Waypoint::new(lat, lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_maps_to_grid_center() {
        for zoom in [0, 1, 5, 14, 20] {
            let p = project_to_tile(0.0, 0.0, zoom);
            let half = tile_count(zoom) / 2.0;
            assert_eq!(p.x, half);
            assert_eq!(p.y, half);
        }
    }

    #[test]
    fn test_pole_is_clamped() {
        let north = project_to_tile(90.0, 0.0, 2);
        let south = project_to_tile(-90.0, 0.0, 2);
        assert!(north.y.is_finite());
        assert!(south.y.is_finite());
        assert!(north.y.abs() < 1e-6);
        assert!((south.y - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_round_trip() {
        let p = project_to_tile(50.45, 30.52, 14);
        let back = tile_to_lat_lng(p.x, p.y, 14);
        assert!((back.lat - 50.45).abs() < 1e-9);
        assert!((back.lng - 30.52).abs() < 1e-9);
    }
}
