//! Tests for route bounds and tile addressing.

use route_common::{GeoBounds, Route, TileCoord, Waypoint};

// ============================================================================
// GeoBounds tests
// ============================================================================

#[test]
fn test_bounds_of_empty_slice() {
    assert!(GeoBounds::of(&[]).is_none());
}

#[test]
fn test_bounds_of_single_point_is_degenerate() {
    let p = Waypoint::new(50.0, 30.0);
    let bounds = GeoBounds::of(&[p]).unwrap();
    assert_eq!(bounds.min_lat, bounds.max_lat);
    assert_eq!(bounds.min_lng, bounds.max_lng);
    assert_eq!(bounds.north_west(), p);
    assert_eq!(bounds.south_east(), p);
}

#[test]
fn test_bounds_corners() {
    let route = Route::from_pairs(&[[50.45, 30.52], [50.40, 30.60]]).unwrap();
    let bounds = route.bounds();

    assert_eq!(bounds.north_west(), Waypoint::new(50.45, 30.52));
    assert_eq!(bounds.south_east(), Waypoint::new(50.40, 30.60));
}

#[test]
fn test_bounds_contains_every_waypoint() {
    let route = Route::from_pairs(&[[10.0, 20.0], [-5.0, 25.0], [3.0, -7.5], [0.0, 0.0]]).unwrap();
    let bounds = route.bounds();

    for p in route.waypoints() {
        assert!(bounds.contains(*p));
    }
    assert!(!bounds.contains(Waypoint::new(11.0, 0.0)));
}

#[test]
fn test_bounds_center() {
    let bounds = GeoBounds::of(&[Waypoint::new(0.0, 0.0), Waypoint::new(10.0, 20.0)]).unwrap();
    assert_eq!(bounds.center(), Waypoint::new(5.0, 10.0));
}

// ============================================================================
// TileCoord tests
// ============================================================================

#[test]
fn test_tile_path() {
    assert_eq!(TileCoord::new(14, 9584, 5538).path(), "14/9584/5538");
}

#[test]
fn test_tile_fill_template() {
    let coord = TileCoord::new(3, 4, 5);
    assert_eq!(
        coord.fill_template("https://tile.example.org/{z}/{x}/{y}.png"),
        "https://tile.example.org/3/4/5.png"
    );
    assert_eq!(coord.fill_template("/tiles?x={x}&y={y}&z={z}"), "/tiles?x=4&y=5&z=3");
}
