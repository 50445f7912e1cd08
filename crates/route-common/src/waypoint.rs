//! Waypoints and validated routes.
//!
//! Waypoints serialize as `[lat, lng]` pairs, which is how order payloads
//! carry them. A [`Route`] can only be built from at least two finite,
//! in-range waypoints.

use serde::{Deserialize, Serialize};

use crate::bbox::GeoBounds;
use crate::error::{RouteError, RouteResult};

/// A geographic point in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Waypoint {
    pub lat: f64,
    pub lng: f64,
}

impl Waypoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Latitude within [-90, 90] and longitude within [-180, 180].
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

impl From<[f64; 2]> for Waypoint {
    fn from(pair: [f64; 2]) -> Self {
        Waypoint::new(pair[0], pair[1])
    }
}

impl From<Waypoint> for [f64; 2] {
    fn from(p: Waypoint) -> Self {
        [p.lat, p.lng]
    }
}

/// Check that a waypoint sequence is renderable.
pub fn validate_waypoints(points: &[Waypoint]) -> RouteResult<()> {
    if points.len() < Route::MIN_WAYPOINTS {
        return Err(RouteError::TooFewWaypoints {
            count: points.len(),
        });
    }

    for (index, p) in points.iter().enumerate() {
        if !p.is_finite() {
            return Err(RouteError::NonFinite { index });
        }
        if !p.in_range() {
            return Err(RouteError::OutOfRange {
                index,
                lat: p.lat,
                lng: p.lng,
            });
        }
    }

    Ok(())
}

/// An ordered sequence of at least two valid waypoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Waypoint>", into = "Vec<Waypoint>")]
pub struct Route {
    points: Vec<Waypoint>,
}

impl Route {
    pub const MIN_WAYPOINTS: usize = 2;

    pub fn new(points: Vec<Waypoint>) -> RouteResult<Self> {
        validate_waypoints(&points)?;
        Ok(Self { points })
    }

    /// Build a route from raw `[lat, lng]` pairs.
    pub fn from_pairs(pairs: &[[f64; 2]]) -> RouteResult<Self> {
        Self::new(pairs.iter().copied().map(Waypoint::from).collect())
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn start(&self) -> Waypoint {
        self.points[0]
    }

    pub fn end(&self) -> Waypoint {
        self.points[self.points.len() - 1]
    }

    pub fn bounds(&self) -> GeoBounds {
        let mut bounds = GeoBounds::from_point(self.start());
        for p in &self.points[1..] {
            bounds.extend(*p);
        }
        bounds
    }
}

impl TryFrom<Vec<Waypoint>> for Route {
    type Error = RouteError;

    fn try_from(points: Vec<Waypoint>) -> RouteResult<Self> {
        Route::new(points)
    }
}

impl From<Route> for Vec<Waypoint> {
    fn from(route: Route) -> Self {
        route.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_requires_two_points() {
        let err = Route::from_pairs(&[[50.0, 30.0]]).unwrap_err();
        assert_eq!(err, RouteError::TooFewWaypoints { count: 1 });

        let err = Route::new(Vec::new()).unwrap_err();
        assert_eq!(err, RouteError::TooFewWaypoints { count: 0 });
    }

    #[test]
    fn test_route_rejects_non_finite() {
        let err = Route::from_pairs(&[[50.0, 30.0], [f64::NAN, 30.0]]).unwrap_err();
        assert_eq!(err, RouteError::NonFinite { index: 1 });
        assert_eq!(err.waypoint_index(), Some(1));
    }

    #[test]
    fn test_route_rejects_out_of_range() {
        let err = Route::from_pairs(&[[50.0, 181.0], [50.0, 30.0]]).unwrap_err();
        assert!(matches!(err, RouteError::OutOfRange { index: 0, .. }));
    }

    #[test]
    fn test_route_start_end() {
        let route = Route::from_pairs(&[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]).unwrap();
        assert_eq!(route.start(), Waypoint::new(1.0, 2.0));
        assert_eq!(route.end(), Waypoint::new(5.0, 6.0));
        assert_eq!(route.len(), 3);
    }

    #[test]
    fn test_route_deserialize_from_pairs() {
        let route: Route = serde_json::from_str("[[50.45, 30.52], [50.40, 30.60]]").unwrap();
        assert_eq!(route.len(), 2);
        assert_eq!(route.end(), Waypoint::new(50.40, 30.60));
    }

    #[test]
    fn test_route_deserialize_rejects_single_point() {
        let result: Result<Route, _> = serde_json::from_str("[[50.45, 30.52]]");
        assert!(result.is_err());
    }
}
