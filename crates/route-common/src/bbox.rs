//! Geographic bounding boxes around routes.

use serde::{Deserialize, Serialize};

use crate::waypoint::Waypoint;

/// A latitude/longitude bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    /// Degenerate bounds around a single point.
    pub fn from_point(p: Waypoint) -> Self {
        Self {
            min_lat: p.lat,
            max_lat: p.lat,
            min_lng: p.lng,
            max_lng: p.lng,
        }
    }

    /// Bounds of all points, or `None` for an empty slice.
    pub fn of(points: &[Waypoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self::from_point(*first);
        for p in rest {
            bounds.extend(*p);
        }
        Some(bounds)
    }

    /// Grow the bounds to include `p`.
    pub fn extend(&mut self, p: Waypoint) {
        self.min_lat = self.min_lat.min(p.lat);
        self.max_lat = self.max_lat.max(p.lat);
        self.min_lng = self.min_lng.min(p.lng);
        self.max_lng = self.max_lng.max(p.lng);
    }

    /// North-west corner. Tile Y grows southward, so this corner owns the
    /// minimum tile X and minimum tile Y.
    pub fn north_west(&self) -> Waypoint {
        Waypoint::new(self.max_lat, self.min_lng)
    }

    /// South-east corner, owning the maximum tile X and Y.
    pub fn south_east(&self) -> Waypoint {
        Waypoint::new(self.min_lat, self.max_lng)
    }

    pub fn contains(&self, p: Waypoint) -> bool {
        p.lat >= self.min_lat
            && p.lat <= self.max_lat
            && p.lng >= self.min_lng
            && p.lng <= self.max_lng
    }

    pub fn center(&self) -> Waypoint {
        Waypoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}
