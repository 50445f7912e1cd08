//! Error types for route validation.

use thiserror::Error;

/// Result type alias using RouteError.
pub type RouteResult<T> = Result<T, RouteError>;

/// Reasons a sequence of waypoints cannot be rendered as a route.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RouteError {
    #[error("Route needs at least 2 waypoints, got {count}")]
    TooFewWaypoints { count: usize },

    #[error("Waypoint {index} has a non-finite coordinate")]
    NonFinite { index: usize },

    #[error("Waypoint {index} is out of range: lat={lat}, lng={lng}")]
    OutOfRange { index: usize, lat: f64, lng: f64 },
}

impl RouteError {
    /// Index of the offending waypoint, if the error is about a single point.
    pub fn waypoint_index(&self) -> Option<usize> {
        match self {
            RouteError::TooFewWaypoints { .. } => None,
            RouteError::NonFinite { index } | RouteError::OutOfRange { index, .. } => Some(*index),
        }
    }
}
