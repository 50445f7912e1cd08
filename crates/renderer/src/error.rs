//! Error types for route map rendering.

use route_common::RouteError;
use thiserror::Error;

/// Result type alias using RenderError.
pub type RenderResult<T> = Result<T, RenderError>;

/// Hard failures of a render. Missing tiles are not errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid route: {0}")]
    InvalidRoute(#[from] RouteError),

    #[error("Invalid render configuration: {0}")]
    Config(String),

    #[error("Canvas allocation failed for {width}x{height}")]
    Canvas { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    Encoding(String),
}

impl RenderError {
    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            RenderError::InvalidRoute(_) => "invalid_route",
            RenderError::Config(_) => "config",
            RenderError::Canvas { .. } => "canvas",
            RenderError::Encoding(_) => "encoding",
        }
    }
}
