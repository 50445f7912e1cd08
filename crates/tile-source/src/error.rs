//! Reasons a tile could not be supplied.

use thiserror::Error;

/// Why a tile is missing. Never escapes a [`crate::TileSource`]; it only
/// feeds logs and metrics.
#[derive(Debug, Error)]
pub enum TileError {
    #[error("Tile request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Tile server returned HTTP {status}")]
    Status { status: u16 },

    #[error("Tile not found")]
    NotFound,

    #[error("Tile image could not be decoded: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Tile image is empty")]
    Empty,

    #[error("Tile read failed: {0}")]
    Io(std::io::Error),
}

impl TileError {
    /// Metric label for this failure class.
    pub fn reason(&self) -> &'static str {
        match self {
            TileError::Transport(_) => "transport",
            TileError::Status { .. } => "status",
            TileError::NotFound => "not_found",
            TileError::Decode(_) | TileError::Empty => "decode",
            TileError::Io(_) => "io",
        }
    }
}

impl From<std::io::Error> for TileError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            TileError::NotFound
        } else {
            TileError::Io(err)
        }
    }
}
