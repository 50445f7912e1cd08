//! Slippy-map tile addressing.

use serde::{Deserialize, Serialize};

/// A tile coordinate (z/x/y) in the standard XYZ scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    /// Zoom level
    pub z: u32,
    /// Column (x), growing eastward
    pub x: u32,
    /// Row (y), growing southward
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u32, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Path fragment `z/x/y`, used for logging and on-disk layouts.
    pub fn path(&self) -> String {
        format!("{}/{}/{}", self.z, self.x, self.y)
    }

    /// Substitute `{z}`, `{x}` and `{y}` in a tile URL template.
    pub fn fill_template(&self, template: &str) -> String {
        template
            .replace("{z}", &self.z.to_string())
            .replace("{x}", &self.x.to_string())
            .replace("{y}", &self.y.to_string())
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}
