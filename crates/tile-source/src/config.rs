//! Tile source configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Settings for where tiles come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileSourceConfig {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders
    pub url_template: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Connect timeout in seconds
    pub connect_timeout_secs: u64,
    /// User-Agent header; public OSM servers reject requests without one
    pub user_agent: String,
    /// Read tiles from a `{z}/{x}/{y}.png` tree instead of HTTP
    pub directory: Option<PathBuf>,
}

impl Default for TileSourceConfig {
    fn default() -> Self {
        Self {
            url_template: "https://tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            timeout_secs: 10,
            connect_timeout_secs: 5,
            user_agent: concat!("route-map/", env!("CARGO_PKG_VERSION")).to_string(),
            directory: None,
        }
    }
}

impl TileSourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Check the template addresses all three tile axes.
    pub fn validate(&self) -> Result<(), String> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.url_template.contains(placeholder) {
                return Err(format!(
                    "url_template '{}' is missing {}",
                    self.url_template, placeholder
                ));
            }
        }
        if self.timeout_secs == 0 {
            return Err("timeout_secs must be > 0".to_string());
        }
        Ok(())
    }
}
