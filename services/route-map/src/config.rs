//! Configuration file loading.
//!
//! Every section is optional; missing keys fall back to their defaults.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use invoice::MailConfig;
use renderer::RenderConfig;
use serde::{Deserialize, Serialize};
use tile_source::TileSourceConfig;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub renderer: RenderConfig,
    pub tiles: TileSourceConfig,
    pub mail: MailConfig,
    pub lookups: LookupConfig,
}

/// Invoice enrichment from public APIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    pub enabled: bool,
    pub timeout_secs: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            timeout_secs: 5,
        }
    }
}

impl LookupConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl AppConfig {
    /// Load a configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Load `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_yaml() {
        let yaml = r##"
renderer:
  zoom: 13
  route_color: "#ff0000"
  deadline_ms: 2000
tiles:
  directory: /srv/tiles
mail:
  carrier: carrier@example.com
"##;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.renderer.zoom, 13);
        assert_eq!(config.renderer.width, 800);
        assert_eq!(config.renderer.deadline_ms, Some(2000));
        assert_eq!(config.tiles.directory.as_deref(), Some(Path::new("/srv/tiles")));
        assert_eq!(config.mail.carrier, "carrier@example.com");
        assert_eq!(config.mail.subject, "New delivery invoice");
        assert!(!config.lookups.enabled);
    }

    #[test]
    fn test_load_reports_path() {
        let missing = AppConfig::load(Path::new("/nonexistent/route-map.yaml")).unwrap_err();
        assert!(format!("{:#}", missing).contains("/nonexistent/route-map.yaml"));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "renderer: [not, a, map]").unwrap();
        let err = AppConfig::load(file.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_or_default() {
        assert_eq!(AppConfig::load_or_default(None).unwrap(), AppConfig::default());
    }

    #[test]
    fn test_sample_config_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/route-map.yaml");
        let config = AppConfig::load(&path).unwrap();
        assert!(config.renderer.validate().is_ok());
        assert!(config.tiles.validate().is_ok());
    }
}
