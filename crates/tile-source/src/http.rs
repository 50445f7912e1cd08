//! Tiles from an XYZ HTTP tile server.

use async_trait::async_trait;
use reqwest::Client;
use route_common::TileCoord;
use tracing::{debug, instrument};

use crate::config::TileSourceConfig;
use crate::error::TileError;
use crate::tile::TileImage;
use crate::{tile_or_absent, TileSource};

/// Fetches tiles with one GET per tile. No retries: a failed tile is
/// reported missing.
#[derive(Debug, Clone)]
pub struct HttpTileSource {
    client: Client,
    url_template: String,
}

impl HttpTileSource {
    /// Create a source with its own HTTP client built from `config`.
    pub fn new(config: &TileSourceConfig) -> Result<Self, TileError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .pool_max_idle_per_host(4)
            .tcp_nodelay(true)
            .build()?;

        Ok(Self::with_client(client, config.url_template.clone()))
    }

    /// Create a source sharing an existing client.
    pub fn with_client(client: Client, url_template: impl Into<String>) -> Self {
        Self {
            client,
            url_template: url_template.into(),
        }
    }

    pub fn tile_url(&self, coord: TileCoord) -> String {
        coord.fill_template(&self.url_template)
    }

    async fn try_fetch(&self, coord: TileCoord) -> Result<TileImage, TileError> {
        let url = self.tile_url(coord);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TileError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await?;
        debug!(url = %url, bytes = body.len(), "Fetched tile");
        TileImage::decode(coord, &body)
    }
}

#[async_trait]
impl TileSource for HttpTileSource {
    #[instrument(skip(self), fields(tile = %coord))]
    async fn fetch_tile(&self, coord: TileCoord) -> Option<TileImage> {
        tile_or_absent(self.name(), coord, self.try_fetch(coord).await)
    }

    fn name(&self) -> &str {
        "http"
    }
}
