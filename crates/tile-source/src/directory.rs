//! Tiles from a local `{z}/{x}/{y}.<ext>` tree, for offline rendering.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use route_common::TileCoord;
use tracing::instrument;

use crate::error::TileError;
use crate::tile::TileImage;
use crate::{tile_or_absent, TileSource};

#[derive(Debug, Clone)]
pub struct DirectoryTileSource {
    root: PathBuf,
    extension: String,
}

impl DirectoryTileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            extension: "png".to_string(),
        }
    }

    /// Use a different file extension (e.g. `jpg`).
    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn tile_path(&self, coord: TileCoord) -> PathBuf {
        self.root
            .join(coord.z.to_string())
            .join(coord.x.to_string())
            .join(format!("{}.{}", coord.y, self.extension))
    }

    async fn try_fetch(&self, coord: TileCoord) -> Result<TileImage, TileError> {
        let bytes = tokio::fs::read(self.tile_path(coord)).await?;
        TileImage::decode(coord, &bytes)
    }
}

#[async_trait]
impl TileSource for DirectoryTileSource {
    #[instrument(skip(self), fields(tile = %coord))]
    async fn fetch_tile(&self, coord: TileCoord) -> Option<TileImage> {
        tile_or_absent(self.name(), coord, self.try_fetch(coord).await)
    }

    fn name(&self) -> &str {
        "directory"
    }
}
