//! The work behind each subcommand.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use invoice::{InvoiceAssembler, InvoiceMessage, MailTransport, Order};
use renderer::{RouteMap, RouteMapRenderer};
use route_common::Route;
use tile_source::{
    DirectoryTileSource, HttpTileSource, NullTileSource, TileSource, TileSourceConfig,
};
use tracing::info;

/// Parse a `lat,lng` command-line point.
pub fn parse_point(s: &str) -> Result<[f64; 2], String> {
    let (lat, lng) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LNG, got '{}'", s))?;
    let lat: f64 = lat.trim().parse().map_err(|_| format!("invalid latitude '{}'", lat))?;
    let lng: f64 = lng.trim().parse().map_err(|_| format!("invalid longitude '{}'", lng))?;
    Ok([lat, lng])
}

/// Pick the tile source: nothing when offline, a local tree when one is
/// configured, otherwise HTTP.
pub fn build_tile_source(config: &TileSourceConfig, offline: bool) -> Result<Arc<dyn TileSource>> {
    if offline {
        return Ok(Arc::new(NullTileSource));
    }
    if let Some(dir) = &config.directory {
        if !dir.is_dir() {
            bail!("Tile directory does not exist: {}", dir.display());
        }
        return Ok(Arc::new(DirectoryTileSource::new(dir)));
    }

    config.validate().map_err(anyhow::Error::msg)?;
    let source = HttpTileSource::new(config).context("Failed to build HTTP tile client")?;
    Ok(Arc::new(source))
}

/// Read a route from a JSON file of `[lat, lng]` pairs.
pub fn load_route(path: &Path) -> Result<Route> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read route file: {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid route in {}", path.display()))
}

pub fn load_order(path: &Path) -> Result<Order> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read order file: {}", path.display()))?;
    Order::from_json(&content).with_context(|| format!("Invalid order in {}", path.display()))
}

/// Render `route` and write the PNG to `output`.
pub async fn render_to_file(
    renderer: &RouteMapRenderer,
    route: &Route,
    output: &Path,
) -> Result<RouteMap> {
    let map = renderer.render(route).await.context("Failed to render route map")?;

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    tokio::fs::write(output, &map.png)
        .await
        .with_context(|| format!("Failed to write {}", output.display()))?;

    info!(
        output = %output.display(),
        tiles = map.tile_rect.len(),
        missing = map.missing_tiles,
        "Route map written"
    );
    Ok(map)
}

/// Assemble the invoice for an order file and send it.
pub async fn send_invoice(
    assembler: &InvoiceAssembler,
    order_path: &Path,
    transport: &dyn MailTransport,
) -> Result<InvoiceMessage> {
    let order = load_order(order_path)?;
    assembler
        .dispatch(&order, transport)
        .await
        .with_context(|| format!("Failed to send invoice for {}", order_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use invoice::{MailConfig, OutboxTransport};
    use renderer::RenderConfig;
    use test_utils::decode_png;
    use test_utils::orders::FULL_ORDER_JSON;

    #[test]
    fn test_parse_point() {
        assert_eq!(parse_point("50.45,30.52").unwrap(), [50.45, 30.52]);
        assert_eq!(parse_point(" 50.45 , 30.52 ").unwrap(), [50.45, 30.52]);
        assert!(parse_point("50.45").is_err());
        assert!(parse_point("north,30").is_err());
    }

    #[test]
    fn test_build_tile_source() {
        let config = TileSourceConfig::default();
        assert_eq!(build_tile_source(&config, true).unwrap().name(), "null");
        assert_eq!(build_tile_source(&config, false).unwrap().name(), "http");

        let tiles = tempfile::tempdir().unwrap();
        let local = TileSourceConfig {
            directory: Some(tiles.path().to_path_buf()),
            ..Default::default()
        };
        assert_eq!(build_tile_source(&local, false).unwrap().name(), "directory");

        let missing = TileSourceConfig {
            directory: Some(tiles.path().join("absent")),
            ..Default::default()
        };
        assert!(build_tile_source(&missing, false).is_err());

        let bad_template = TileSourceConfig {
            url_template: "https://tiles.example.com/{z}/{x}.png".to_string(),
            ..Default::default()
        };
        assert!(build_tile_source(&bad_template, false).is_err());
    }

    #[test]
    fn test_load_route() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("route.json");
        std::fs::write(&good, "[[50.45, 30.52], [50.40, 30.60]]").unwrap();
        assert_eq!(load_route(&good).unwrap().len(), 2);

        let short = dir.path().join("short.json");
        std::fs::write(&short, "[[50.45, 30.52]]").unwrap();
        assert!(load_route(&short).is_err());

        assert!(load_route(&dir.path().join("absent.json")).is_err());
    }

    fn offline_renderer() -> RouteMapRenderer {
        RouteMapRenderer::new(Arc::new(NullTileSource), RenderConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_render_to_file_offline() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("maps/route.png");
        let renderer = offline_renderer();
        let route = Route::from_pairs(&[[50.45, 30.52], [50.40, 30.60]]).unwrap();

        let map = render_to_file(&renderer, &route, &output).await.unwrap();
        assert_eq!(map.missing_tiles, 25);

        let written = std::fs::read(&output).unwrap();
        assert_eq!(decode_png(&written).dimensions(), (800, 600));
    }

    #[tokio::test]
    async fn test_send_invoice_to_outbox() {
        let dir = tempfile::tempdir().unwrap();
        let order_path = dir.path().join("order.json");
        std::fs::write(&order_path, FULL_ORDER_JSON).unwrap();

        let mail = MailConfig {
            carrier: "carrier@example.com".to_string(),
            ..Default::default()
        };
        let renderer = offline_renderer();
        let assembler = InvoiceAssembler::new(mail).with_renderer(renderer);
        let outbox = OutboxTransport::new(dir.path().join("outbox"));

        let message = send_invoice(&assembler, &order_path, &outbox).await.unwrap();
        let message_dir = outbox.message_dir(&message);
        assert!(message_dir.join("message.html").is_file());
        assert!(message_dir.join("route.png").is_file());
    }
}
