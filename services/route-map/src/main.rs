//! Route map service.
//!
//! - `render`: draw a route over map tiles and write `route.png`
//! - `invoice`: turn an order JSON into a carrier invoice in an outbox
//!   directory, with the route map attached when the order has a route

mod commands;
mod config;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use invoice::{InvoiceAssembler, Lookups, OutboxTransport};
use renderer::RouteMapRenderer;
use route_common::Route;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "route-map")]
#[command(about = "Render delivery routes onto map tiles and assemble carrier invoices")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// YAML configuration file
    #[arg(short, long, env = "ROUTE_MAP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Tile zoom level
    #[arg(long, global = true)]
    zoom: Option<u32>,

    /// Tile URL template with {z}, {x} and {y}
    #[arg(long, env = "TILE_URL", global = true)]
    tile_url: Option<String>,

    /// Read tiles from a local {z}/{x}/{y}.png tree
    #[arg(long, env = "TILES_DIR", global = true)]
    tiles_dir: Option<PathBuf>,

    /// Skip tile fetching and draw on a blank basemap
    #[arg(long, global = true)]
    offline: bool,

    /// Overall tile fetch budget in milliseconds
    #[arg(long, global = true)]
    deadline_ms: Option<u64>,

    /// Log level
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a route to a PNG file
    Render {
        /// JSON file holding [[lat, lng], ...]
        #[arg(long, conflicts_with = "points")]
        route: Option<PathBuf>,

        /// Route point as LAT,LNG (repeat in order)
        #[arg(long = "point", value_parser = commands::parse_point)]
        points: Vec<[f64; 2]>,

        /// Output file
        #[arg(short, long, default_value = "route.png")]
        output: PathBuf,
    },

    /// Assemble an invoice for an order and write it to an outbox
    Invoice {
        /// Order JSON file
        #[arg(long)]
        order: PathBuf,

        /// Outbox directory
        #[arg(long, default_value = "outbox")]
        outbox: PathBuf,

        /// Carrier mailbox
        #[arg(long, env = "CARRIER_EMAIL")]
        carrier: Option<String>,

        /// Sender mailbox
        #[arg(long, env = "MAIL_FROM")]
        from: Option<String>,

        /// Enrich the invoice from public currency and weather APIs
        #[arg(long)]
        lookups: bool,
    },
}

fn init_tracing(log_level: &str, json: bool) -> Result<()> {
    let level = match log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

/// Layer command-line overrides on top of the file configuration.
fn apply_overrides(config: &mut AppConfig, args: &Args) {
    if let Some(zoom) = args.zoom {
        config.renderer.zoom = zoom;
    }
    if let Some(deadline_ms) = args.deadline_ms {
        config.renderer.deadline_ms = Some(deadline_ms);
    }
    if let Some(url) = &args.tile_url {
        config.tiles.url_template = url.clone();
    }
    if let Some(dir) = &args.tiles_dir {
        config.tiles.directory = Some(dir.clone());
    }
    if let Command::Invoice { carrier, from, lookups, .. } = &args.command {
        if let Some(carrier) = carrier {
            config.mail.carrier = carrier.clone();
        }
        if from.is_some() {
            config.mail.from = from.clone();
        }
        if *lookups {
            config.lookups.enabled = true;
        }
    }
}

fn build_renderer(config: &AppConfig, offline: bool) -> Result<RouteMapRenderer> {
    let source = commands::build_tile_source(&config.tiles, offline)?;
    info!(source = source.name(), zoom = config.renderer.zoom, "Tile source ready");
    RouteMapRenderer::new(source, config.renderer.clone()).context("Invalid renderer configuration")
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_json)?;

    let mut config = AppConfig::load_or_default(args.config.as_deref())?;
    apply_overrides(&mut config, &args);

    let renderer = build_renderer(&config, args.offline)?;

    match &args.command {
        Command::Render { route, points, output } => {
            let route = match route {
                Some(path) => commands::load_route(path)?,
                None if points.is_empty() => {
                    bail!("Provide --route FILE or at least two --point LAT,LNG")
                }
                None => Route::from_pairs(points).context("Invalid route points")?,
            };
            let map = commands::render_to_file(&renderer, &route, output).await?;
            println!("{}", output.display());
            if !map.is_complete() {
                info!(missing = map.missing_tiles, "Some tiles were unavailable");
            }
        }
        Command::Invoice { order, outbox, .. } => {
            config.mail.validate().context("Set a carrier with --carrier or CARRIER_EMAIL")?;

            let lookups = if config.lookups.enabled {
                Lookups::online(config.lookups.timeout())
            } else {
                Lookups::none()
            };
            let assembler = InvoiceAssembler::new(config.mail.clone())
                .with_renderer(renderer)
                .with_lookups(lookups);
            let transport = OutboxTransport::new(outbox);

            let message = commands::send_invoice(&assembler, order, &transport).await?;
            println!("{}", transport.message_dir(&message).display());
        }
    }

    Ok(())
}
