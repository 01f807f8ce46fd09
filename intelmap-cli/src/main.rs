use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use intelmap::{
    extract::scan_symbols,
    tiles::{lat_to_tile, lng_to_tile, point_to_tile_id},
    IntelConfig, LatLngBounds, Notification, Notifier, Session, Severity, SymbolTable,
};
use std::{path::PathBuf, sync::Arc};

/// Inspect intel map tile parameters
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Options {
    /// JSON snapshot of the intel page's globals
    #[arg(long, global = true)]
    symbols: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Version token to use when the snapshot holds none
    #[arg(long, global = true)]
    version_token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print what a scan of the snapshot finds, without requiring a version
    Scan,
    /// Print the map zoom to data zoom table
    Zooms,
    /// Print the data tile id containing a point
    Tile {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Display zoom
        #[arg(long)]
        zoom: u32,
    },
    /// Print the data tile ids covering a bounding box
    Bounds {
        #[arg(long, allow_hyphen_values = true)]
        south: f64,
        #[arg(long, allow_hyphen_values = true)]
        west: f64,
        #[arg(long, allow_hyphen_values = true)]
        north: f64,
        #[arg(long, allow_hyphen_values = true)]
        east: f64,
        /// Display zoom
        #[arg(long)]
        zoom: u32,
    },
}

/// Prints notifications to stderr, where a browser would show a dialog.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: &Notification) {
        let label = match notification.severity {
            Severity::Warning => "warning",
            Severity::Fatal => "error",
        };
        eprintln!("{}: {}\n  {}", label, notification.title, notification.message);
    }
}

fn load_symbols(options: &Options) -> Result<SymbolTable> {
    match &options.symbols {
        Some(path) => SymbolTable::from_path(path)
            .with_context(|| format!("reading symbol snapshot {}", path.display())),
        None => Ok(SymbolTable::new()),
    }
}

fn load_config(options: &Options) -> Result<IntelConfig> {
    let mut config = match &options.config {
        Some(path) => IntelConfig::from_path(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => IntelConfig::default(),
    };
    if let Some(token) = &options.version_token {
        config = config.with_version_override(token.clone());
    }
    Ok(config)
}

fn start_session(options: &Options) -> Result<Session> {
    let session = Session::builder()
        .with_config(load_config(options)?)
        .with_symbols(load_symbols(options)?)
        .with_notifier(Arc::new(ConsoleNotifier))
        .build()
        .context("startup failed")?;
    Ok(session)
}

fn main() -> Result<()> {
    env_logger::init();
    let options = Options::parse();

    match &options.command {
        Command::Scan => {
            let found = scan_symbols(&load_symbols(&options)?);
            let report = serde_json::json!({
                "current_version": found.current_version,
                "zoom_to_level": found.zoom_to_level,
                "tiles_per_edge": found.tiles_per_edge,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Command::Zooms => {
            let session = start_session(&options)?;
            println!("map zoom  data zoom  level  tiles/edge  min link  portals");
            for row in session.resolver().zoom_table() {
                let p = row.params;
                println!(
                    "{:>8}  {:>9}  {:>5}  {:>10}  {:>8}  {}",
                    row.map_zoom,
                    row.data_zoom,
                    p.level,
                    p.tiles_per_edge,
                    p.min_link_length,
                    if p.has_portals { "yes" } else { "no" }
                );
            }
        }
        Command::Tile { lat, lng, zoom } => {
            let session = start_session(&options)?;
            let params = session.data_zoom_tile_parameters(Some(*zoom), zoom);
            let (x, y) = (lng_to_tile(*lng, &params), lat_to_tile(*lat, &params));
            println!("{}", point_to_tile_id(&params, x, y));
        }
        Command::Bounds {
            south,
            west,
            north,
            east,
            zoom,
        } => {
            let session = start_session(&options)?;
            let bounds = LatLngBounds::from_coords(*south, *west, *north, *east);
            let tiles = session.data_tiles(&bounds, *zoom)?;
            log::info!("{} tiles cover the bounds", tiles.len());
            for tile in tiles {
                println!("{}", tile.id);
            }
        }
    }

    Ok(())
}
