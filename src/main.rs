//! Device Map - telemetry CSV to interactive web map
//!
//! CLI commands:
//! - serve: Start HTTP server with the device checklist and map
//! - devices: List devices found in the telemetry file
//! - render: Print the map figure JSON for a selection

mod color;
mod config;
mod dataset;
mod filter;
mod logging;
mod page;
mod render;
mod server;
mod state;
mod timestamp;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "device_map")]
#[command(about = "Interactive map of device geolocation telemetry")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to map.yaml config
    #[arg(short, long, default_value = "map.yaml")]
    config: PathBuf,

    /// Semicolon-separated telemetry CSV (overrides DATA_FILE)
    #[arg(short, long)]
    data: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start HTTP server
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List devices with their assigned colors
    Devices,

    /// Print the figure JSON for the selected devices
    Render {
        /// Device id to include; repeat for several. Defaults to all devices.
        #[arg(long = "device")]
        devices: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging("logs")?;
    tracing::info!("Device Map starting up");

    let cli = Cli::parse();
    tracing::debug!("CLI args parsed: config={:?} data={:?}", cli.config, cli.data);

    let map = if cli.config.exists() {
        tracing::info!("Loading config from {:?}", cli.config);
        config::MapConfig::load(&cli.config)
            .with_context(|| format!("loading config {:?}", cli.config))?
    } else {
        tracing::warn!("Config file not found: {:?}, using defaults", cli.config);
        config::MapConfig::default()
    };

    let secrets = config::Secrets::load();
    if secrets.mapbox_token.is_none() {
        tracing::warn!("MAPBOX_ACCESS_TOKEN not set; map tiles will not load");
    }

    let data_path = cli.data.unwrap_or_else(|| PathBuf::from(&secrets.data_file));
    let dataset = dataset::Dataset::load(&data_path, &mut rand::thread_rng())
        .with_context(|| format!("loading telemetry {:?}", data_path))?;
    if dataset.is_empty() {
        tracing::warn!("Telemetry file {:?} has no records; the map will be empty", data_path);
    }

    let state = state::AppState::new(dataset, map, secrets.mapbox_token);

    match cli.command {
        Commands::Serve { port } => {
            server::serve(state, port.unwrap_or(secrets.port)).await?;
        }

        Commands::Devices => {
            list_devices(&state);
        }

        Commands::Render { devices } => {
            println!("{}", render_json(&state, devices)?);
        }
    }

    Ok(())
}

/// Figure JSON for the given devices, or all devices when none are named
fn render_json(state: &state::AppState, devices: Vec<String>) -> anyhow::Result<String> {
    let selection = if devices.is_empty() {
        filter::FilterSelection::all(&state.dataset)
    } else {
        filter::FilterSelection::from_ids(devices)
    };
    let figure = state.render(&selection);
    tracing::info!("Rendered {} points", figure.point_count());
    Ok(serde_json::to_string_pretty(&figure)?)
}

/// Print the device checklist
fn list_devices(state: &state::AppState) {
    let devices = state.devices();
    println!("Devices ({}):", devices.len());
    for device in devices {
        println!("  - {} {} ({} samples)", device.id, device.color, device.count);
    }
}
