//! CLI entry point for the fleet trip auditor.
//!
//! Provides subcommands for running the full fleet audit, listing classified
//! vehicles, listing raw vendor groups, and analyzing a single trip source.

mod infra;

use crate::infra::mygeotab::client::GeotabClient;
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fleet_trip_auditor::{
    analyzers::analyzer::{FleetOptions, analyze_device, analyze_fleet},
    classify::{Depot, GroupMap, VehicleType, resolve_vehicle},
    host::{ConsoleHost, Host, StatusLevel},
    output::{append_report_rows, print_json},
    services::telematics::{TelematicsApi, Trip},
    stats::TripAnalysis,
};
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "fleet_trip_auditor")]
#[command(about = "A tool to audit fleet telematics trip data for realism", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full fleet audit: classify, pull trips, summarize
    Audit {
        /// Days of trip history to pull
        #[arg(long, default_value_t = 14)]
        days: i64,

        /// Maximum number of devices to fetch
        #[arg(long, default_value_t = 100)]
        device_limit: u32,

        /// Maximum trips to fetch per vehicle
        #[arg(long, default_value_t = 500)]
        trip_limit: u32,

        /// Maximum number of concurrent trip fetches
        #[arg(short, long, default_value_t = 8)]
        concurrency: usize,

        /// Path to a JSON group-id mapping (defaults to the built-in table)
        #[arg(long)]
        groups_config: Option<String>,

        /// CSV file to append per-vehicle result rows to
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Fetch and classify the device list without pulling trips
    Vehicles {
        /// Maximum number of devices to fetch
        #[arg(long, default_value_t = 100)]
        device_limit: u32,

        /// Path to a JSON group-id mapping (defaults to the built-in table)
        #[arg(long)]
        groups_config: Option<String>,
    },
    /// List raw vendor groups (for building a groups-config mapping)
    Groups {
        /// Maximum number of groups to fetch
        #[arg(short, long, default_value_t = 100)]
        limit: u32,
    },
    /// Analyze trips for one device id, or a local JSON file of trips
    Trips {
        /// Device id to fetch from the API, or path to a JSON trip array
        #[arg(value_name = "SOURCE")]
        source: String,

        /// Days of trip history to pull
        #[arg(long, default_value_t = 14)]
        days: i64,

        /// Maximum trips to fetch
        #[arg(long, default_value_t = 500)]
        trip_limit: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/fleet_trip_auditor.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("fleet_trip_auditor.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Audit {
            days,
            device_limit,
            trip_limit,
            concurrency,
            groups_config,
            output,
        } => {
            let map = load_group_map(groups_config.as_deref())?;
            let host = ConsoleHost;

            let api: Arc<dyn TelematicsApi> = Arc::new(connect().await?);
            host.status(StatusLevel::Ok, "Connected to MyGeotab");

            let opts = FleetOptions {
                lookback_days: days,
                device_limit,
                trip_limit,
                concurrency,
            };
            let report = analyze_fleet(api, &host, &map, &opts).await?;

            if let Some(path) = output {
                append_report_rows(&path, &report)?;
                info!(path, rows = report.vehicles.len(), "Result rows appended");
            }
        }
        Commands::Vehicles {
            device_limit,
            groups_config,
        } => {
            let map = load_group_map(groups_config.as_deref())?;
            let api = connect().await?;

            let devices = api.get_devices(Some(device_limit)).await?;
            let vehicles: Vec<_> = devices.iter().map(|d| resolve_vehicle(&map, d)).collect();

            info!(total = vehicles.len(), "Device list fetched");

            for v in &vehicles {
                let in_fleet = v.vehicle_type != VehicleType::Unknown;
                info!(
                    name = %v.name,
                    vehicle_type = %v.vehicle_type,
                    depot = %v.depot,
                    device_id = %v.id,
                    in_fleet,
                    "Vehicle"
                );
            }

            let count_type =
                |t: VehicleType| vehicles.iter().filter(|v| v.vehicle_type == t).count();
            let fleet = vehicles.len() - count_type(VehicleType::Unknown);
            let depot_north = vehicles.iter().filter(|v| v.depot == Depot::North).count();
            let depot_south = vehicles.iter().filter(|v| v.depot == Depot::South).count();

            info!(
                total = vehicles.len(),
                fleet,
                unknown = count_type(VehicleType::Unknown),
                vans = count_type(VehicleType::Van),
                pickups = count_type(VehicleType::Pickup),
                backhoes = count_type(VehicleType::Backhoe),
                depot_north,
                depot_south,
                "Classification summary"
            );
        }
        Commands::Groups { limit } => {
            let api = connect().await?;
            let groups = api.get_groups(Some(limit)).await?;

            info!(total = groups.len(), "Group list fetched");

            for group in &groups {
                info!(
                    group_id = %group.id,
                    name = group.name.as_deref().unwrap_or("-"),
                    "Group"
                );
            }
        }
        Commands::Trips {
            source,
            days,
            trip_limit,
        } => {
            let analysis = if Path::new(&source).is_file() {
                let content = std::fs::read_to_string(&source)
                    .with_context(|| format!("reading trip file {source}"))?;
                let trips: Vec<Trip> = serde_json::from_str(&content)
                    .with_context(|| format!("parsing trip file {source}"))?;
                TripAnalysis::from_trips(&trips)
            } else {
                let api = connect().await?;
                analyze_device(&api, &source, days, trip_limit).await?
            };

            print_json(&analysis)?;
        }
    }

    Ok(())
}

/// Authenticates against the vendor using credentials from the environment.
async fn connect() -> Result<GeotabClient> {
    let server = std::env::var("GEOTAB_SERVER").expect("GEOTAB_SERVER must be set");
    let database = std::env::var("GEOTAB_DATABASE").expect("GEOTAB_DATABASE must be set");
    let username = std::env::var("GEOTAB_USERNAME").expect("GEOTAB_USERNAME must be set");
    let password = std::env::var("GEOTAB_PASSWORD").expect("GEOTAB_PASSWORD must be set");

    GeotabClient::new(&server, &database, &username, &password).await
}

fn load_group_map(path: Option<&str>) -> Result<GroupMap> {
    match path {
        Some(path) => GroupMap::load(path),
        None => Ok(GroupMap::default()),
    }
}
