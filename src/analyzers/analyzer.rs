use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use tokio::sync::Semaphore;
use tracing::{debug, error, info};

use crate::analyzers::aggregate::{sort_reports, summarize};
use crate::analyzers::types::{FleetReport, VehicleReport};
use crate::classify::{GroupMap, VehicleType, resolve_vehicle};
use crate::host::{Host, StatusLevel};
use crate::services::telematics::TelematicsApi;
use crate::stats::TripAnalysis;

/// Tunables for one audit run.
#[derive(Debug, Clone)]
pub struct FleetOptions {
    /// Days of trip history to pull (`fromDate` lower bound).
    pub lookback_days: i64,
    /// Results cap on the device list fetch.
    pub device_limit: u32,
    /// Results cap per vehicle's trip fetch.
    pub trip_limit: u32,
    /// Maximum in-flight trip fetches.
    pub concurrency: usize,
}

impl Default for FleetOptions {
    fn default() -> Self {
        FleetOptions {
            lookback_days: 14,
            device_limit: 100,
            trip_limit: 500,
            concurrency: 8,
        }
    }
}

/// Runs the full audit: device list, classification, concurrent per-vehicle
/// trip pulls, then ordering and summary.
///
/// One vehicle's fetch failure becomes an error entry without disturbing the
/// other vehicles; a device-list failure aborts the whole run. Results come
/// back sorted regardless of completion order.
#[tracing::instrument(skip(api, host, map, opts), fields(lookback_days = opts.lookback_days))]
pub async fn analyze_fleet(
    api: Arc<dyn TelematicsApi>,
    host: &dyn Host,
    map: &GroupMap,
    opts: &FleetOptions,
) -> Result<FleetReport> {
    host.status(StatusLevel::Info, "Fetching devices...");

    let devices = match api.get_devices(Some(opts.device_limit)).await {
        Ok(devices) => devices,
        Err(e) => {
            host.status(
                StatusLevel::Error,
                &format!("Failed to fetch devices: {e:#}"),
            );
            return Err(e.context("fetching device list"));
        }
    };

    // Only devices with a recognized type belong to the fleet.
    let fleet: Vec<_> = devices
        .iter()
        .map(|d| resolve_vehicle(map, d))
        .filter(|v| v.vehicle_type != VehicleType::Unknown)
        .collect();

    info!(
        devices = devices.len(),
        fleet = fleet.len(),
        "Device list classified"
    );
    host.status(
        StatusLevel::Info,
        &format!("Got {} fleet vehicles, pulling trips...", fleet.len()),
    );

    let from = Utc::now() - Duration::days(opts.lookback_days);
    // A zero permit count would deadlock the fan-out.
    let semaphore = Arc::new(Semaphore::new(opts.concurrency.max(1)));

    let mut tasks = Vec::with_capacity(fleet.len());
    for vehicle in fleet {
        let api = api.clone();
        let sem = semaphore.clone();
        let trip_limit = opts.trip_limit;
        let handle_vehicle = vehicle.clone();

        let task = tokio::spawn(async move {
            let _permit = sem.acquire().await.unwrap();

            debug!(vehicle = %vehicle.name, device_id = %vehicle.id, "Fetching trips");
            match api.get_trips(&vehicle.id, from, Some(trip_limit)).await {
                Ok(trips) => {
                    VehicleReport::analyzed(vehicle, TripAnalysis::from_trips(&trips))
                }
                Err(e) => {
                    error!(vehicle = %vehicle.name, error = %e, "Trip fetch failed");
                    VehicleReport::failed(vehicle, format!("{e:#}"))
                }
            }
        });

        tasks.push((handle_vehicle, task));
    }

    let total = tasks.len();
    let mut reports = Vec::with_capacity(total);
    let mut done = 0;

    for (vehicle, task) in tasks {
        let report = match task.await {
            Ok(report) => report,
            // A panicked task still yields an error entry so the batch
            // completes and every other vehicle stays reported.
            Err(e) => {
                error!(vehicle = %vehicle.name, error = %e, "Trip task aborted");
                VehicleReport::failed(vehicle, format!("task aborted: {e}"))
            }
        };

        done += 1;
        host.status(
            StatusLevel::Info,
            &format!("Pulling trips... {done}/{total} vehicles done"),
        );
        reports.push(report);
    }

    sort_reports(&mut reports);
    let summary = summarize(&reports);

    info!(
        total = summary.total_vehicles,
        synthetic = summary.synthetic_data,
        varied = summary.varied_data,
        no_trips = summary.no_trips,
        errors = summary.fetch_errors,
        "Fleet audit complete"
    );
    host.status(
        StatusLevel::Ok,
        &format!("Done! {} vehicles analyzed", reports.len()),
    );
    host.output("summary", &serde_json::to_value(&summary)?);
    host.output("results", &serde_json::to_value(&reports)?);

    Ok(FleetReport {
        generated_at: Utc::now(),
        summary,
        vehicles: reports,
    })
}

/// Fetches one device's trips over the lookback window and analyzes them.
pub async fn analyze_device(
    api: &dyn TelematicsApi,
    device_id: &str,
    lookback_days: i64,
    trip_limit: u32,
) -> Result<TripAnalysis> {
    let from = Utc::now() - Duration::days(lookback_days);
    let trips = api
        .get_trips(device_id, from, Some(trip_limit))
        .await
        .with_context(|| format!("fetching trips for device {device_id}"))?;

    Ok(TripAnalysis::from_trips(&trips))
}
