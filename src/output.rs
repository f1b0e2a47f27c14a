//! Output formatting and persistence for audit results.
//!
//! Supports pretty-printed JSON and CSV append of flattened per-vehicle rows.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::debug;

use crate::analyzers::types::{FleetReport, VehicleReport};

/// One flattened CSV row per vehicle. CSV cannot nest, so the trip analysis
/// fields are inlined; `error` is set for failed fetches and the statistics
/// columns stay empty.
#[derive(Debug, Serialize)]
pub struct ReportRow {
    pub run_at: DateTime<Utc>,
    pub name: String,
    pub vehicle_type: String,
    pub depot: String,
    pub id: String,
    pub trip_count: Option<usize>,
    pub unique_starts: Option<usize>,
    pub unique_stops: Option<usize>,
    pub all_same_start: Option<bool>,
    pub all_same_stop: Option<bool>,
    pub peak_hour: Option<String>,
    pub avg_dur_hrs: Option<f64>,
    pub verdict: Option<String>,
    pub error: Option<String>,
}

impl ReportRow {
    fn from_report(run_at: DateTime<Utc>, report: &VehicleReport) -> Self {
        let t = report.trips.as_ref();
        ReportRow {
            run_at,
            name: report.name.clone(),
            vehicle_type: report.vehicle_type.as_str().to_string(),
            depot: report.depot.as_str().to_string(),
            id: report.id.clone(),
            trip_count: t.map(|t| t.count),
            unique_starts: t.map(|t| t.unique_starts),
            unique_stops: t.map(|t| t.unique_stops),
            all_same_start: t.map(|t| t.all_same_start),
            all_same_stop: t.map(|t| t.all_same_stop),
            peak_hour: t.and_then(|t| t.peak_hour.clone()),
            avg_dur_hrs: t.and_then(|t| t.avg_dur_hrs),
            verdict: t.and_then(|t| t.verdict.clone()),
            error: report.error.clone(),
        }
    }
}

/// Appends one row per vehicle to a CSV file.
///
/// Creates the file with headers if it does not already exist.
pub fn append_report_rows(path: &str, report: &FleetReport) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(
        path,
        file_exists,
        rows = report.vehicles.len(),
        "Appending CSV rows"
    );

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    for vehicle in &report.vehicles {
        writer.serialize(ReportRow::from_report(report.generated_at, vehicle))?;
    }
    writer.flush()?;

    Ok(())
}

/// Prints any serializable result as pretty JSON on stdout.
pub fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
