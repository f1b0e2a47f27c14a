//! Data types used by the fleet analysis pipeline.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::{Depot, Vehicle, VehicleType};
use crate::stats::TripAnalysis;

/// Outcome for one fleet vehicle: its identity plus either the trip analysis
/// or the error that prevented one.
#[derive(Debug, Clone, Serialize)]
pub struct VehicleReport {
    pub name: String,
    #[serde(rename = "type")]
    pub vehicle_type: VehicleType,
    pub depot: Depot,
    pub id: String,
    pub trips: Option<TripAnalysis>,
    pub error: Option<String>,
}

impl VehicleReport {
    pub fn analyzed(vehicle: Vehicle, analysis: TripAnalysis) -> Self {
        VehicleReport {
            name: vehicle.name,
            vehicle_type: vehicle.vehicle_type,
            depot: vehicle.depot,
            id: vehicle.id,
            trips: Some(analysis),
            error: None,
        }
    }

    /// Error-marker entry for a vehicle whose trip fetch failed. The vehicle
    /// stays in the result list; it just carries no analysis.
    pub fn failed(vehicle: Vehicle, error: String) -> Self {
        VehicleReport {
            name: vehicle.name,
            vehicle_type: vehicle.vehicle_type,
            depot: vehicle.depot,
            id: vehicle.id,
            trips: None,
            error: Some(error),
        }
    }
}

/// Fleet-wide tallies plus the final recommendation.
///
/// `total_vehicles` counts every entry, error entries included; the three
/// trip tallies only split vehicles that produced an analysis.
#[derive(Debug, Clone, Serialize)]
pub struct FleetSummary {
    pub total_vehicles: usize,
    pub synthetic_data: usize,
    pub varied_data: usize,
    pub no_trips: usize,
    pub fetch_errors: usize,
    pub recommendation: String,
}

/// Everything one audit run produces: the summary plus the ordered
/// per-vehicle result list.
#[derive(Debug, Clone, Serialize)]
pub struct FleetReport {
    pub generated_at: DateTime<Utc>,
    pub summary: FleetSummary,
    pub vehicles: Vec<VehicleReport>,
}
