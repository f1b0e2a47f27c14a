use crate::analyzers::types::{FleetSummary, VehicleReport};
use crate::analyzers::verdict::recommendation;

/// Sorts reports by depot name, then vehicle type, then vehicle name, all
/// lexicographic ascending on the rendered names. Entries without a trip
/// outcome always sort after entries with one and follow the same field
/// order among themselves, so the ordering is total.
pub fn sort_reports(reports: &mut [VehicleReport]) {
    reports.sort_by(|a, b| {
        let ka = (
            a.trips.is_none(),
            a.depot.as_str(),
            a.vehicle_type.as_str(),
            a.name.as_str(),
        );
        let kb = (
            b.trips.is_none(),
            b.depot.as_str(),
            b.vehicle_type.as_str(),
            b.name.as_str(),
        );
        ka.cmp(&kb)
    });
}

/// Tallies the fleet summary over collected reports.
///
/// Fetch failures stay out of the three trip tallies; they contribute only
/// to `total_vehicles` and `fetch_errors`.
pub fn summarize(reports: &[VehicleReport]) -> FleetSummary {
    let mut synthetic_data = 0;
    let mut varied_data = 0;
    let mut no_trips = 0;
    let mut fetch_errors = 0;

    for report in reports {
        match &report.trips {
            None => fetch_errors += 1,
            Some(t) if !t.has_trips() => no_trips += 1,
            Some(t) if t.is_synthetic() => synthetic_data += 1,
            Some(_) => varied_data += 1,
        }
    }

    FleetSummary {
        total_vehicles: reports.len(),
        synthetic_data,
        varied_data,
        no_trips,
        fetch_errors,
        recommendation: recommendation(varied_data),
    }
}
