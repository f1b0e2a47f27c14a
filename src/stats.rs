use std::collections::HashSet;

use chrono::{DateTime, Timelike, Utc};
use serde::Serialize;

use crate::analyzers::verdict::trip_verdict;
use crate::services::telematics::Trip;

/// Descriptive statistics over one vehicle's trip list.
///
/// The zero-trip form carries only `count` and `note`; every other field
/// stays at its empty default and the vehicle is reported as "no trips"
/// rather than synthetic or real.
#[derive(Debug, Default, Clone, Serialize)]
pub struct TripAnalysis {
    pub count: usize,
    pub unique_starts: usize,
    pub unique_stops: usize,
    pub all_same_start: bool,
    pub all_same_stop: bool,
    pub peak_hour: Option<String>,
    pub avg_dur_hrs: Option<f64>,
    pub sample_start: Option<DateTime<Utc>>,
    pub sample_stop: Option<DateTime<Utc>>,
    pub verdict: Option<String>,
    pub note: Option<String>,
}

impl TripAnalysis {
    pub fn from_trips(trips: &[Trip]) -> Self {
        if trips.is_empty() {
            return TripAnalysis {
                note: Some("No trips".to_string()),
                ..Default::default()
            };
        }

        let mut hour_counts = [0usize; 24];
        let mut unique_starts: HashSet<DateTime<Utc>> = HashSet::new();
        let mut unique_stops: HashSet<DateTime<Utc>> = HashSet::new();
        let mut durations = Vec::with_capacity(trips.len());

        for t in trips {
            hour_counts[t.start.hour() as usize] += 1;
            unique_starts.insert(t.start);
            unique_stops.insert(t.stop);
            durations.push((t.stop - t.start).num_milliseconds() as f64 / 3_600_000.0);
        }

        // Lowest hour wins ties, so only a strictly greater count moves the peak.
        let mut peak = 0;
        for (hour, &n) in hour_counts.iter().enumerate() {
            if n > hour_counts[peak] {
                peak = hour;
            }
        }

        let avg = durations.iter().sum::<f64>() / durations.len() as f64;
        let all_same_start = unique_starts.len() == 1;
        let all_same_stop = unique_stops.len() == 1;

        TripAnalysis {
            count: trips.len(),
            unique_starts: unique_starts.len(),
            unique_stops: unique_stops.len(),
            all_same_start,
            all_same_stop,
            peak_hour: Some(format!("{peak}:00 UTC")),
            avg_dur_hrs: Some(round1(avg)),
            sample_start: Some(trips[0].start),
            sample_stop: Some(trips[0].stop),
            verdict: Some(trip_verdict(all_same_start, all_same_stop).to_string()),
            note: None,
        }
    }

    /// True when the vehicle has trips and every start and every stop collide.
    pub fn is_synthetic(&self) -> bool {
        self.count > 0 && self.all_same_start && self.all_same_stop
    }

    pub fn has_trips(&self) -> bool {
        self.count > 0
    }
}

/// Rounds to one decimal place, the precision the original report used.
fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(start: &str, stop: &str) -> Trip {
        Trip {
            start: start.parse().unwrap(),
            stop: stop.parse().unwrap(),
        }
    }

    #[test]
    fn test_empty_trip_list_is_degenerate() {
        let a = TripAnalysis::from_trips(&[]);

        assert_eq!(a.count, 0);
        assert_eq!(a.note.as_deref(), Some("No trips"));
        assert_eq!(a.peak_hour, None);
        assert_eq!(a.avg_dur_hrs, None);
        assert_eq!(a.verdict, None);
        assert!(!a.has_trips());
        assert!(!a.is_synthetic());
    }

    #[test]
    fn test_single_trip_is_always_synthetic() {
        let a = TripAnalysis::from_trips(&[trip(
            "2024-01-01T08:00:00Z",
            "2024-01-01T09:30:00Z",
        )]);

        assert_eq!(a.count, 1);
        assert!(a.all_same_start);
        assert!(a.all_same_stop);
        assert!(a.is_synthetic());
        assert!(a.verdict.unwrap().starts_with("SYNTHETIC"));
    }

    #[test]
    fn test_identical_pair_is_synthetic() {
        let t = trip("2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z");
        let a = TripAnalysis::from_trips(&[t, t]);

        assert_eq!(a.count, 2);
        assert_eq!(a.unique_starts, 1);
        assert_eq!(a.unique_stops, 1);
        assert!(a.is_synthetic());
        assert_eq!(a.avg_dur_hrs, Some(1.0));
    }

    #[test]
    fn test_varied_trips_are_real() {
        let a = TripAnalysis::from_trips(&[
            trip("2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z"),
            trip("2024-01-01T14:00:00Z", "2024-01-01T15:30:00Z"),
        ]);

        assert_eq!(a.count, 2);
        assert_eq!(a.unique_starts, 2);
        assert_eq!(a.unique_stops, 2);
        assert!(!a.all_same_start);
        assert!(!a.all_same_stop);
        // Hours 8 and 14 tie at one trip each; the lower hour wins.
        assert_eq!(a.peak_hour.as_deref(), Some("8:00 UTC"));
        // Durations 1.0h and 1.5h average to 1.25, rounded to 1.3.
        assert_eq!(a.avg_dur_hrs, Some(1.3));
        assert!(a.verdict.unwrap().starts_with("REAL"));
    }

    #[test]
    fn test_peak_hour_tracks_busiest_bucket() {
        let a = TripAnalysis::from_trips(&[
            trip("2024-01-01T06:15:00Z", "2024-01-01T07:00:00Z"),
            trip("2024-01-02T14:00:00Z", "2024-01-02T15:00:00Z"),
            trip("2024-01-03T14:30:00Z", "2024-01-03T15:10:00Z"),
        ]);

        assert_eq!(a.peak_hour.as_deref(), Some("14:00 UTC"));
    }

    #[test]
    fn test_sample_is_first_trip() {
        let first = trip("2024-03-05T10:00:00Z", "2024-03-05T11:00:00Z");
        let a = TripAnalysis::from_trips(&[
            first,
            trip("2024-03-06T12:00:00Z", "2024-03-06T13:00:00Z"),
        ]);

        assert_eq!(a.sample_start, Some(first.start));
        assert_eq!(a.sample_stop, Some(first.stop));
    }

    #[test]
    fn test_same_starts_varied_stops_is_real() {
        let a = TripAnalysis::from_trips(&[
            trip("2024-01-01T08:00:00Z", "2024-01-01T09:00:00Z"),
            trip("2024-01-01T08:00:00Z", "2024-01-01T10:00:00Z"),
        ]);

        assert!(a.all_same_start);
        assert!(!a.all_same_stop);
        assert!(!a.is_synthetic());
    }

    #[test]
    fn test_round1() {
        assert_eq!(round1(1.25), 1.3);
        assert_eq!(round1(1.24), 1.2);
        assert_eq!(round1(2.0), 2.0);
    }
}
