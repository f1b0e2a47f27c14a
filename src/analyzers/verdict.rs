/// Verdict line for one vehicle's trip list.
///
/// Trip data where every start and every stop collide is synthetic demo
/// data; any variation means the data is usable for pooling analysis.
// TODO: a single trip always collides with itself, so one-trip vehicles
// always read as synthetic; revisit whether count == 1 deserves its own
// verdict before anyone tunes thresholds against this output.
pub fn trip_verdict(all_same_start: bool, all_same_stop: bool) -> &'static str {
    if all_same_start && all_same_stop {
        "SYNTHETIC: all trips identical, unusable for pooling analysis"
    } else {
        "REAL: varied timestamps, usable for pooling analysis"
    }
}

/// Fleet-level recommendation given how many vehicles showed varied data.
pub fn recommendation(varied_data: usize) -> String {
    if varied_data > 0 {
        format!("USE REAL DATA: {varied_data} vehicles have varied timestamps")
    } else {
        "USE SYNTHETIC PATTERNS: all trips are identical, \
         real pooling analysis not possible with this data"
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_requires_both_sides_identical() {
        assert!(trip_verdict(true, true).starts_with("SYNTHETIC"));
        assert!(trip_verdict(true, false).starts_with("REAL"));
        assert!(trip_verdict(false, true).starts_with("REAL"));
        assert!(trip_verdict(false, false).starts_with("REAL"));
    }

    #[test]
    fn test_recommendation_states_varied_count() {
        let r = recommendation(3);
        assert!(r.starts_with("USE REAL DATA"));
        assert!(r.contains('3'));
    }

    #[test]
    fn test_recommendation_fallback_carries_caveat() {
        let r = recommendation(0);
        assert!(r.starts_with("USE SYNTHETIC PATTERNS"));
        assert!(r.contains("not possible"));
    }
}
