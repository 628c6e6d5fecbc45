/// (answer number, latency ms) points for the summary chart
pub fn latency_coords(latencies_ms: &[u64]) -> Vec<(f64, f64)> {
    latencies_ms
        .iter()
        .enumerate()
        .map(|(i, &ms)| ((i + 1) as f64, ms as f64))
        .collect()
}

/// Compute X (answers) and Y (latency) bounds for the summary chart
pub fn compute_chart_params(coords: &[(f64, f64)]) -> (f64, f64) {
    let mut slowest = 0.0;
    for &(_, ms) in coords {
        if ms > slowest {
            slowest = ms;
        }
    }

    let answers = coords.last().map(|p| p.0).unwrap_or(1.0).max(1.0);

    (answers, slowest.round().max(1.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
