use crate::time_series::TimeSeriesPoint;

/// Compute X (seconds) and Y (WPM) bounds for the results chart
pub fn compute_chart_params(points: &[TimeSeriesPoint], fallback_secs: f64) -> (f64, f64) {
    let highest_wpm = points.iter().map(|p| p.wpm).fold(0.0_f64, f64::max);

    let overall_duration = points.last().map_or(fallback_secs, |p| p.t).max(1.0);

    // keep a little headroom above the top sample
    (overall_duration, (highest_wpm + highest_wpm / 10.0).ceil().max(10.0))
}

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}
