//! Display helpers for durations

/// Format milliseconds as `m:ss`
///
/// Minutes are not capped, so a 75 minute mix prints as `75:00`.
pub fn format_duration_ms(ms: u64) -> String {
    let minutes = ms / 60_000;
    let seconds = (ms % 60_000) / 1000;
    format!("{}:{:02}", minutes, seconds)
}

/// Format fractional seconds (as reported by a media output) as `m:ss`
///
/// Unknown durations (NaN, infinite, negative) print as `0:00`.
pub fn format_seconds(seconds: f64) -> String {
    if !seconds.is_finite() || seconds <= 0.0 {
        return format_duration_ms(0);
    }
    format_duration_ms((seconds * 1000.0) as u64)
}
