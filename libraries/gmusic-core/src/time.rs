//! Progress display helpers
//!
//! The player screen shows elapsed and total time as `mm:ss` labels on
//! either side of the progress slider.

/// Format milliseconds as `mm:ss`
///
/// Minutes are not wrapped into hours; a 75 minute track renders as `75:00`.
pub fn format_timestamp(millis: u64) -> String {
    let total_secs = millis / 1000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

/// Slider value for a position within a track, in `[0.0, 1.0]`
///
/// Returns 0.0 when the duration is unknown (zero).
pub fn progress_fraction(position_ms: u64, duration_ms: u64) -> f64 {
    if duration_ms == 0 {
        return 0.0;
    }
    (position_ms as f64 / duration_ms as f64).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_minutes_and_seconds() {
        assert_eq!(format_timestamp(0), "00:00");
        assert_eq!(format_timestamp(999), "00:00");
        assert_eq!(format_timestamp(61_000), "01:01");
        assert_eq!(format_timestamp(180_000), "03:00");
        assert_eq!(format_timestamp(75 * 60 * 1000), "75:00");
    }

    #[test]
    fn progress_is_clamped_and_safe_for_unknown_duration() {
        assert_eq!(progress_fraction(0, 0), 0.0);
        assert_eq!(progress_fraction(90_000, 180_000), 0.5);
        assert_eq!(progress_fraction(250_000, 180_000), 1.0);
    }
}
