//! Human-readable time formatting

use std::time::Duration;

/// Render seconds as zero-padded `MM:SS`
///
/// Negative input clamps to zero. Minutes are not capped, so durations of
/// an hour or more render as `60:00`, `100:00` and so on.
pub fn format_clock(seconds: i64) -> String {
    let clamped = seconds.max(0);
    format!("{:02}:{:02}", clamped / 60, clamped % 60)
}

/// Short label for a preset button, e.g. `3 min` or `90 s`
pub fn preset_label(seconds: u64) -> String {
    if seconds > 0 && seconds % 60 == 0 {
        format!("{} min", seconds / 60)
    } else {
        format!("{} s", seconds)
    }
}

/// Format an elapsed duration as `1h 2m 3s`, dropping leading zero units
pub fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_format() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(5), "00:05");
        assert_eq!(format_clock(59), "00:59");
        assert_eq!(format_clock(60), "01:00");
        assert_eq!(format_clock(185), "03:05");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_clock(900), "15:00");
        assert_eq!(format_clock(6000), "100:00");
    }

    #[test]
    fn clock_format_clamps_negative() {
        assert_eq!(format_clock(-1), "00:00");
        assert_eq!(format_clock(i64::MIN), "00:00");
    }

    #[test]
    fn clock_format_matches_division() {
        for s in 0..3600 {
            let expected = format!("{:02}:{:02}", s / 60, s % 60);
            assert_eq!(format_clock(s), expected);
        }
    }

    #[test]
    fn preset_labels() {
        assert_eq!(preset_label(180), "3 min");
        assert_eq!(preset_label(900), "15 min");
        assert_eq!(preset_label(90), "90 s");
        assert_eq!(preset_label(0), "0 s");
    }

    #[test]
    fn uptime_drops_leading_units() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3723)), "1h 2m 3s");
    }
}
