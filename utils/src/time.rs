//! Time formatting helpers.

/// Format a countdown as zero-padded `DDd:HHh:MMm`.
///
/// Seconds are dropped (the UI ticks once a minute). The day field widens
/// past two digits instead of wrapping.
pub fn format_countdown(secs: u64) -> String {
    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    format!("{days:02}d:{hours:02}h:{minutes:02}m")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_every_field() {
        assert_eq!(format_countdown(0), "00d:00h:00m");
        assert_eq!(format_countdown(3_661), "00d:01h:01m");
        assert_eq!(format_countdown(59), "00d:00h:00m");
    }

    #[test]
    fn full_lock_period() {
        assert_eq!(format_countdown(168 * 3_600), "07d:00h:00m");
        assert_eq!(format_countdown(168 * 3_600 - 60), "06d:23h:59m");
    }

    #[test]
    fn day_field_widens() {
        assert_eq!(format_countdown(123 * 86_400 + 7_200), "123d:02h:00m");
    }
}
