//! Elapsed time formatting.
//!
//! Hours are never padded and never roll over into days: a build running for
//! 30 hours shows as `30:00:00`.

use core::fmt::Write;

use heapless::String;

/// Formatted time. Fits `u64::MAX` seconds as hours.
pub type TimeText = String<24>;

/// `H:MM:SS`.
pub fn format_hms(secs: u64) -> TimeText {
    let mut out = TimeText::new();
    write!(out, "{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60).ok();
    out
}

/// `M:SS` below one hour, `H:MM:SS` from one hour on.
pub fn format_age(secs: u64) -> TimeText {
    if secs < 3600 {
        let mut out = TimeText::new();
        write!(out, "{}:{:02}", secs / 60, secs % 60).ok();
        out
    } else {
        format_hms(secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_hms() {
        assert_eq!(format_hms(0).as_str(), "0:00:00");
        assert_eq!(format_hms(59).as_str(), "0:00:59");
        assert_eq!(format_hms(3661).as_str(), "1:01:01");
        assert_eq!(format_hms(5580).as_str(), "1:33:00");
    }

    #[test]
    fn test_format_hms_has_no_day_rollover() {
        assert_eq!(format_hms(30 * 3600).as_str(), "30:00:00");
    }

    #[test]
    fn test_format_hms_extreme_value_fits() {
        let text = format_hms(u64::MAX);
        assert!(text.ends_with(":15"));
        assert!(text.starts_with("5124095576030431"));
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(0).as_str(), "0:00");
        assert_eq!(format_age(75).as_str(), "1:15");
        assert_eq!(format_age(3599).as_str(), "59:59");
        assert_eq!(format_age(3600).as_str(), "1:00:00");
    }
}
