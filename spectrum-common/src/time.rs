//! Timestamp utilities

use crate::{Error, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse an IANA zone name such as `America/New_York`
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|e| Error::Config(format!("Unknown time zone '{}': {}", name, e)))
}

/// Render a timestamp the way reposted messages are titled, e.g. `2018-03-04 09:15 PM`
///
/// Daylight saving follows the zone's rules for the instant being rendered.
pub fn format_local(timestamp: DateTime<Utc>, tz: Tz) -> String {
    timestamp
        .with_timezone(&tz)
        .format("%Y-%m-%d %I:%M %p")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn eastern() -> Tz {
        parse_timezone("America/New_York").unwrap()
    }

    #[test]
    fn test_now_returns_valid_timestamp() {
        let timestamp = now();
        // Should be a reasonable timestamp (after year 2000)
        assert!(timestamp.timestamp() > 946_684_800);
    }

    #[test]
    fn test_format_local_winter_is_standard_time() {
        let ts = Utc.with_ymd_and_hms(2018, 3, 5, 2, 15, 0).unwrap();
        assert_eq!(format_local(ts, eastern()), "2018-03-04 09:15 PM");
    }

    #[test]
    fn test_format_local_summer_is_daylight_time() {
        let ts = Utc.with_ymd_and_hms(2018, 7, 5, 2, 15, 0).unwrap();
        assert_eq!(format_local(ts, eastern()), "2018-07-04 10:15 PM");
    }

    #[test]
    fn test_format_local_utc() {
        let ts = Utc.with_ymd_and_hms(2018, 3, 5, 14, 5, 0).unwrap();
        assert_eq!(format_local(ts, Tz::UTC), "2018-03-05 02:05 PM");
    }

    #[test]
    fn test_parse_timezone_rejects_unknown_names() {
        let err = parse_timezone("Mars/Olympus_Mons").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(parse_timezone("US/Eastern").unwrap(), Tz::US__Eastern);
    }
}
