use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, TimeZone, Utc};

/// Shown when an event has no usable date
pub const DATE_NOT_AVAILABLE: &str = "Date not available";

/// Parse an event timestamp. Accepts RFC 3339 and naive `YYYY-MM-DDTHH:MM[:SS]`
/// or `YYYY-MM-DD HH:MM` forms, the latter two read as UTC.
pub fn parse_event_time(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Format an event timestamp for display, falling back to the raw string
pub fn format_event_time(value: Option<&str>) -> String {
    match value {
        None | Some("") => DATE_NOT_AVAILABLE.to_string(),
        Some(raw) => parse_event_time(raw)
            .map(|dt| dt.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| raw.to_string()),
    }
}

/// ISO 8601 with millisecond precision, as the backend expects
pub fn to_iso(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// End of an event that starts at `start` and lasts `duration_minutes`
pub fn end_time(start: DateTime<Utc>, duration_minutes: u32) -> DateTime<Utc> {
    start + Duration::minutes(i64::from(duration_minutes))
}

/// Same time tomorrow
pub fn tomorrow(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(1)
}

/// Tomorrow at the given hour, on the hour
pub fn tomorrow_at(now: DateTime<Utc>, hour: u32) -> Option<DateTime<Utc>> {
    let naive = tomorrow(now).date_naive().and_hms_opt(hour, 0, 0)?;
    Some(Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_event_time() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();

        assert_eq!(parse_event_time("2024-03-05T14:30:00Z"), Some(expected));
        assert_eq!(parse_event_time("2024-03-05T15:30:00+01:00"), Some(expected));
        assert_eq!(parse_event_time("2024-03-05T14:30:00.000000Z"), Some(expected));
        assert_eq!(parse_event_time("2024-03-05T14:30"), Some(expected));
        assert_eq!(parse_event_time("2024-03-05 14:30"), Some(expected));
        assert_eq!(parse_event_time("not a date"), None);
        assert_eq!(parse_event_time(""), None);
    }

    #[test]
    fn test_format_event_time() {
        assert_eq!(format_event_time(None), DATE_NOT_AVAILABLE);
        assert_eq!(format_event_time(Some("")), DATE_NOT_AVAILABLE);
        assert_eq!(
            format_event_time(Some("2024-03-05T14:30:00Z")),
            "2024-03-05 14:30 UTC"
        );
        assert_eq!(format_event_time(Some("sometime")), "sometime");
    }

    #[test]
    fn test_end_time_and_iso() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        let end = end_time(start, 45);
        assert_eq!(to_iso(end), "2024-01-02T00:15:00.000Z");
    }

    #[test]
    fn test_tomorrow_at() {
        let now = Utc.with_ymd_and_hms(2024, 2, 28, 18, 12, 44).unwrap();
        let result = tomorrow_at(now, 10).unwrap();
        assert_eq!(to_iso(result), "2024-02-29T10:00:00.000Z");
        assert!(tomorrow_at(now, 24).is_none());
    }
}
