use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Parses a provider date string into UTC.
///
/// Accepts RFC 3339, RFC 2822 (feeds), naive date-times (assumed UTC) and bare
/// dates. Returns `None` for anything else.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Like [`parse_timestamp`], substituting `fallback` for missing or unparseable
/// dates so every article has a publication time.
pub fn timestamp_or(raw: Option<&str>, fallback: DateTime<Utc>) -> DateTime<Utc> {
    raw.and_then(parse_timestamp).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_rfc3339() {
        assert_eq!(
            parse_timestamp("2024-01-02T00:00:00Z"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2024-01-02T10:30:00.500+05:30"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 5, 0, 0).unwrap() + chrono::Duration::milliseconds(500))
        );
    }

    #[test]
    fn test_parse_rfc2822() {
        assert_eq!(
            parse_timestamp("Tue, 02 Jan 2024 08:00:00 GMT"),
            Some(Utc.with_ymd_and_hms(2024, 1, 2, 8, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_parse_naive_and_date_only() {
        assert_eq!(
            parse_timestamp("2024-03-01 12:00:00"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("2024-03-01"),
            Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_fallback_for_garbage() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("yesterday-ish"), None);
        assert_eq!(timestamp_or(Some("not a date"), now), now);
        assert_eq!(timestamp_or(None, now), now);
        assert_eq!(timestamp_or(Some(""), now), now);
    }
}
