//! Shared utility functions

use chrono::{DateTime, Utc};

/// Parse a datetime string (RFC3339 format) or return current time
///
/// Used for bookkeeping columns (`created_at`, `updated_at`) where a
/// malformed value should not make the whole row unreadable.
pub fn parse_datetime_or_now(s: &str) -> DateTime<Utc> {
    parse_rfc3339(s).unwrap_or_else(Utc::now)
}

/// Parse a datetime column that carries domain data
///
/// Unlike [`parse_datetime_or_now`], a malformed value is a decode error:
/// the contact time of a QSL must never be silently replaced.
pub fn parse_datetime(column: &str, s: &str) -> Result<DateTime<Utc>, sqlx::Error> {
    parse_rfc3339(s).ok_or_else(|| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: format!("invalid RFC3339 timestamp: {}", s).into(),
    })
}

fn parse_rfc3339(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_datetime_or_now() {
        let valid_time = "2024-01-01T12:00:00Z";
        let parsed = parse_datetime_or_now(valid_time);
        assert_eq!(parsed.to_rfc3339(), "2024-01-01T12:00:00+00:00");

        // Invalid time should return current time (just check it doesn't panic)
        let now_before = Utc::now();
        let parsed = parse_datetime_or_now("invalid");
        let now_after = Utc::now();
        assert!(parsed >= now_before && parsed <= now_after);
    }

    #[test]
    fn test_parse_datetime_strict() {
        let parsed = parse_datetime("from_time", "2017-07-21T17:32:28Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2017-07-21T17:32:28+00:00");

        let err = parse_datetime("from_time", "yesterday").unwrap_err();
        assert!(matches!(err, sqlx::Error::ColumnDecode { .. }));
    }
}
