//! Text encoding for timestamps stored in SQLite.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Format written by `CURRENT_TIMESTAMP`, accepted for rows predating the
/// RFC 3339 encoding.
const SQLITE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Encodes a timestamp as fixed-width RFC 3339 UTC text, so lexical order
/// matches chronological order.
pub(crate) fn encode(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decodes a stored timestamp.
pub(crate) fn decode(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, SQLITE_DATETIME_FORMAT).map(|naive| naive.and_utc())
        })
}
