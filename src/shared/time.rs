use chrono::{DateTime, SecondsFormat, Utc};

/// Utility for parsing textual timestamps into epoch nanoseconds (i64).
pub struct TimeParser;

impl TimeParser {
    /// Parse an RFC3339 timestamp (any offset, any fraction width) into UTC nanoseconds.
    /// Returns None for malformed input or instants outside the i64 nanosecond range.
    pub fn parse_rfc3339_nanos(input: &str) -> Option<i64> {
        let dt = DateTime::parse_from_rfc3339(input).ok()?;
        dt.with_timezone(&Utc).timestamp_nanos_opt()
    }

    /// Parse a timestamp only if it is already in the canonical ISO-8601 form
    /// `YYYY-MM-DDTHH:MM:SS.mmmZ`, so that re-rendering yields the same text.
    pub fn parse_iso8601_nanos(input: &str) -> Option<i64> {
        if input.len() != "2006-01-02T15:04:05.000Z".len() || !input.ends_with('Z') {
            return None;
        }
        let nanos = Self::parse_rfc3339_nanos(input)?;
        let mut rendered = String::with_capacity(input.len());
        write_iso8601(&mut rendered, nanos);
        (rendered == input).then_some(nanos)
    }
}

/// Appends `ts` as RFC3339 with a fixed 9-digit fraction, e.g. `2024-05-01T10:00:00.000000001Z`.
///
/// The fixed width keeps textual order aligned with chronological order.
pub fn write_rfc3339_nano(buf: &mut String, ts: i64) {
    let dt = DateTime::<Utc>::from_timestamp_nanos(ts);
    buf.push_str(&dt.to_rfc3339_opts(SecondsFormat::Nanos, true));
}

/// Appends `ts` as ISO-8601 with millisecond precision, e.g. `2024-05-01T10:00:00.123Z`.
pub fn write_iso8601(buf: &mut String, ts: i64) {
    let dt = DateTime::<Utc>::from_timestamp_nanos(ts);
    buf.push_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true));
}

pub fn format_rfc3339_nano(ts: i64) -> String {
    let mut s = String::with_capacity(30);
    write_rfc3339_nano(&mut s, ts);
    s
}
