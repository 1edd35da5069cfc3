use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

/// The minute-precision form dates take in the outline and in note headers.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";
/// The compact form used for note identifiers. The `T` is a literal separator.
pub const COMPACT_FORMAT: &str = "%Y%m%dT%H%M";

/// Formats with an explicit offset, tried in order after RFC 3339.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%z",
];
/// Formats without any zone, which are read as UTC wall-clock times.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an exported date into a point in time, keeping whatever offset it was written with.
/// Date-only values fall at midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt);
    }
    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    {
        return Some(dt);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .map(|d| d.and_time(NaiveTime::MIN))
        })?;
    Some(naive.and_utc().fixed_offset())
}

/// Normalises an exported date to `YYYY-MM-DD HH:MM` in the zone it was written in. Anything
/// that can't be parsed is handed back untouched, so callers can't assume the result is in the
/// canonical form. Empty input produces `None`.
pub fn normalize_date(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }
    match parse_timestamp(raw) {
        Some(dt) => Some(dt.format(DISPLAY_FORMAT).to_string()),
        None => {
            tracing::debug!(raw, "passing through unparseable date");
            Some(raw.to_string())
        }
    }
}

/// Renders the compact identifier token for the given point in time, dropping seconds.
pub fn compact_token(dt: &DateTime<FixedOffset>) -> String {
    dt.format(COMPACT_FORMAT).to_string()
}
