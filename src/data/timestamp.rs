//! Tolerant ISO-8601 parsing for `run_time` values.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

/// Offset-carrying layouts, tried after a trailing `Z` became `+00:00`.
const OFFSET_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];

/// Layouts without an offset; these are read as UTC.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a run timestamp, returning `None` instead of failing on bad input.
///
/// Accepts RFC 3339 style values with an offset or a `Z` suffix, naive
/// date-times (assumed UTC), and bare dates (midnight UTC).
pub fn parse_run_time(raw: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let normalized = match trimmed.strip_suffix('Z') {
        Some(head) => format!("{}+00:00", head),
        None => trimmed.to_string(),
    };

    if let Some(dt) = OFFSET_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(&normalized, fmt).ok())
    {
        return Some(dt);
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(&normalized, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(&normalized, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    Some(naive.and_utc().fixed_offset())
}

/// Calendar date of a run, on the timestamp's own wall clock.
pub fn run_date(raw: &str) -> Option<NaiveDate> {
    parse_run_time(raw).map(|dt| dt.date_naive())
}
