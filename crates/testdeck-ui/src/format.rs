//! Date and duration formatting for dashboard tables.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Placeholder for absent values.
pub const NOT_AVAILABLE: &str = "N/A";

/// Shown for date strings that cannot be parsed.
pub const INVALID_DATE: &str = "Invalid Date";

const DATE_TIME_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Format a number of seconds as `1时2分5秒`, `1分5秒` or `5秒`.
///
/// Absent, zero, negative and non-finite inputs render as `N/A`.
/// Fractional seconds are truncated.
pub fn format_duration(seconds: Option<f64>) -> String {
    let seconds = match seconds {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => return NOT_AVAILABLE.to_owned(),
    };

    let total = seconds.floor() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours}时{minutes}分{secs}秒")
    } else if minutes > 0 {
        format!("{minutes}分{secs}秒")
    } else {
        format!("{secs}秒")
    }
}

/// Format an ISO-8601 timestamp as `YYYY/MM/DD HH:MM:SS` in local time.
pub fn format_date_time(input: Option<&str>) -> String {
    format_date_time_in(input, &Local)
}

/// Like [`format_date_time`], rendering in `tz`.
///
/// Timestamps with an offset are converted to `tz`; timestamps without one
/// are taken to already be in `tz`; a bare date means midnight UTC.
pub fn format_date_time_in<Tz>(input: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let raw = match input.map(str::trim) {
        None | Some("") => return NOT_AVAILABLE.to_owned(),
        Some(raw) => raw,
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.with_timezone(tz).format(DATE_TIME_FORMAT).to_string();
    }

    if let Some(naive) = NAIVE_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
    {
        return naive.format(DATE_TIME_FORMAT).to_string();
    }

    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Utc
            .from_utc_datetime(&midnight)
            .with_timezone(tz)
            .format(DATE_TIME_FORMAT)
            .to_string();
    }

    INVALID_DATE.to_owned()
}
