//! Line parser: one raw replay line into a [`Snapshot`] or a typed failure.
//!
//! Line format: `<timestamp>\t<json>`. Nothing here panics; every outcome is
//! a `Result`.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::config::ReplayConfig;
use crate::error::ReplayError;
use crate::model::Snapshot;

/// Width of the fixed-width recorder timestamp, e.g. `2021/03/28 20.14.42.123`.
const FIXED_WIDTH_LEN: usize = 23;
/// Positions of the hour/minute and minute/second separators in that format.
const CLOCK_SEPARATORS: [usize; 2] = [13, 16];

/// Formats tried in order after normalization.
const DATETIME_FORMATS: &[&str] = &[
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %I:%M:%S %p",
    "%Y/%m/%d %H:%M",
];
const DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%m/%d/%Y"];

/// Rewrite the fixed-width `HH.mm.ss.fff` clock into `HH:mm:ss.fff`.
///
/// Applies only when the field is exactly 23 characters with `.` at index 13;
/// anything else is returned untouched.
pub fn normalize_timestamp(raw: &str) -> String {
    let mut chars: Vec<char> = raw.chars().collect();
    if chars.len() == FIXED_WIDTH_LEN && chars[CLOCK_SEPARATORS[0]] == '.' {
        for idx in CLOCK_SEPARATORS {
            chars[idx] = ':';
        }
        chars.into_iter().collect()
    } else {
        raw.to_string()
    }
}

/// Normalize then parse a timestamp field.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, ReplayError> {
    let normalized = normalize_timestamp(raw);
    let s = normalized.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_utc());
    }
    for fmt in DATE_FORMATS {
        if let Some(dt) = NaiveDate::parse_from_str(s, fmt)
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
        {
            return Ok(dt);
        }
    }

    Err(ReplayError::BadTimestamp { raw: normalized })
}

/// Parse one replay line.
///
/// Fails with `MalformedLine` unless the line has exactly two tab-separated
/// fields, `BadTimestamp` if the first is not a date, `NotArenaData` if the
/// payload is too short to be gameplay, and `BadJson` if it is not a snapshot.
pub fn parse_line(line: &str, cfg: &ReplayConfig) -> Result<Snapshot, ReplayError> {
    let mut parts = line.split('\t');
    let (Some(time), Some(json), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(ReplayError::MalformedLine {
            fields: line.split('\t').count(),
        });
    };

    let timestamp = parse_timestamp(time)?;

    if json.len() <= cfg.min_payload_len {
        return Err(ReplayError::NotArenaData {
            len: json.len(),
            min: cfg.min_payload_len,
        });
    }

    let mut snapshot: Snapshot = serde_json::from_str(json)?;
    snapshot.timestamp = timestamp;
    snapshot.source = Some(Arc::from(json));
    Ok(snapshot)
}
