use chrono::{Duration, NaiveDateTime, Timelike};

use crate::error::{JitError, Result};

/// Wire format of every timestamp crossing the service boundary.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub fn parse_datetime(raw: &str) -> chrono::ParseResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, DATETIME_FORMAT)
}

pub fn format_datetime(timestamp: &NaiveDateTime) -> String {
    timestamp.format(DATETIME_FORMAT).to_string()
}

/// Converts timestamps into integer minute offsets anchored at the first
/// item. The first offset is the anchor's minute-of-hour, not zero, so that
/// re-applying offsets later lands on the correct minute-of-hour. For
/// example `["2019-08-22 14:32", "... 14:38", "... 14:42"]` becomes
/// `[32, 38, 42]`. Sub-minute remainders are discarded.
pub fn to_offsets(timestamps: &[NaiveDateTime]) -> Vec<i64> {
    let Some(anchor) = timestamps.first() else {
        return Vec::new();
    };
    let anchor_minute = anchor.minute() as i64;
    timestamps
        .iter()
        .map(|t| anchor_minute + minutes_between(anchor, t))
        .collect()
}

/// Whole minutes elapsed between `first` and `second`, floored.
fn minutes_between(first: &NaiveDateTime, second: &NaiveDateTime) -> i64 {
    (*second - *first).num_seconds().div_euclid(60)
}

/// Inverse of [`to_offsets`]: per index, zeroes the anchor's minute-of-hour
/// and adds the offset in minutes. Both slices must have equal length.
pub fn from_offsets(
    anchors: &[NaiveDateTime],
    offsets: &[i64],
) -> Result<Vec<NaiveDateTime>> {
    if anchors.len() != offsets.len() {
        return Err(JitError::LengthMismatch {
            expected: anchors.len(),
            actual: offsets.len(),
        });
    }
    Ok(anchors
        .iter()
        .zip(offsets)
        .map(|(anchor, &minutes)| {
            let hour_floor = *anchor - Duration::minutes(anchor.minute() as i64);
            hour_floor + Duration::minutes(minutes)
        })
        .collect())
}
