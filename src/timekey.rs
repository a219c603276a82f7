// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Time ↔ key codec.
//!
//! Segment keys carry *local* wall-clock time for a fixed numeric offset
//! (e.g. IST = +330 minutes). Local fields are always derived by shifting the
//! absolute instant by the offset and reading the result as UTC, so the host's
//! own timezone never enters the computation.
//!
//! ```text
//! cam1/2025/01/02/03/cam_1_2025_01_02_03_04_05.ts
//! └──┘ └──────────────┘ └──────────────────────────┘
//! camera  local hour         local start of segment
//! ```

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::error::{MergeError, Result};

/// File extension of a recorded segment.
pub const CLIP_EXTENSION: &str = ".ts";

/// Calendar fields of an instant viewed at a fixed local offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFields {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl LocalFields {
    /// Same fields with everything below the hour zeroed.
    pub fn truncate_to_hour(self) -> Self {
        LocalFields { minute: 0, second: 0, millisecond: 0, ..self }
    }
}

fn offset_delta(offset_minutes: i32) -> Duration {
    Duration::minutes(offset_minutes as i64)
}

/// Calendar fields of `instant` at `offset_minutes` east of UTC.
pub fn to_local_fields(instant: DateTime<Utc>, offset_minutes: i32) -> LocalFields {
    let shifted = instant + offset_delta(offset_minutes);
    LocalFields {
        year: shifted.year(),
        month: shifted.month(),
        day: shifted.day(),
        hour: shifted.hour(),
        minute: shifted.minute(),
        second: shifted.second(),
        millisecond: shifted.timestamp_subsec_millis(),
    }
}

/// Absolute instant represented by local `fields` at `offset_minutes`.
///
/// Returns `None` when the fields do not name a real calendar time
/// (month 13, February 30th, hour 24, …).
pub fn fields_to_local_instant(fields: LocalFields, offset_minutes: i32) -> Option<DateTime<Utc>> {
    let naive = NaiveDate::from_ymd_opt(fields.year, fields.month, fields.day)?.and_hms_milli_opt(
        fields.hour,
        fields.minute,
        fields.second,
        fields.millisecond,
    )?;
    Some(naive.and_utc() - offset_delta(offset_minutes))
}

/// Fixed-width `YYYY_MM_DD_HH_MM_SS` local stamp used in output file names.
pub fn format_filename_stamp(instant: DateTime<Utc>, offset_minutes: i32) -> String {
    let p = to_local_fields(instant, offset_minutes);
    format!(
        "{:04}_{:02}_{:02}_{:02}_{:02}_{:02}",
        p.year, p.month, p.day, p.hour, p.minute, p.second
    )
}

/// Decode the local start time embedded in a segment key.
///
/// The key must end in `/cam_<digit>_<YYYY>_<MM>_<DD>_<HH>_<MM>_<SS>.ts`.
/// Anything else yields `None`; callers skip such keys.
pub fn parse_clip_instant(key: &str, offset_minutes: i32) -> Option<DateTime<Utc>> {
    let stem = key.strip_suffix(CLIP_EXTENSION)?;
    let (_, name) = stem.rsplit_once('/')?;
    let body = name.strip_prefix("cam_")?;

    let parts: Vec<&str> = body.split('_').collect();
    const WIDTHS: [usize; 7] = [1, 4, 2, 2, 2, 2, 2];
    if parts.len() != WIDTHS.len() {
        return None;
    }
    let mut values = [0u32; 7];
    for (i, (part, width)) in parts.iter().zip(WIDTHS).enumerate() {
        if part.len() != width || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        values[i] = part.parse().ok()?;
    }

    let fields = LocalFields {
        year: values[1] as i32,
        month: values[2],
        day: values[3],
        hour: values[4],
        minute: values[5],
        second: values[6],
        millisecond: 0,
    };
    fields_to_local_instant(fields, offset_minutes)
}

/// Caller-supplied start of the merge window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartTime {
    /// Already-resolved absolute instant.
    Instant(DateTime<Utc>),
    /// Milliseconds since the Unix epoch.
    EpochMillis(i64),
    /// Timestamp text; see [`parse_start_text`].
    Text(String),
}

impl StartTime {
    /// Resolve to an absolute instant. `offset_minutes` only applies to
    /// text without its own offset.
    pub fn resolve(&self, offset_minutes: i32) -> Result<DateTime<Utc>> {
        match self {
            StartTime::Instant(t) => Ok(*t),
            StartTime::EpochMillis(ms) => Utc
                .timestamp_millis_opt(*ms)
                .single()
                .ok_or_else(|| MergeError::InvalidInput(format!("Invalid start time: {ms}"))),
            StartTime::Text(s) => parse_start_text(s, offset_minutes),
        }
    }
}

/// Parse a start timestamp.
///
/// Accepted forms:
///  - RFC 3339 with an explicit offset: `2025-10-26T09:00:00+05:30`
///  - epoch milliseconds: `1761449400000`
///  - naive local time, read at `offset_minutes`: `2025-10-26 09:00:00`
pub fn parse_start_text(text: &str, offset_minutes: i32) -> Result<DateTime<Utc>> {
    let s = text.trim();
    let invalid = || MergeError::InvalidInput(format!("Invalid start time: {text:?}"));

    if s.is_empty() {
        return Err(invalid());
    }
    if s.bytes().all(|b| b.is_ascii_digit()) {
        let ms: i64 = s.parse().map_err(|_| invalid())?;
        return StartTime::EpochMillis(ms).resolve(offset_minutes);
    }
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Ok(t.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(naive.and_utc() - offset_delta(offset_minutes));
        }
    }
    Err(invalid())
}
