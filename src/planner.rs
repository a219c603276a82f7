// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Window planning: which hour folders can hold segments for a window.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use tracing::warn;

use crate::camera::CameraId;
use crate::error::{MergeError, Result};
use crate::timekey::{fields_to_local_instant, to_local_fields};

/// Storage prefix of one camera's one local hour: `cam1/YYYY/MM/DD/HH/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StoragePrefix(String);

impl StoragePrefix {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The requested time range for one camera. `end` never precedes `start`
/// unless `start` itself lies in the future.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeWindow {
    pub camera: CameraId,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MergeWindow {
    /// Build the window `[start, min(start + duration, now)]`.
    pub fn new(
        camera: CameraId,
        start: DateTime<Utc>,
        duration_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        if duration_secs == 0 {
            return Err(MergeError::InvalidInput("duration must be > 0 seconds".into()));
        }
        let duration = i64::try_from(duration_secs)
            .ok()
            .and_then(Duration::try_seconds)
            .ok_or_else(|| MergeError::InvalidInput(format!("duration too large: {duration_secs}s")))?;
        let requested_end = start
            .checked_add_signed(duration)
            .ok_or_else(|| MergeError::InvalidInput(format!("window end overflows: {start} + {duration_secs}s")))?;

        let end = requested_end.min(now);
        if end < requested_end {
            warn!(
                camera = %camera,
                requested_end = %requested_end,
                end = %end,
                "Window end is in the future, clamped to now"
            );
        }
        Ok(MergeWindow { camera, start, end })
    }
}

/// Checks that every instant touched while planning and filtering `window`
/// stays within the representable range.
///
/// Covers `start - margin` floored to its local hour, the hour step past
/// `end`, and the local shift applied to both.
pub fn ensure_plannable(window: &MergeWindow, margin: Duration, offset_minutes: i32) -> Result<()> {
    let shift = Duration::minutes(offset_minutes as i64);
    let hour = Duration::hours(1);
    let earliest = window
        .start
        .checked_sub_signed(margin)
        .and_then(|t| t.checked_sub_signed(hour))
        .and_then(|t| t.checked_add_signed(shift));
    let latest = window
        .start
        .max(window.end)
        .checked_add_signed(hour)
        .and_then(|t| t.checked_add_signed(shift));
    match (earliest, latest) {
        (Some(_), Some(_)) => Ok(()),
        _ => Err(MergeError::InvalidInput(format!(
            "start time out of supported range: {}",
            window.start
        ))),
    }
}

/// Hour prefixes that may contain segments recorded in `[start, end]`.
///
/// Steps one absolute hour at a time from the local hour containing `start`,
/// inclusive of `end`. Always yields at least the prefix containing `start`.
pub fn plan_prefixes(
    camera: CameraId,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    offset_minutes: i32,
) -> Vec<StoragePrefix> {
    let hour_floor = to_local_fields(start, offset_minutes).truncate_to_hour();
    // A truncated real local time is always a valid calendar time.
    let anchor = fields_to_local_instant(hour_floor, offset_minutes).unwrap_or(start);

    let mut out: Vec<StoragePrefix> = Vec::new();
    let mut t = anchor;
    loop {
        let prefix = hour_prefix(camera, t, offset_minutes);
        if !out.contains(&prefix) {
            out.push(prefix);
        }
        t += Duration::hours(1);
        if t > end {
            break;
        }
    }
    out
}

fn hour_prefix(camera: CameraId, instant: DateTime<Utc>, offset_minutes: i32) -> StoragePrefix {
    let p = to_local_fields(instant, offset_minutes);
    StoragePrefix(format!(
        "{camera}/{:04}/{:02}/{:02}/{:02}/",
        p.year, p.month, p.day, p.hour
    ))
}
