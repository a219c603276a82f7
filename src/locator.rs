// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Clip discovery.
//!
//! Lists every planned hour prefix to exhaustion, decodes the local start
//! time embedded in each segment key, and keeps the clips that start within
//! `[window.start - margin, window.end]`. Whole segments are kept or dropped;
//! nothing is trimmed.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{MergeError, Result};
use crate::planner::{MergeWindow, StoragePrefix};
use crate::storage::ObjectStore;
use crate::timekey::{parse_clip_instant, CLIP_EXTENSION};

/// Default look-back before the window start, in seconds.
pub const DEFAULT_BOUNDARY_MARGIN_SECS: u64 = 5 * 60;

/// A segment selected for merging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClipRef {
    pub key: String,
    /// Start of the segment, decoded from the key.
    pub timestamp: DateTime<Utc>,
    /// Size in bytes as reported by the store.
    pub size: u64,
}

/// Whether a clip starting at `clip` belongs to `window`.
pub fn in_window(clip: DateTime<Utc>, window: &MergeWindow, margin: Duration) -> bool {
    clip <= window.end && clip >= window.start - margin
}

/// Collect the clips for `window` under `prefixes`, oldest first.
///
/// Fails with [`MergeError::NotFound`] when nothing matches and with
/// [`MergeError::Transfer`] when a listing page cannot be fetched.
pub async fn locate_clips<S: ObjectStore>(
    store: &S,
    bucket: &str,
    prefixes: &[StoragePrefix],
    window: &MergeWindow,
    offset_minutes: i32,
    margin: Duration,
) -> Result<Vec<ClipRef>> {
    let mut found: Vec<ClipRef> = Vec::new();

    for prefix in prefixes {
        let mut token: Option<String> = None;
        let mut pages = 0usize;
        let before = found.len();

        loop {
            let page = store
                .list_page(bucket, prefix.as_str(), token.as_deref())
                .await
                .map_err(|e| MergeError::transfer(format!("list {bucket}/{prefix}"), e))?;
            pages += 1;
            debug!(prefix = %prefix, page = pages, items = page.items.len(), "Listing page");

            for item in page.items {
                if !item.key.ends_with(CLIP_EXTENSION) {
                    continue;
                }
                let Some(timestamp) = parse_clip_instant(&item.key, offset_minutes) else {
                    debug!(key = item.key, "Skipping key without a clip timestamp");
                    continue;
                };
                if in_window(timestamp, window, margin) {
                    found.push(ClipRef { key: item.key, timestamp, size: item.size });
                }
            }

            token = page.next_token;
            if token.is_none() {
                break;
            }
        }

        info!(prefix = %prefix, pages, clips = found.len() - before, "Prefix scanned");
    }

    // Stable: equal timestamps keep discovery order.
    found.sort_by_key(|c| c.timestamp);

    if found.is_empty() {
        return Err(MergeError::NotFound {
            camera: window.camera,
            start: window.start,
            end: window.end,
        });
    }
    Ok(found)
}
