// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Per-clip progress reporting.

use tracing::info;

/// Receives one call per clip, before its bytes are fetched.
///
/// Purely informational: an observer has no way to fail the merge.
pub trait ProgressObserver: Send + Sync {
    /// `index` is 1-based; `size` is the store-reported byte length.
    fn on_progress(&self, index: usize, total: usize, key: &str, size: u64);
}

/// Logs each clip at `info` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl ProgressObserver for TracingProgress {
    fn on_progress(&self, index: usize, total: usize, key: &str, size: u64) {
        info!(index, total, key, size, "Merging clip");
    }
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_progress(&self, _index: usize, _total: usize, _key: &str, _size: u64) {}
}
