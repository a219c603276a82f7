// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Merge: retrieve a camera's segments for a time window and concatenate
//! them into one `.ts` file.
//!
//! ```text
//! MergeRequest ─→ MergeWindow ─→ plan_prefixes ─→ locate_clips ─→ merge_clips ─→ MergeResult
//! ```
//!
//! Segments are appended byte-for-byte in chronological order, one at a
//! time. The output plays in VLC, ffplay or any MPEG-TS-aware player as long
//! as every uploaded segment is a self-contained transport stream; nothing
//! here inspects or repairs the container.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::io::AsyncWrite;
use tracing::{info, warn};

use crate::camera::{CameraId, CameraInput};
use crate::config::{validate_offset, Config, MAX_BOUNDARY_MARGIN_SECS};
use crate::error::{MergeError, Result};
use crate::locator::{locate_clips, ClipRef};
use crate::planner::{ensure_plannable, plan_prefixes, MergeWindow};
use crate::progress::ProgressObserver;
use crate::sink::OutputSink;
use crate::storage::ObjectStore;
use crate::timekey::{format_filename_stamp, StartTime, CLIP_EXTENSION};

/// Outcome of a successful merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeResult {
    pub output_path: PathBuf,
    /// Number of segments appended.
    pub part_count: usize,
    /// Sum of store-reported segment sizes.
    pub total_bytes: u64,
}

/// Where the merged stream is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    /// Auto-named `<camera>_<stamp>_<duration>.ts` inside this directory.
    Directory(PathBuf),
    /// Exactly this file.
    File(PathBuf),
}

/// One merge invocation as supplied by a caller.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pub camera: CameraInput,
    pub start: StartTime,
    pub duration_secs: u64,
    /// Defaults to [`MergeSettings::output_dir`].
    pub output: Option<OutputTarget>,
    /// Defaults to [`MergeSettings::bucket`].
    pub bucket: Option<String>,
    /// Defaults to [`MergeSettings::offset_minutes`].
    pub offset_minutes: Option<i32>,
}

impl MergeRequest {
    pub fn new(camera: impl Into<CameraInput>, start: StartTime, duration_secs: u64) -> Self {
        Self {
            camera: camera.into(),
            start,
            duration_secs,
            output: None,
            bucket: None,
            offset_minutes: None,
        }
    }
}

/// Operator defaults that a [`MergeRequest`] may override.
#[derive(Debug, Clone)]
pub struct MergeSettings {
    pub bucket: String,
    pub offset_minutes: i32,
    pub boundary_margin: Duration,
    pub output_dir: PathBuf,
}

impl Default for MergeSettings {
    fn default() -> Self {
        MergeSettings::from(&Config::default())
    }
}

impl From<&Config> for MergeSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            bucket: cfg.store.bucket.clone(),
            offset_minutes: cfg.merge.offset_minutes,
            boundary_margin: Duration::seconds(cfg.merge.boundary_margin_secs.min(MAX_BOUNDARY_MARGIN_SECS) as i64),
            output_dir: cfg.merge.output_dir.clone(),
        }
    }
}

/// A validated request: everything needed before touching storage.
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub window: MergeWindow,
    pub bucket: String,
    pub offset_minutes: i32,
    pub boundary_margin: Duration,
    pub output_path: PathBuf,
}

impl ResolvedRequest {
    /// Validate `req` against `settings` at wall-clock `now`. Performs no I/O.
    pub fn resolve(req: &MergeRequest, settings: &MergeSettings, now: DateTime<Utc>) -> Result<Self> {
        let camera = CameraId::canonicalize(&req.camera)?;
        let offset_minutes = req.offset_minutes.unwrap_or(settings.offset_minutes);
        validate_offset(offset_minutes)?;
        let bucket = req.bucket.clone().unwrap_or_else(|| settings.bucket.clone());
        if bucket.trim().is_empty() {
            return Err(MergeError::InvalidInput("bucket must not be empty".into()));
        }

        let start = req.start.resolve(offset_minutes)?;
        let window = MergeWindow::new(camera, start, req.duration_secs, now)?;
        ensure_plannable(&window, settings.boundary_margin, offset_minutes)?;

        let file_name = output_file_name(camera, start, offset_minutes, req.duration_secs);
        let output_path = match &req.output {
            Some(OutputTarget::File(path)) => path.clone(),
            Some(OutputTarget::Directory(dir)) => dir.join(file_name),
            None => settings.output_dir.join(file_name),
        };

        Ok(Self {
            window,
            bucket,
            offset_minutes,
            boundary_margin: settings.boundary_margin,
            output_path,
        })
    }

    /// Find the clips for this window, oldest first.
    ///
    /// Prefixes are planned from `start - margin` so a boundary segment that
    /// began in the previous local hour is listed too.
    pub async fn discover<S: ObjectStore>(&self, store: &S) -> Result<Vec<ClipRef>> {
        let w = &self.window;
        let prefixes = plan_prefixes(
            w.camera,
            w.start - self.boundary_margin,
            w.end,
            self.offset_minutes,
        );
        info!(
            camera = %w.camera,
            start = %w.start,
            end = %w.end,
            prefixes = prefixes.len(),
            "Locating clips"
        );
        locate_clips(store, &self.bucket, &prefixes, w, self.offset_minutes, self.boundary_margin).await
    }
}

/// `<camera>_<YYYY_MM_DD_HH_MM_SS>_<duration>.ts`, stamped in local time.
pub fn output_file_name(
    camera: CameraId,
    start: DateTime<Utc>,
    offset_minutes: i32,
    duration_secs: u64,
) -> String {
    let stamp = format_filename_stamp(start, offset_minutes);
    format!("{camera}_{stamp}_{duration_secs}{CLIP_EXTENSION}")
}

/// Append every clip, in order, to `sink` and close it.
///
/// A failed retrieval or write aborts immediately; whatever was already
/// written stays in the sink.
pub async fn merge_clips<S, W>(
    store: &S,
    bucket: &str,
    clips: &[ClipRef],
    mut sink: OutputSink<W>,
    observer: &dyn ProgressObserver,
) -> Result<MergeResult>
where
    S: ObjectStore,
    W: AsyncWrite + Unpin + Send,
{
    let total = clips.len();
    let mut total_bytes: u64 = 0;
    let mut part_count = 0usize;

    for (i, clip) in clips.iter().enumerate() {
        observer.on_progress(i + 1, total, &clip.key, clip.size);

        let mut body = store
            .get(bucket, &clip.key)
            .await
            .map_err(|e| MergeError::transfer(format!("get {bucket}/{}", clip.key), e))?;
        let copied = match sink.append(&mut body).await {
            Ok(n) => n,
            Err(e) => {
                let context = format!("write {} to {:?}", clip.key, sink.path());
                return Err(MergeError::transfer(context, e));
            }
        };
        if copied != clip.size {
            warn!(key = clip.key, listed = clip.size, copied, "Clip size differs from listing");
        }

        total_bytes += clip.size;
        part_count += 1;
    }

    let output_path = sink
        .close()
        .await
        .map_err(|e| MergeError::transfer("close output", e))?;

    info!(
        output = ?output_path,
        parts = part_count,
        bytes = total_bytes,
        "Merge complete"
    );

    Ok(MergeResult { output_path, part_count, total_bytes })
}

/// Merge `req` as of the current wall-clock time.
pub async fn merge_range<S: ObjectStore>(
    store: &S,
    req: &MergeRequest,
    settings: &MergeSettings,
    observer: &dyn ProgressObserver,
) -> Result<MergeResult> {
    merge_range_at(store, req, settings, observer, Utc::now()).await
}

/// [`merge_range`] with an explicit "now" used to clamp the window end.
///
/// The output file is only created once at least one clip was found.
pub async fn merge_range_at<S: ObjectStore>(
    store: &S,
    req: &MergeRequest,
    settings: &MergeSettings,
    observer: &dyn ProgressObserver,
    now: DateTime<Utc>,
) -> Result<MergeResult> {
    let resolved = ResolvedRequest::resolve(req, settings, now)?;
    let clips = resolved.discover(store).await?;

    let sink = OutputSink::create(&resolved.output_path)
        .await
        .map_err(|e| MergeError::transfer(format!("create {:?}", resolved.output_path), e))?;

    merge_clips(store, &resolved.bucket, &clips, sink, observer).await
}
