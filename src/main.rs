//! clipmerge — merge a camera's uploaded segments into one `.ts` file.
//!
//! Usage:
//!   clipmerge merge --camera cam2 --start 2025-10-26T09:00:00+05:30 --duration 7200
//!   clipmerge merge --camera 1 --start "2025-10-26 09:00:00" --duration 600 --out-dir merges/
//!   clipmerge list  --camera cam1 --start 2025-10-26T09:00:00+05:30 --duration 3600 --json

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::EnvFilter;

use clipmerge::camera::CameraInput;
use clipmerge::config::{BackendKind, Config};
use clipmerge::merge::{merge_range, MergeRequest, MergeSettings, OutputTarget, ResolvedRequest};
use clipmerge::progress::TracingProgress;
use clipmerge::storage::StoreBackend;
use clipmerge::timekey::{format_filename_stamp, StartTime};

#[derive(Parser)]
#[command(name = "clipmerge", about = "Merge camera segments from object storage", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Download the window's segments and concatenate them into one file.
    Merge {
        #[command(flatten)]
        window: WindowArgs,
        #[command(flatten)]
        store: StoreArgs,
        /// Directory for the auto-named output file.
        #[arg(long, conflicts_with = "output")]
        out_dir: Option<PathBuf>,
        /// Exact output file path.
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },
    /// List the segments a merge would use, without downloading them.
    List {
        #[command(flatten)]
        window: WindowArgs,
        #[command(flatten)]
        store: StoreArgs,
        /// Print the clip list as JSON.
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args)]
struct WindowArgs {
    /// Camera: cam1, cam2, 1, 2, …
    #[arg(long)]
    camera: String,
    /// Start: RFC 3339 with offset, epoch milliseconds, or local `YYYY-MM-DD HH:MM:SS`.
    #[arg(long)]
    start: String,
    /// Window length in seconds.
    #[arg(short, long)]
    duration: u64,
}

#[derive(Args)]
struct StoreArgs {
    /// Path to a TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    #[arg(long)]
    bucket: Option<String>,
    /// Local offset in minutes east of UTC (IST = 330).
    #[arg(long, allow_hyphen_values = true)]
    offset_minutes: Option<i32>,
    /// Look-back before the start, in seconds.
    #[arg(long)]
    margin_secs: Option<u64>,
    /// Credentials profile.
    #[arg(long)]
    profile: Option<String>,
    #[arg(long)]
    region: Option<String>,
    /// S3 endpoint URL.
    #[arg(long)]
    endpoint: Option<String>,
    #[arg(long)]
    force_path_style: bool,
    /// Read from a local mirror `<root>/<bucket>/…` instead of S3.
    #[arg(long)]
    local_root: Option<PathBuf>,
}

impl StoreArgs {
    /// File (or built-in defaults) overridden by flags, then validated.
    fn load_config(&self) -> Result<Config> {
        let mut cfg = match &self.config {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => Config::default(),
        };

        if let Some(b) = &self.bucket {
            cfg.store.bucket = b.clone();
        }
        if let Some(o) = self.offset_minutes {
            cfg.merge.offset_minutes = o;
        }
        if let Some(m) = self.margin_secs {
            cfg.merge.boundary_margin_secs = m;
        }
        if let Some(p) = &self.profile {
            cfg.store.profile = Some(p.clone());
        }
        if let Some(r) = &self.region {
            cfg.store.region = r.clone();
        }
        if let Some(e) = &self.endpoint {
            cfg.store.endpoint = Some(e.clone());
        }
        if self.force_path_style {
            cfg.store.force_path_style = true;
        }
        if let Some(root) = &self.local_root {
            cfg.store.backend = BackendKind::Local;
            cfg.store.local_root = Some(root.clone());
        }

        cfg.validate()?;
        Ok(cfg)
    }
}

impl WindowArgs {
    fn request(&self) -> MergeRequest {
        MergeRequest::new(
            CameraInput::Text(self.camera.clone()),
            StartTime::Text(self.start.clone()),
            self.duration,
        )
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Merge { window, store, out_dir, output, json } => {
            run_merge(window, store, out_dir, output, json).await
        }
        Command::List { window, store, json } => run_list(window, store, json).await,
    };

    if let Err(e) = outcome {
        error!(error = %e, "Command failed");
        eprintln!("merge failed: {e:#}");
        std::process::exit(1);
    }
}

async fn run_merge(
    window: WindowArgs,
    store_args: StoreArgs,
    out_dir: Option<PathBuf>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let cfg = store_args.load_config()?;
    let settings = MergeSettings::from(&cfg);

    let mut req = window.request();
    req.output = match (output, out_dir) {
        (Some(file), _) => Some(OutputTarget::File(file)),
        (None, Some(dir)) => Some(OutputTarget::Directory(dir)),
        (None, None) => None,
    };

    let store = StoreBackend::connect(&cfg.store).await?;
    let result = merge_range(&store, &req, &settings, &TracingProgress).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "[merge] DONE → {}  parts={}  bytes={}",
            result.output_path.display(),
            result.part_count,
            result.total_bytes
        );
    }
    Ok(())
}

async fn run_list(window: WindowArgs, store_args: StoreArgs, json: bool) -> Result<()> {
    let cfg = store_args.load_config()?;
    let settings = MergeSettings::from(&cfg);

    let resolved = ResolvedRequest::resolve(&window.request(), &settings, Utc::now())?;
    let store = StoreBackend::connect(&cfg.store).await?;
    let clips = resolved.discover(&store).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&clips)?);
        return Ok(());
    }

    let total: u64 = clips.iter().map(|c| c.size).sum();
    println!("=== {} ===", resolved.window.camera);
    println!("Window : {} — {}", resolved.window.start, resolved.window.end);
    println!("Clips  : {}  ({} bytes)", clips.len(), total);
    for (i, clip) in clips.iter().enumerate() {
        println!(
            "  {:>4}  {}  {:>12}  {}",
            i + 1,
            format_filename_stamp(clip.timestamp, resolved.offset_minutes),
            clip.size,
            clip.key
        );
    }
    Ok(())
}
