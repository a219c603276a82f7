use serde::Deserialize;
use std::path::PathBuf;
use crate::error::{MergeError, Result};

/// Top-level configuration loaded from a TOML file.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    /// Object storage connection.
    #[serde(default)]
    pub store: StoreConfig,
    /// Merge defaults.
    #[serde(default)]
    pub merge: MergeConfig,
}

/// Which object store implementation to talk to.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// S3-compatible HTTP API.
    #[default]
    S3,
    /// Local directory mirror of the bucket.
    Local,
}

/// Object storage parameters. Passed explicitly to the backend; no client
/// is shared process-wide.
#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: BackendKind,
    /// Bucket holding `camN/YYYY/MM/DD/HH/` folders.
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Named credentials profile (`~/.aws/credentials`).
    #[serde(default = "default_profile")]
    pub profile: Option<String>,
    #[serde(default = "default_region")]
    pub region: String,
    /// Endpoint override for non-AWS providers.
    #[serde(default = "default_endpoint")]
    pub endpoint: Option<String>,
    /// Use `endpoint/bucket/key` instead of virtual-hosted addressing.
    #[serde(default)]
    pub force_path_style: bool,
    /// Mirror root for the `local` backend.
    #[serde(default)]
    pub local_root: Option<PathBuf>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            bucket: default_bucket(),
            profile: default_profile(),
            region: default_region(),
            endpoint: default_endpoint(),
            force_path_style: false,
            local_root: None,
        }
    }
}

/// Parameters of the merge itself.
#[derive(Debug, Deserialize, Clone)]
pub struct MergeConfig {
    /// Fixed local offset, minutes east of UTC, used in segment keys.
    #[serde(default = "default_offset_minutes")]
    pub offset_minutes: i32,
    /// Look-back before the window start so a segment straddling the start
    /// boundary is still included.
    #[serde(default = "default_boundary_margin")]
    pub boundary_margin_secs: u64,
    /// Directory for auto-named output files.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            offset_minutes: default_offset_minutes(),
            boundary_margin_secs: default_boundary_margin(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_bucket() -> String { "visd-cctv".into() }
fn default_profile() -> Option<String> { Some("b2".into()) }
fn default_region() -> String { "ca-east-006".into() }
fn default_endpoint() -> Option<String> { Some("https://s3.ca-east-006.backblazeb2.com".into()) }
fn default_offset_minutes() -> i32 { 330 }
fn default_boundary_margin() -> u64 { crate::locator::DEFAULT_BOUNDARY_MARGIN_SECS }
fn default_output_dir() -> PathBuf { PathBuf::from(".") }

/// Largest accepted offset magnitude, exclusive (one day).
pub const MAX_OFFSET_MINUTES: i32 = 24 * 60;

/// Largest accepted boundary margin (one day).
pub const MAX_BOUNDARY_MARGIN_SECS: u64 = 24 * 60 * 60;

impl Config {
    /// Load configuration from a TOML file at `path`.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| MergeError::Config(format!("Cannot read config file: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| MergeError::Config(format!("Invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.store.bucket.trim().is_empty() {
            return Err(MergeError::Config("bucket must not be empty".into()));
        }
        if self.store.backend == BackendKind::Local && self.store.local_root.is_none() {
            return Err(MergeError::Config("local backend requires store.local_root".into()));
        }
        validate_offset(self.merge.offset_minutes)
            .map_err(|_| MergeError::Config(format!(
                "offset_minutes must be within ±{}", MAX_OFFSET_MINUTES - 1
            )))?;
        if self.merge.boundary_margin_secs > MAX_BOUNDARY_MARGIN_SECS {
            return Err(MergeError::Config(format!(
                "boundary_margin_secs must be <= {MAX_BOUNDARY_MARGIN_SECS}"
            )));
        }
        Ok(())
    }
}

/// Reject offsets of a day or more.
pub fn validate_offset(offset_minutes: i32) -> Result<()> {
    if offset_minutes.unsigned_abs() >= MAX_OFFSET_MINUTES as u32 {
        return Err(MergeError::InvalidInput(format!(
            "offset must be within ±{} minutes; got: {offset_minutes}",
            MAX_OFFSET_MINUTES - 1
        )));
    }
    Ok(())
}
