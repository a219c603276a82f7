// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! Object storage — the bucket of uploaded camera segments.
//!
//! The merge pipeline only needs two calls: a prefix-scoped, paginated
//! listing and a whole-object read. Backends:
//!
//!  - [`s3::S3Store`] — S3-compatible services (Backblaze B2, AWS, MinIO).
//!  - [`local::LocalDirStore`] — a directory mirror `<root>/<bucket>/<key>`.
//!  - [`memory::InMemoryStore`] — process-local map, used by tests.

pub mod local;
pub mod memory;
#[cfg(feature = "s3")]
pub mod s3;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;
use tokio::io::AsyncRead;

use crate::config::{BackendKind, StoreConfig};
use crate::error::{MergeError, Result};

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{bucket}/{key} does not exist")]
    NoSuchKey { bucket: String, key: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Backend(String),
}

/// One object returned by a listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectEntry {
    pub key: String,
    /// Size in bytes as reported by the store.
    pub size: u64,
}

/// One page of a prefix listing.
#[derive(Debug, Clone, Default)]
pub struct ListPage {
    pub items: Vec<ObjectEntry>,
    /// Pass back to [`ObjectStore::list_page`] to fetch the next page;
    /// `None` once the listing is exhausted.
    pub next_token: Option<String>,
}

/// Readable body of a retrieved object.
pub type ObjectBody = Pin<Box<dyn AsyncRead + Send>>;

/// Prefix listing + object retrieval.
pub trait ObjectStore: Send + Sync {
    /// List objects under `prefix`, resuming from `continuation` when given.
    fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> impl Future<Output = std::result::Result<ListPage, StoreError>> + Send;

    /// Open the full body of `key` for reading.
    fn get(
        &self,
        bucket: &str,
        key: &str,
    ) -> impl Future<Output = std::result::Result<ObjectBody, StoreError>> + Send;
}

/// Backend selected by configuration.
pub enum StoreBackend {
    #[cfg(feature = "s3")]
    S3(s3::S3Store),
    Local(local::LocalDirStore),
}

impl StoreBackend {
    /// Build the backend named by `cfg`. Credentials and endpoint come from
    /// `cfg` only; nothing is shared process-wide.
    pub async fn connect(cfg: &StoreConfig) -> Result<Self> {
        match cfg.backend {
            #[cfg(feature = "s3")]
            BackendKind::S3 => Ok(StoreBackend::S3(s3::S3Store::connect(cfg).await)),
            #[cfg(not(feature = "s3"))]
            BackendKind::S3 => Err(MergeError::Config(
                "backend \"s3\" requires building with the `s3` feature".into(),
            )),
            BackendKind::Local => {
                let root = cfg.local_root.clone().ok_or_else(|| {
                    MergeError::Config("local backend requires store.local_root".into())
                })?;
                Ok(StoreBackend::Local(local::LocalDirStore::new(root)))
            }
        }
    }
}

impl ObjectStore for StoreBackend {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> std::result::Result<ListPage, StoreError> {
        match self {
            #[cfg(feature = "s3")]
            StoreBackend::S3(s) => s.list_page(bucket, prefix, continuation).await,
            StoreBackend::Local(s) => s.list_page(bucket, prefix, continuation).await,
        }
    }

    async fn get(&self, bucket: &str, key: &str) -> std::result::Result<ObjectBody, StoreError> {
        match self {
            #[cfg(feature = "s3")]
            StoreBackend::S3(s) => s.get(bucket, key).await,
            StoreBackend::Local(s) => s.get(bucket, key).await,
        }
    }
}
