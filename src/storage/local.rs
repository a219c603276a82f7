//! Directory-mirror object store.
//!
//! A bucket synced to disk (`rclone sync`, `aws s3 sync`, …) keeps its key
//! hierarchy as directories:
//!
//! ```text
//! <root>/<bucket>/cam1/2025/10/26/09/cam_1_2025_10_26_09_00_00.ts
//! ```
//!
//! Listings walk the directory named by the prefix and page through the
//! matching keys in lexical order.

use std::io::ErrorKind;
use std::path::PathBuf;

use tokio::fs;
use tracing::debug;

use super::{ListPage, ObjectBody, ObjectEntry, ObjectStore, StoreError};

const DEFAULT_PAGE_SIZE: usize = 1000;

pub struct LocalDirStore {
    root: PathBuf,
    page_size: usize,
}

impl LocalDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), page_size: DEFAULT_PAGE_SIZE }
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, StoreError> {
        let mut path = self.bucket_path(bucket)?;
        for part in key.split('/') {
            if part.is_empty() || part == "." || part == ".." {
                return Err(StoreError::Backend(format!("unsupported object key {key:?}")));
            }
            path.push(part);
        }
        Ok(path)
    }

    fn bucket_path(&self, bucket: &str) -> Result<PathBuf, StoreError> {
        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
            return Err(StoreError::Backend(format!("unsupported bucket name {bucket:?}")));
        }
        Ok(self.root.join(bucket))
    }
}

/// Recursively collect every file below `dir` as a `/`-joined key rooted at
/// `key_prefix`. A missing directory contributes nothing.
async fn collect_keys(dir: PathBuf, key_prefix: String) -> Result<Vec<ObjectEntry>, StoreError> {
    let mut out = Vec::new();
    let mut pending = vec![(dir, key_prefix)];

    while let Some((dir, prefix)) = pending.pop() {
        let mut entries = match fs::read_dir(&dir).await {
            Ok(rd) => rd,
            Err(e) if e.kind() == ErrorKind::NotFound => continue,
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                debug!(path = ?entry.path(), "Skipping non UTF-8 file name");
                continue;
            };
            let key = format!("{prefix}{name}");
            let file_type = entry.file_type().await?;
            if file_type.is_dir() {
                pending.push((entry.path(), format!("{key}/")));
            } else if file_type.is_file() {
                let size = entry.metadata().await?.len();
                out.push(ObjectEntry { key, size });
            }
        }
    }
    Ok(out)
}

impl ObjectStore for LocalDirStore {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        // Walk from the deepest complete directory named by the prefix.
        let dir_part = match prefix.rfind('/') {
            Some(i) => &prefix[..=i],
            None => "",
        };
        let mut dir = self.bucket_path(bucket)?;
        for part in dir_part.split('/').filter(|p| !p.is_empty()) {
            if part == "." || part == ".." {
                return Err(StoreError::Backend(format!("unsupported prefix {prefix:?}")));
            }
            dir.push(part);
        }

        let mut keys: Vec<ObjectEntry> = collect_keys(dir, dir_part.to_string())
            .await?
            .into_iter()
            .filter(|e| e.key.starts_with(prefix))
            .filter(|e| continuation.map_or(true, |after| e.key.as_str() > after))
            .collect();
        keys.sort_by(|a, b| a.key.cmp(&b.key));

        let next_token = if keys.len() > self.page_size {
            keys.truncate(self.page_size);
            keys.last().map(|e| e.key.clone())
        } else {
            None
        };
        Ok(ListPage { items: keys, next_token })
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<ObjectBody, StoreError> {
        let path = self.object_path(bucket, key)?;
        match fs::File::open(&path).await {
            Ok(f) => Ok(Box::pin(f)),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StoreError::NoSuchKey {
                bucket: bucket.to_string(),
                key: key.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}
