//! S3-compatible object store (Backblaze B2, AWS S3, MinIO, R2).
//!
//! The client is built from an explicit [`StoreConfig`]: named credentials
//! profile, region, optional endpoint override and addressing style.

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::Client;
use tracing::{debug, info};

use super::{ListPage, ObjectBody, ObjectEntry, ObjectStore, StoreError};
use crate::config::StoreConfig;

pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Build a client for `cfg`. Credentials are resolved lazily on first request.
    pub async fn connect(cfg: &StoreConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.region.clone()));
        if let Some(profile) = &cfg.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &cfg.endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let shared = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared)
            .force_path_style(cfg.force_path_style)
            .build();

        info!(
            region = cfg.region,
            profile = cfg.profile.as_deref().unwrap_or("default"),
            endpoint = cfg.endpoint.as_deref().unwrap_or("aws"),
            "S3 client configured"
        );

        Self { client: Client::from_conf(s3_config) }
    }
}

impl ObjectStore for S3Store {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        let resp = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .prefix(prefix)
            .set_continuation_token(continuation.map(str::to_owned))
            .send()
            .await
            .map_err(|e| StoreError::Backend(format!("ListObjectsV2 {bucket}/{prefix}: {}", DisplayErrorContext(&e))))?;

        let items = resp
            .contents()
            .iter()
            .filter_map(|o| {
                let key = o.key()?.to_string();
                let size = o.size().unwrap_or(0).max(0) as u64;
                Some(ObjectEntry { key, size })
            })
            .collect::<Vec<_>>();

        let next_token = if resp.is_truncated().unwrap_or(false) {
            resp.next_continuation_token().map(str::to_owned)
        } else {
            None
        };
        debug!(bucket, prefix, items = items.len(), truncated = next_token.is_some(), "Listed page");
        Ok(ListPage { items, next_token })
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<ObjectBody, StoreError> {
        let out = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let no_such_key = e
                    .as_service_error()
                    .map(|se| se.is_no_such_key())
                    .unwrap_or(false);
                if no_such_key {
                    StoreError::NoSuchKey { bucket: bucket.to_string(), key: key.to_string() }
                } else {
                    StoreError::Backend(format!("GetObject {bucket}/{key}: {}", DisplayErrorContext(&e)))
                }
            })?;
        Ok(Box::pin(out.body.into_async_read()))
    }
}
