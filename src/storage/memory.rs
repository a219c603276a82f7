// This software is provided for non-commercial use only.
// Commercial use is strictly prohibited.
// If you use, modify, or redistribute this software, you must provide proper attribution to the original author.
// (c) 2026 Onur Tuna. All rights reserved.

//! In-memory object store.
//!
//! Objects live in one ordered map keyed by `(bucket, key)`; listings return
//! keys in lexical order, `page_size` at a time, with the last returned key as
//! the continuation token.

use std::collections::BTreeMap;
use std::io::Cursor;
use std::ops::Bound;

use bytes::Bytes;
use parking_lot::RwLock;

use super::{ListPage, ObjectBody, ObjectEntry, ObjectStore, StoreError};

const DEFAULT_PAGE_SIZE: usize = 1000;

pub struct InMemoryStore {
    objects: RwLock<BTreeMap<(String, String), Bytes>>,
    page_size: usize,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::with_page_size(DEFAULT_PAGE_SIZE)
    }

    /// Store that returns at most `page_size` entries per listing page.
    pub fn with_page_size(page_size: usize) -> Self {
        Self { objects: RwLock::new(BTreeMap::new()), page_size: page_size.max(1) }
    }

    /// Insert or replace an object.
    pub fn put(&self, bucket: &str, key: &str, data: impl Into<Bytes>) {
        self.objects.write().insert((bucket.to_string(), key.to_string()), data.into());
    }
}

impl ObjectStore for InMemoryStore {
    async fn list_page(
        &self,
        bucket: &str,
        prefix: &str,
        continuation: Option<&str>,
    ) -> Result<ListPage, StoreError> {
        let objects = self.objects.read();
        let lower = match continuation {
            Some(after) => Bound::Excluded((bucket.to_string(), after.to_string())),
            None => Bound::Included((bucket.to_string(), prefix.to_string())),
        };

        let mut matching = objects
            .range((lower, Bound::Unbounded))
            .take_while(|((b, k), _)| b == bucket && k.starts_with(prefix))
            .map(|((_, k), v)| ObjectEntry { key: k.clone(), size: v.len() as u64 });

        let items: Vec<ObjectEntry> = matching.by_ref().take(self.page_size).collect();
        let next_token = match matching.next() {
            Some(_) => items.last().map(|e| e.key.clone()),
            None => None,
        };
        Ok(ListPage { items, next_token })
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<ObjectBody, StoreError> {
        let data = self
            .objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NoSuchKey {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })?;
        Ok(Box::pin(Cursor::new(data)))
    }
}
