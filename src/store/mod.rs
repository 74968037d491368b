//! Cache bucket storage.
//!
//! A [`CacheStore`] holds named buckets of request-keyed response
//! snapshots. Buckets are opened (created if absent) at install time and
//! are append-only afterwards: only the install path writes, fetch
//! handling only reads, and nothing in this crate ever deletes an entry.
//! Stale buckets left behind by earlier cache names are not cleaned up;
//! changing the bucket name is the invalidation mechanism.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use crate::http::{CacheKey, Response};

/// Errors surfaced by a cache storage backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A write was issued against a bucket that was never opened.
    #[error("cache bucket {name:?} has not been opened")]
    UnknownBucket { name: String },

    /// The backend itself failed (I/O, quota, corruption...).
    #[error("cache storage backend error: {0}")]
    Backend(String),
}

/// Capability interface for cache bucket storage.
///
/// The worker only needs three operations: open-or-create a bucket, write
/// an entry during install, and look an entry up during fetch handling.
/// `contains` and `len` exist for introspection and tests.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Opens the named bucket, creating it if it does not exist.
    /// Opening an existing bucket keeps its entries.
    async fn open(&self, name: &str) -> Result<(), StoreError>;

    /// Stores a response snapshot under `key`, overwriting any previous
    /// entry for the same key.
    async fn put(&self, bucket: &str, key: CacheKey, response: Response) -> Result<(), StoreError>;

    /// Returns the stored snapshot for `key`, or `None` on a miss.
    /// Looking up in a bucket that was never opened is a miss, not an error.
    async fn lookup(&self, bucket: &str, key: &CacheKey) -> Result<Option<Response>, StoreError>;

    /// Returns `true` if the bucket holds an entry for `key`.
    async fn contains(&self, bucket: &str, key: &CacheKey) -> Result<bool, StoreError> {
        Ok(self.lookup(bucket, key).await?.is_some())
    }

    /// Number of entries in the bucket; zero if it was never opened.
    async fn len(&self, bucket: &str) -> Result<usize, StoreError>;
}

/// In-process [`CacheStore`] backend.
///
/// Entries live for the lifetime of the value; two `MemoryStore`s never
/// share state, which is what gives deployment variants isolated scopes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    buckets: Mutex<HashMap<String, HashMap<CacheKey, Response>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheStore for MemoryStore {
    async fn open(&self, name: &str) -> Result<(), StoreError> {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        buckets.entry(name.to_owned()).or_default();
        debug!(bucket = %name, "cache bucket opened");
        Ok(())
    }

    async fn put(&self, bucket: &str, key: CacheKey, response: Response) -> Result<(), StoreError> {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        let entries = buckets
            .get_mut(bucket)
            .ok_or_else(|| StoreError::UnknownBucket {
                name: bucket.to_owned(),
            })?;
        debug!(bucket = %bucket, key = %key, "cache entry stored");
        entries.insert(key, response);
        Ok(())
    }

    async fn lookup(&self, bucket: &str, key: &CacheKey) -> Result<Option<Response>, StoreError> {
        let buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        Ok(buckets.get(bucket).and_then(|entries| entries.get(key)).cloned())
    }

    async fn len(&self, bucket: &str) -> Result<usize, StoreError> {
        let buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        Ok(buckets.get(bucket).map_or(0, HashMap::len))
    }
}
