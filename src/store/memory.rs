//! In-memory implementation of the metadata store.
//!
//! Backs tests and embedded use. The whole namespace lives in one
//! RwLock-guarded map, honoring the same contract as the SQLite store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::bucket::{Bucket, VersioningStatus};
use crate::store::{BucketFilter, BucketStore, StoreError, StoreResult};

/// Bucket records held in process memory.
#[derive(Default)]
pub struct InMemoryBucketStore {
    buckets: RwLock<HashMap<String, Bucket>>,
}

impl InMemoryBucketStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BucketStore for InMemoryBucketStore {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Bucket>> {
        Ok(self.buckets.read().await.get(name).cloned())
    }

    async fn find_all(&self, filter: &BucketFilter) -> StoreResult<Vec<Bucket>> {
        let buckets = self.buckets.read().await;
        let mut matched: Vec<Bucket> = buckets
            .values()
            .filter(|b| filter.matches(b))
            .cloned()
            .collect();
        matched.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(matched)
    }

    async fn count(&self, filter: &BucketFilter) -> StoreResult<u64> {
        let buckets = self.buckets.read().await;
        Ok(buckets.values().filter(|b| filter.matches(b)).count() as u64)
    }

    async fn insert(&self, bucket: &Bucket) -> StoreResult<()> {
        let mut buckets = self.buckets.write().await;
        if buckets.contains_key(&bucket.name) {
            return Err(StoreError::NameTaken(bucket.name.clone()));
        }
        buckets.insert(bucket.name.clone(), bucket.clone());
        Ok(())
    }

    async fn update_versioning(
        &self,
        name: &str,
        expected: VersioningStatus,
        next: VersioningStatus,
    ) -> StoreResult<bool> {
        let mut buckets = self.buckets.write().await;
        match buckets.get_mut(name) {
            Some(bucket) if bucket.versioning_status == expected => {
                bucket.versioning_status = next;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, bucket: &Bucket) -> StoreResult<()> {
        let mut buckets = self.buckets.write().await;
        if buckets.remove(&bucket.name).is_none() {
            return Err(StoreError::Missing(bucket.name.clone()));
        }
        Ok(())
    }
}
