//! Metadata store boundary: the persistence trait the service talks to,
//! the owner/visibility filter, and the store-side error type.

pub mod memory;
pub mod sqlite;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::bucket::{Bucket, VersioningStatus};

/// Errors produced at the metadata store boundary.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The bucket name is already present. Raised by [`BucketStore::insert`]
    /// when the uniqueness constraint fires, including when a concurrent
    /// writer claimed the name between lookup and insert.
    #[error("bucket name `{0}` is already taken")]
    NameTaken(String),

    /// The record to delete was not there.
    #[error("no metadata record for bucket `{0}`")]
    Missing(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Owner/visibility filter for listing and counting buckets.
///
/// Matching is query-by-example: an owner field set to `Some` must equal
/// the record's value, and `hidden` always must equal the record's flag
/// (`hidden: false` selects visible buckets, `hidden: true` hidden ones).
#[derive(Clone, Debug, Default)]
pub struct BucketFilter {
    pub owner_canonical_id: Option<String>,
    pub owner_iam_user_id: Option<String>,
    pub hidden: bool,
}

impl BucketFilter {
    /// Whether `bucket` satisfies this filter.
    pub fn matches(&self, bucket: &Bucket) -> bool {
        if let Some(owner) = &self.owner_canonical_id {
            if &bucket.owner_canonical_id != owner {
                return false;
            }
        }
        if let Some(user) = &self.owner_iam_user_id {
            if &bucket.owner_iam_user_id != user {
                return false;
            }
        }
        bucket.hidden == self.hidden
    }
}

/// Persistence contract for bucket metadata records.
///
/// Implementations supply their own atomicity and locking. The service
/// layer relies on two guarantees in particular: `insert` must reject a
/// duplicate name with [`StoreError::NameTaken`], and `update_versioning`
/// must apply its change only while the stored status still matches the
/// expected one. `find_all` returns records ordered by name ascending.
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Look up one record by bucket name.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Bucket>>;

    /// All records matching `filter`, ordered by name.
    async fn find_all(&self, filter: &BucketFilter) -> StoreResult<Vec<Bucket>>;

    /// Number of records matching `filter`.
    async fn count(&self, filter: &BucketFilter) -> StoreResult<u64>;

    /// Persist a new record. Fails with [`StoreError::NameTaken`] when the
    /// name is already present.
    async fn insert(&self, bucket: &Bucket) -> StoreResult<()>;

    /// Guarded status update: set `name`'s versioning status to `next` only
    /// while it still equals `expected`. Returns false when no record
    /// matched, either because another writer moved the status first or
    /// because the record vanished.
    async fn update_versioning(
        &self,
        name: &str,
        expected: VersioningStatus,
        next: VersioningStatus,
    ) -> StoreResult<bool>;

    /// Remove a record. Fails with [`StoreError::Missing`] when it is
    /// already gone.
    async fn delete(&self, bucket: &Bucket) -> StoreResult<()>;
}
