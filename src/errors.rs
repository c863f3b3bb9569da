//! Error types surfaced by the bucket metadata service.

use thiserror::Error;

use crate::backend::BackendError;
use crate::models::bucket::VersioningStatus;
use crate::store::StoreError;

/// Failure kinds surfaced by
/// [`BucketService`](crate::services::bucket_service::BucketService).
///
/// Every failure is classified; callers never see a stringly-typed error.
/// `code`/`http_status` give the S3-compatible rendering an eventual wire
/// layer would answer with.
#[derive(Debug, Error)]
pub enum BucketError {
    /// The caller already owns a bucket with this name. Distinguished from
    /// [`BucketError::AlreadyExists`] so callers can treat it as
    /// success-equivalent.
    #[error("bucket `{0}` already exists and is owned by you")]
    AlreadyOwnedByYou(String),

    /// A different owner holds this name.
    #[error("bucket `{0}` already exists")]
    AlreadyExists(String),

    #[error("bucket `{0}` not found")]
    NoSuchBucket(String),

    /// Deletion was requested while the bucket still holds content.
    #[error("bucket `{0}` is not empty")]
    NotEmpty(String),

    #[error("bucket `{name}` invalid: {reason}")]
    InvalidBucketName { name: String, reason: String },

    /// Versioning may never return to Disabled once it has left it.
    #[error("bucket `{name}` versioning cannot move from {current} to {requested}")]
    InvalidStateTransition {
        name: String,
        current: VersioningStatus,
        requested: VersioningStatus,
    },

    /// A concurrent writer interfered between read and persist.
    #[error("bucket `{0}` was modified concurrently; retry the operation")]
    OperationAborted(String),

    /// The metadata lookup itself failed; never treated as "not found".
    #[error("looking up bucket `{0}` failed")]
    Lookup(String, #[source] StoreError),

    /// The backend could not provision the data-plane resource; no metadata
    /// was written.
    #[error("provisioning backend resource for bucket `{0}` failed")]
    Provisioning(String, #[source] BackendError),

    /// The metadata write failed after provisioning succeeded. Compensation
    /// has already been attempted; this error is the one that propagates.
    #[error("persisting metadata for bucket `{0}` failed")]
    Persist(String, #[source] StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type BucketResult<T> = Result<T, BucketError>;

impl BucketError {
    /// S3-style error code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            BucketError::AlreadyOwnedByYou(_) => "BucketAlreadyOwnedByYou",
            BucketError::AlreadyExists(_) => "BucketAlreadyExists",
            BucketError::NoSuchBucket(_) => "NoSuchBucket",
            BucketError::NotEmpty(_) => "BucketNotEmpty",
            BucketError::InvalidBucketName { .. } => "InvalidBucketName",
            BucketError::InvalidStateTransition { .. } => "InvalidBucketState",
            BucketError::OperationAborted(_) => "OperationAborted",
            BucketError::Lookup(..)
            | BucketError::Provisioning(..)
            | BucketError::Persist(..)
            | BucketError::Store(_) => "InternalError",
        }
    }

    /// HTTP status an S3-compatible surface would answer with.
    pub fn http_status(&self) -> u16 {
        match self {
            BucketError::AlreadyOwnedByYou(_)
            | BucketError::AlreadyExists(_)
            | BucketError::NotEmpty(_)
            | BucketError::InvalidStateTransition { .. }
            | BucketError::OperationAborted(_) => 409,
            BucketError::NoSuchBucket(_) => 404,
            BucketError::InvalidBucketName { .. } => 400,
            BucketError::Lookup(..)
            | BucketError::Provisioning(..)
            | BucketError::Persist(..)
            | BucketError::Store(_) => 500,
        }
    }

    /// True for both name-conflict kinds.
    pub fn is_name_conflict(&self) -> bool {
        matches!(
            self,
            BucketError::AlreadyOwnedByYou(_) | BucketError::AlreadyExists(_)
        )
    }

    /// True when the failure means the bucket does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, BucketError::NoSuchBucket(_))
    }
}
