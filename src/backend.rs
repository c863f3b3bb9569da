//! Backend provisioning boundary.
//!
//! Creating a bucket spans two systems: an external storage driver
//! provisions the data-plane resource, then the metadata record is
//! persisted. This module defines the capability the driver exposes to the
//! creation saga.

use async_trait::async_trait;
use thiserror::Error;

/// Errors produced by a backend provisioning capability.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend refused the request (quota, policy, invalid placement).
    #[error("backend rejected the request: {0}")]
    Rejected(String),

    /// The backend could not be reached or did not answer in time.
    #[error("backend unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// A provisioning capability bound to one pending bucket creation.
///
/// `provision` creates the data-plane resource and yields a forward result;
/// `compensate` unwinds that resource after a later step fails. The
/// compensator is only meaningful after a successful `provision` and
/// consumes its forward result. Compensation must be safe to call even if
/// only partial backend state was created, and must not fail for "nothing
/// to undo".
#[async_trait]
pub trait BucketBackend: Send + Sync {
    /// Value handed back by a successful provision; threaded through to
    /// `compensate` on unwind, or returned to the caller on success.
    type Resource: Send;

    async fn provision(&self) -> Result<Self::Resource, BackendError>;

    async fn compensate(&self, resource: Self::Resource) -> Result<(), BackendError>;
}

/// Capability that provisions nothing and never fails.
///
/// Stands in where creation is purely a metadata operation but a capability
/// value is still wanted.
pub struct NoopBackend;

#[async_trait]
impl BucketBackend for NoopBackend {
    type Resource = ();

    async fn provision(&self) -> Result<(), BackendError> {
        Ok(())
    }

    async fn compensate(&self, _resource: ()) -> Result<(), BackendError> {
        Ok(())
    }
}
