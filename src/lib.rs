//! Bucket metadata lifecycle for an S3-compatible object store.
//!
//! The crate keeps the control-plane record of every bucket (ownership, ACL,
//! placement, visibility, the size counter, versioning status) and
//! coordinates creation with the data-plane backend that will hold the
//! bucket's bytes. [`BucketService`] is the entry point; persistence sits
//! behind the [`BucketStore`] trait with SQLite and in-memory
//! implementations.

pub mod backend;
pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod store;

pub use backend::{BackendError, BucketBackend, NoopBackend};
pub use errors::{BucketError, BucketResult};
pub use models::bucket::{Bucket, VersioningStatus};
pub use services::bucket_service::{BucketService, CreateBucketParams};
pub use store::memory::InMemoryBucketStore;
pub use store::sqlite::SqliteBucketStore;
pub use store::{BucketFilter, BucketStore, StoreError, StoreResult};
