//! src/services/bucket_service.rs
//!
//! BucketService: the metadata lifecycle of buckets. Creation coordinates
//! backend provisioning with the metadata write and compensates on partial
//! failure; versioning updates run through the one-way transition rule;
//! listing, counting, and deletion are filtered reads plus a gated remove.
//! The data-plane driver and the metadata store are injected collaborators,
//! so there is no process-wide state to stand up or tear down.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error};

use crate::backend::BucketBackend;
use crate::errors::{BucketError, BucketResult};
use crate::models::bucket::{Bucket, VersioningStatus};
use crate::store::{BucketFilter, BucketStore, StoreError};

/// Input for one bucket creation.
#[derive(Clone, Debug)]
pub struct CreateBucketParams {
    pub name: String,
    pub owner_canonical_id: String,
    pub owner_iam_user_id: String,
    pub acl: String,
    pub location: String,
}

const BUCKET_NAME_MIN_LEN: usize = 3;
const BUCKET_NAME_MAX_LEN: usize = 63;

/// BucketService owns the bucket metadata lifecycle:
/// - create a bucket (conflict check, backend provisioning, metadata write,
///   compensation when the write fails)
/// - change the versioning status under the one-way rule
/// - list and count buckets per owner account or IAM user
/// - delete an empty bucket
/// - name lookups (get / exists)
///
/// Construct it with whichever store the deployment uses; a provisioning
/// capability is handed in per create call.
#[derive(Clone)]
pub struct BucketService {
    store: Arc<dyn BucketStore>,
}

impl BucketService {
    pub fn new(store: Arc<dyn BucketStore>) -> Self {
        Self { store }
    }

    /// Validate bucket name format.
    ///
    /// Enforces S3-like naming rules:
    /// - 3-63 characters
    /// - lowercase letters, digits, dots, hyphens only
    /// - cannot start/end with dot or hyphen
    /// - cannot contain consecutive dots or dot-hyphen patterns
    /// - cannot look like an IPv4 address
    fn ensure_bucket_name_safe(&self, name: &str) -> BucketResult<()> {
        let fail = |reason: &str| {
            Err(BucketError::InvalidBucketName {
                name: name.to_string(),
                reason: reason.to_string(),
            })
        };

        if name.trim() != name {
            return fail("cannot begin or end with whitespace");
        }
        if name.len() < BUCKET_NAME_MIN_LEN || name.len() > BUCKET_NAME_MAX_LEN {
            return fail("must be between 3 and 63 characters");
        }
        if !name
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '-'))
        {
            return fail("allowed characters are lowercase letters, digits, dots, and hyphens");
        }
        if name.starts_with('.')
            || name.ends_with('.')
            || name.starts_with('-')
            || name.ends_with('-')
        {
            return fail("must start and end with a lowercase letter or digit");
        }
        if name.contains("..") || name.contains("-.") || name.contains(".-") {
            return fail("cannot contain consecutive dots or dot-hyphen combinations");
        }
        if is_ipv4_like(name) {
            return fail("must not be formatted like an IP address");
        }

        Ok(())
    }

    /// Conflict check for a candidate name, same-owner case first.
    ///
    /// Ok means creation may proceed. A record held by the caller reports
    /// AlreadyOwnedByYou, a foreign record AlreadyExists; the two carry
    /// different remediation semantics and stay distinct. A failed lookup is
    /// surfaced, never treated as a free name.
    async fn ensure_name_available(
        &self,
        name: &str,
        owner_canonical_id: &str,
    ) -> BucketResult<()> {
        match self.store.find_by_name(name).await {
            Ok(None) => Ok(()),
            Ok(Some(existing)) if existing.owner_canonical_id == owner_canonical_id => {
                Err(BucketError::AlreadyOwnedByYou(name.to_string()))
            }
            Ok(Some(_)) => Err(BucketError::AlreadyExists(name.to_string())),
            Err(err) => {
                error!("checking bucket `{}` for existence failed: {}", name, err);
                Err(BucketError::Lookup(name.to_string(), err))
            }
        }
    }

    /// A duplicate-name insert means a concurrent creator claimed the name
    /// after our availability check passed. Re-resolve ownership so the
    /// caller still sees the right conflict kind; when the follow-up lookup
    /// cannot classify, report the generic conflict.
    async fn classify_taken_name(&self, bucket: &Bucket) -> BucketError {
        match self.store.find_by_name(&bucket.name).await {
            Ok(Some(existing))
                if existing.owner_canonical_id == bucket.owner_canonical_id =>
            {
                BucketError::AlreadyOwnedByYou(bucket.name.clone())
            }
            Ok(_) => BucketError::AlreadyExists(bucket.name.clone()),
            Err(err) => {
                error!(
                    "re-checking owner of taken name `{}` failed: {}",
                    bucket.name, err
                );
                BucketError::AlreadyExists(bucket.name.clone())
            }
        }
    }

    /// Create a bucket: resolve name conflicts, provision the data-plane
    /// resource, persist the metadata record.
    ///
    /// The two side-effecting steps are independently failable and share no
    /// transaction. When the metadata write fails after provisioning
    /// succeeded, the backend resource is unwound through
    /// `backend.compensate`; a compensation failure is logged but the write
    /// failure stays the error the caller sees. When no capability is
    /// supplied, creation is purely a metadata operation.
    ///
    /// Returns the created record together with the forward result of
    /// provisioning. Nothing is retried here; retry policy belongs to the
    /// caller or to the capability itself.
    pub async fn create<B: BucketBackend>(
        &self,
        params: CreateBucketParams,
        backend: Option<&B>,
    ) -> BucketResult<(Bucket, Option<B::Resource>)> {
        self.ensure_bucket_name_safe(&params.name)?;
        self.ensure_name_available(&params.name, &params.owner_canonical_id)
            .await?;

        let bucket = Bucket {
            name: params.name,
            owner_canonical_id: params.owner_canonical_id,
            owner_iam_user_id: params.owner_iam_user_id,
            acl: params.acl,
            location: params.location,
            size: 0,
            hidden: false,
            logging_enabled: false,
            versioning_status: VersioningStatus::Disabled,
            created_at: Utc::now(),
        };

        let resource = match backend {
            Some(backend) => match backend.provision().await {
                Ok(resource) => Some(resource),
                Err(err) => {
                    error!(
                        "provisioning backend resource for bucket `{}` failed: {}",
                        bucket.name, err
                    );
                    return Err(BucketError::Provisioning(bucket.name, err));
                }
            },
            None => None,
        };

        if let Err(err) = self.store.insert(&bucket).await {
            error!("persisting bucket `{}` failed: {}", bucket.name, err);
            if let (Some(backend), Some(resource)) = (backend, resource) {
                if let Err(undo_err) = backend.compensate(resource).await {
                    error!(
                        "compensating backend resource for bucket `{}` also failed: {}",
                        bucket.name, undo_err
                    );
                }
            }
            return Err(match err {
                StoreError::NameTaken(_) => self.classify_taken_name(&bucket).await,
                other => BucketError::Persist(bucket.name, other),
            });
        }

        debug!(
            "created bucket `{}` for owner `{}`",
            bucket.name, bucket.owner_canonical_id
        );
        Ok((bucket, resource))
    }

    /// Change the versioning status of `name` to `requested`.
    ///
    /// Transitions to Enabled or Suspended are always allowed; Disabled is
    /// accepted only while the bucket is still Disabled (a no-op
    /// confirmation). The persist is guarded on the status that was read:
    /// when another writer moved it in between, nothing changes and the call
    /// fails with OperationAborted.
    pub async fn update_versioning(
        &self,
        name: &str,
        requested: VersioningStatus,
    ) -> BucketResult<()> {
        let bucket = self.get(name).await?;

        if !bucket.versioning_status.can_become(requested) {
            return Err(BucketError::InvalidStateTransition {
                name: name.to_string(),
                current: bucket.versioning_status,
                requested,
            });
        }

        let swapped = self
            .store
            .update_versioning(name, bucket.versioning_status, requested)
            .await
            .map_err(|err| {
                error!(
                    "persisting versioning change for bucket `{}` failed: {}",
                    name, err
                );
                BucketError::Persist(name.to_string(), err)
            })?;

        if !swapped {
            return Err(BucketError::OperationAborted(name.to_string()));
        }

        debug!("bucket `{}` versioning now {}", name, requested);
        Ok(())
    }

    /// Buckets owned by the account, filtered on the hidden flag.
    ///
    /// `include_hidden` is an equality match: false returns the visible
    /// buckets, true the hidden ones. Results are ordered by name.
    pub async fn list(
        &self,
        owner_canonical_id: &str,
        include_hidden: bool,
    ) -> BucketResult<Vec<Bucket>> {
        let filter = BucketFilter {
            owner_canonical_id: Some(owner_canonical_id.to_string()),
            owner_iam_user_id: None,
            hidden: include_hidden,
        };
        self.store.find_all(&filter).await.map_err(|err| {
            error!(
                "listing buckets for account `{}` failed: {}",
                owner_canonical_id, err
            );
            BucketError::from(err)
        })
    }

    /// Buckets created by the IAM user, filtered on the hidden flag.
    pub async fn list_by_user(
        &self,
        owner_iam_user_id: &str,
        include_hidden: bool,
    ) -> BucketResult<Vec<Bucket>> {
        let filter = BucketFilter {
            owner_canonical_id: None,
            owner_iam_user_id: Some(owner_iam_user_id.to_string()),
            hidden: include_hidden,
        };
        self.store.find_all(&filter).await.map_err(|err| {
            error!(
                "listing buckets for user `{}` failed: {}",
                owner_iam_user_id, err
            );
            BucketError::from(err)
        })
    }

    /// Number of buckets created by the IAM user.
    ///
    /// Zero matches is a plain 0; a failed count is surfaced, never reported
    /// as empty.
    pub async fn count_by_user(
        &self,
        owner_iam_user_id: &str,
        include_hidden: bool,
    ) -> BucketResult<u64> {
        let filter = BucketFilter {
            owner_canonical_id: None,
            owner_iam_user_id: Some(owner_iam_user_id.to_string()),
            hidden: include_hidden,
        };
        self.store.count(&filter).await.map_err(|err| {
            error!(
                "counting buckets for user `{}` failed: {}",
                owner_iam_user_id, err
            );
            BucketError::from(err)
        })
    }

    /// Fetch one bucket record by name.
    pub async fn get(&self, name: &str) -> BucketResult<Bucket> {
        match self.store.find_by_name(name).await {
            Ok(Some(bucket)) => Ok(bucket),
            Ok(None) => Err(BucketError::NoSuchBucket(name.to_string())),
            Err(err) => {
                error!("looking up bucket `{}` failed: {}", name, err);
                Err(BucketError::Lookup(name.to_string(), err))
            }
        }
    }

    /// Whether a record for `name` exists.
    ///
    /// Lookup failures surface as errors, never as false.
    pub async fn exists(&self, name: &str) -> BucketResult<bool> {
        match self.store.find_by_name(name).await {
            Ok(found) => Ok(found.is_some()),
            Err(err) => {
                error!("looking up bucket `{}` failed: {}", name, err);
                Err(BucketError::Lookup(name.to_string(), err))
            }
        }
    }

    /// Remove the metadata record for an empty bucket.
    ///
    /// The supplied record carries the collaborator-maintained size counter;
    /// a non-zero size fails NotEmpty and removes nothing. A record that
    /// vanished before the delete reports NoSuchBucket, and store failures
    /// are surfaced, never swallowed.
    pub async fn delete(&self, bucket: &Bucket) -> BucketResult<()> {
        if bucket.size != 0 {
            return Err(BucketError::NotEmpty(bucket.name.clone()));
        }

        self.store.delete(bucket).await.map_err(|err| match err {
            StoreError::Missing(name) => BucketError::NoSuchBucket(name),
            other => {
                error!("deleting bucket `{}` failed: {}", bucket.name, other);
                BucketError::from(other)
            }
        })?;

        debug!("deleted bucket `{}`", bucket.name);
        Ok(())
    }

    /// Resolve `name` to its current record, then delete it under the same
    /// emptiness contract as [`BucketService::delete`].
    pub async fn delete_by_name(&self, name: &str) -> BucketResult<()> {
        let bucket = self.get(name).await?;
        self.delete(&bucket).await
    }
}

/// Check if a string matches IPv4-like dotted decimal form.
/// Rejects names formatted like `1.2.3.4`.
fn is_ipv4_like(name: &str) -> bool {
    let parts: Vec<&str> = name.split('.').collect();
    parts.len() == 4 && parts.iter().all(|segment| segment.parse::<u8>().is_ok())
}
