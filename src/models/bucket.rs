//! Represents a bucket: the metadata record for one storage container.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Versioning mode of a bucket.
///
/// Persisted as TEXT using the variant names. Once versioning has been
/// enabled it can only be suspended, never fully disabled again; see
/// [`VersioningStatus::can_become`].
#[derive(Serialize, Deserialize, sqlx::Type, Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersioningStatus {
    Disabled,
    Enabled,
    Suspended,
}

impl VersioningStatus {
    /// Whether a transition from `self` to `requested` is permitted.
    ///
    /// Any transition targeting Enabled or Suspended is allowed. Requesting
    /// Disabled is accepted only as a no-op confirmation while the bucket is
    /// still Disabled; it is never a real transition away from
    /// Enabled/Suspended.
    pub fn can_become(self, requested: VersioningStatus) -> bool {
        requested != VersioningStatus::Disabled || self == VersioningStatus::Disabled
    }
}

impl fmt::Display for VersioningStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            VersioningStatus::Disabled => "Disabled",
            VersioningStatus::Enabled => "Enabled",
            VersioningStatus::Suspended => "Suspended",
        };
        write!(f, "{}", text)
    }
}

impl FromStr for VersioningStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("disabled") {
            Ok(VersioningStatus::Disabled)
        } else if s.eq_ignore_ascii_case("enabled") {
            Ok(VersioningStatus::Enabled)
        } else if s.eq_ignore_ascii_case("suspended") {
            Ok(VersioningStatus::Suspended)
        } else {
            Err(format!("unknown versioning status `{}`", s))
        }
    }
}

/// A bucket metadata record.
///
/// Buckets act as namespaces for objects and belong to a specific owner
/// account. The record tracks ownership, placement, and lifecycle state;
/// object payloads and ACL interpretation are handled by collaborators.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct Bucket {
    /// Globally unique bucket name; the primary key across the whole
    /// namespace, regardless of owner.
    pub name: String,

    /// Canonical ID of the account that owns this bucket. Immutable.
    pub owner_canonical_id: String,

    /// IAM user within the owning account that created the bucket. Immutable.
    pub owner_iam_user_id: String,

    /// Access-control descriptor, stored as-is and interpreted elsewhere.
    pub acl: String,

    /// Region or placement identifier (e.g. "us-east-1").
    pub location: String,

    /// Total byte count of stored objects. Starts at 0; collaborators
    /// update it as objects are added and removed.
    pub size: i64,

    /// Hidden buckets are excluded from normal listings.
    pub hidden: bool,

    /// Whether access logging has been turned on for this bucket.
    pub logging_enabled: bool,

    /// Current versioning mode.
    pub versioning_status: VersioningStatus,

    /// When this bucket was created.
    pub created_at: DateTime<Utc>,
}
