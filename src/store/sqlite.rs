//! SQLite-backed implementation of the metadata store.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{QueryBuilder, SqlitePool, sqlite::Sqlite};
use tracing::{debug, info};

use crate::models::bucket::{Bucket, VersioningStatus};
use crate::store::{BucketFilter, BucketStore, StoreError, StoreResult};

const INIT_SQL: &str = include_str!("../../migrations/0001_init.sql");

/// Apply the embedded schema migration to `db`, statement by statement.
///
/// Every statement in the migration file carries IF NOT EXISTS, so running
/// this against an already-migrated database is safe.
pub async fn run_migrations(db: &SqlitePool) -> StoreResult<()> {
    let statements = INIT_SQL
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>();

    info!("Running {} migration statements...", statements.len());

    for stmt in statements {
        debug!("Executing migration SQL: {}", stmt);
        sqlx::query(stmt).execute(db).await?;
    }

    Ok(())
}

/// Bucket metadata rows in SQLite.
///
/// The `buckets` table keys on `name`, so the namespace-wide uniqueness
/// rule is enforced here: a duplicate insert (including one racing a
/// concurrent creator) surfaces as [`StoreError::NameTaken`].
pub struct SqliteBucketStore {
    /// Shared SQLite connection pool used for all metadata operations.
    pub db: Arc<SqlitePool>,
}

impl SqliteBucketStore {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BucketStore for SqliteBucketStore {
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Bucket>> {
        let bucket = sqlx::query_as::<_, Bucket>(
            "SELECT name, owner_canonical_id, owner_iam_user_id, acl, location,
                    size, hidden, logging_enabled, versioning_status, created_at
             FROM buckets WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&*self.db)
        .await?;

        Ok(bucket)
    }

    async fn find_all(&self, filter: &BucketFilter) -> StoreResult<Vec<Bucket>> {
        let mut builder = QueryBuilder::<Sqlite>::new(
            "SELECT name, owner_canonical_id, owner_iam_user_id, acl, location, \
             size, hidden, logging_enabled, versioning_status, created_at \
             FROM buckets",
        );
        push_filter(&mut builder, filter);
        builder.push(" ORDER BY name ASC");

        let buckets: Vec<Bucket> = builder.build_query_as().fetch_all(&*self.db).await?;
        Ok(buckets)
    }

    async fn count(&self, filter: &BucketFilter) -> StoreResult<u64> {
        let mut builder = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM buckets");
        push_filter(&mut builder, filter);

        let count: i64 = builder.build_query_scalar().fetch_one(&*self.db).await?;
        Ok(count as u64)
    }

    async fn insert(&self, bucket: &Bucket) -> StoreResult<()> {
        match sqlx::query(
            "INSERT INTO buckets (name, owner_canonical_id, owner_iam_user_id, acl, location,
                                  size, hidden, logging_enabled, versioning_status, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&bucket.name)
        .bind(&bucket.owner_canonical_id)
        .bind(&bucket.owner_iam_user_id)
        .bind(&bucket.acl)
        .bind(&bucket.location)
        .bind(bucket.size)
        .bind(bucket.hidden)
        .bind(bucket.logging_enabled)
        .bind(bucket.versioning_status)
        .bind(bucket.created_at)
        .execute(&*self.db)
        .await
        {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::NameTaken(bucket.name.clone()))
            }
            Err(err) => Err(StoreError::Sqlx(err)),
        }
    }

    async fn update_versioning(
        &self,
        name: &str,
        expected: VersioningStatus,
        next: VersioningStatus,
    ) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE buckets SET versioning_status = ? WHERE name = ? AND versioning_status = ?",
        )
        .bind(next)
        .bind(name)
        .bind(expected)
        .execute(&*self.db)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete(&self, bucket: &Bucket) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM buckets WHERE name = ?")
            .bind(&bucket.name)
            .execute(&*self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Missing(bucket.name.clone()));
        }

        Ok(())
    }
}

/// Append the filter's WHERE clause to a query under construction.
fn push_filter<'args>(builder: &mut QueryBuilder<'args, Sqlite>, filter: &'args BucketFilter) {
    builder.push(" WHERE hidden = ");
    builder.push_bind(filter.hidden);

    if let Some(owner) = &filter.owner_canonical_id {
        builder.push(" AND owner_canonical_id = ");
        builder.push_bind(owner);
    }
    if let Some(user) = &filter.owner_iam_user_id {
        builder.push(" AND owner_iam_user_id = ");
        builder.push_bind(user);
    }
}

/// Return true if SQLx error indicates a unique constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}
