use anyhow::Result;
use sqlx::sqlite::SqlitePoolOptions;
use std::{fs, path::Path, sync::Arc};
use tracing_subscriber::EnvFilter;

use bucket_meta::config::{AppConfig, Command};
use bucket_meta::store::sqlite::run_migrations;
use bucket_meta::{
    BucketService, CreateBucketParams, NoopBackend, SqliteBucketStore, VersioningStatus,
};

#[tokio::main]
async fn main() -> Result<()> {
    // --- Logging setup ---
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // --- Parse config + command ---
    let (cfg, command) = AppConfig::from_env_and_args();

    tracing::debug!("Starting bucket-meta with config: {:?}", cfg);

    // --- Ensure the SQLite file's directory exists ---
    let db_path = cfg
        .database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("file:");
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
            tracing::info!("Created missing directory {:?}", parent);
        }
    }

    // --- Initialize SQLite connection ---
    let db = Arc::new(
        SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&cfg.database_url)
            .await?,
    );

    // --- Initialize core service ---
    let service = BucketService::new(Arc::new(SqliteBucketStore::new(db.clone())));

    match command {
        Command::Migrate => {
            run_migrations(&db).await?;
            tracing::info!("Database migration complete.");
        }
        Command::Create {
            name,
            owner,
            iam_user,
            acl,
            location,
        } => {
            let params = CreateBucketParams {
                name,
                owner_canonical_id: owner,
                owner_iam_user_id: iam_user,
                acl,
                location,
            };
            let (bucket, _) = service.create(params, None::<&NoopBackend>).await?;
            println!("{}", serde_json::to_string_pretty(&bucket)?);
        }
        Command::Show { name } => {
            let bucket = service.get(&name).await?;
            println!("{}", serde_json::to_string_pretty(&bucket)?);
        }
        Command::Ls {
            owner,
            iam_user,
            hidden,
        } => {
            let buckets = match (owner, iam_user) {
                (Some(owner), _) => service.list(&owner, hidden).await?,
                (None, Some(iam_user)) => service.list_by_user(&iam_user, hidden).await?,
                (None, None) => anyhow::bail!("pass --owner or --iam-user to scope the listing"),
            };
            println!("{}", serde_json::to_string_pretty(&buckets)?);
        }
        Command::Count { iam_user, hidden } => {
            println!("{}", service.count_by_user(&iam_user, hidden).await?);
        }
        Command::Versioning { name, status } => {
            let requested = status
                .parse::<VersioningStatus>()
                .map_err(anyhow::Error::msg)?;
            service.update_versioning(&name, requested).await?;
            println!("Bucket `{}` versioning set to {}.", name, requested);
        }
        Command::Rm { name } => {
            service.delete_by_name(&name).await?;
            println!("Bucket `{}` deleted.", name);
        }
    }

    Ok(())
}
