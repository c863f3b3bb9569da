use clap::{Parser, Subcommand};
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
}

/// Command-line + environment configuration.
#[derive(Parser, Debug)]
#[command(author, version, about = "Bucket metadata administration")]
pub struct Args {
    /// Database URL (overrides BUCKET_META_DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Administrative operations on the bucket metadata database.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run migrations and exit
    Migrate,
    /// Create a bucket
    Create {
        /// Bucket name
        name: String,

        /// Canonical ID of the owning account
        #[arg(long)]
        owner: String,

        /// ID of the IAM user performing the creation
        #[arg(long)]
        iam_user: String,

        /// Canned ACL stored with the record
        #[arg(long, default_value = "private")]
        acl: String,

        /// Region constraint stored with the record
        #[arg(long, default_value = "us-east-1")]
        location: String,
    },
    /// Show one bucket record
    Show {
        /// Bucket name
        name: String,
    },
    /// List buckets for an account or an IAM user
    Ls {
        /// Canonical ID of the owning account
        #[arg(long)]
        owner: Option<String>,

        /// ID of the creating IAM user
        #[arg(long)]
        iam_user: Option<String>,

        /// Match hidden buckets instead of visible ones
        #[arg(long)]
        hidden: bool,
    },
    /// Count buckets created by an IAM user
    Count {
        /// ID of the creating IAM user
        iam_user: String,

        /// Match hidden buckets instead of visible ones
        #[arg(long)]
        hidden: bool,
    },
    /// Change the versioning status of a bucket
    Versioning {
        /// Bucket name
        name: String,

        /// Requested status: disabled, enabled, or suspended
        status: String,
    },
    /// Delete an empty bucket
    Rm {
        /// Bucket name
        name: String,
    },
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig and the command.
    pub fn from_env_and_args() -> (Self, Command) {
        // Parse CLI once
        let args = Args::parse();

        // --- Environment fallback ---
        let env_db = env::var("BUCKET_META_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://./data/meta/bucket_meta.db".into());

        // --- Merge ---
        let cfg = Self {
            database_url: args.database_url.unwrap_or(env_db),
        };

        (cfg, args.command)
    }
}
