//! Core data model for the bucket metadata service.
//!
//! The single entity is the bucket record. It maps cleanly to the `buckets`
//! table via `sqlx::FromRow` and serializes naturally as JSON via `serde`.

pub mod bucket;
