//! Database module: models and schema for persistent storage.
//!
//! Layout:
//! - `models.rs`: the per-tenant configuration row and its partial-update payload
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: tenant-scoped queries over a `SqlitePool`

pub mod models;
pub mod schema;
pub mod sqlite;

pub use models::{DEFAULT_SITE_NAME, SiteConfigChanges, SiteConfigRecord};
pub use schema::SQLITE_INIT;
pub use sqlite::{SiteConfigStorage, SqlitePool, connect};
