//! SQL DDL for initializing the site configuration storage.

/// SQLite schema with:
/// - `id` INTEGER PRIMARY KEY AUTOINCREMENT
/// - `tenant_id` UNIQUE, so each tenant owns at most one row
/// - image references nullable TEXT
/// - `updated_at` stored as RFC3339 text
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS site_config (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    tenant_id TEXT NOT NULL UNIQUE,
    site_name TEXT NOT NULL,
    banner_image TEXT NULL,
    banner_image_dark TEXT NULL,
    site_logo TEXT NULL,
    default_icon TEXT NULL,
    favicon TEXT NULL,
    updated_at TEXT NOT NULL -- RFC3339
);
"#;
