use crate::db::models::{DEFAULT_SITE_NAME, SiteConfigChanges, SiteConfigRecord};
use crate::db::schema::SQLITE_INIT;
use crate::error::SiteConfigError;
use crate::types::TenantId;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;
use tracing::info;

pub type SqlitePool = Pool<Sqlite>;

const SELECT_COLUMNS: &str = r#"SELECT id, tenant_id, site_name, banner_image, banner_image_dark,
    site_logo, default_icon, favicon, updated_at FROM site_config"#;

/// Open a pool, creating the database file if needed.
///
/// Connections are kept alive for the life of the pool so `sqlite::memory:`
/// databases survive between queries when `max_connections` is 1.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<SqlitePool, SiteConfigError> {
    let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(connect_opts)
        .await?;
    Ok(pool)
}

#[derive(Clone)]
pub struct SiteConfigStorage {
    pool: SqlitePool,
}

impl SiteConfigStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), SiteConfigError> {
        // sqlx::query runs a single statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Return the tenant's record, inserting one with default values on first access.
    pub async fn get_or_create(&self, tenant: &TenantId) -> Result<SiteConfigRecord, SiteConfigError> {
        let inserted = sqlx::query(
            r#"INSERT INTO site_config (tenant_id, site_name, updated_at)
               VALUES (?, ?, ?)
               ON CONFLICT(tenant_id) DO NOTHING"#,
        )
        .bind(tenant.as_str())
        .bind(DEFAULT_SITE_NAME)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() > 0 {
            info!(tenant = %tenant, "created default site configuration");
        }

        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE tenant_id = ?"))
            .bind(tenant.as_str())
            .fetch_one(&self.pool)
            .await?;
        Self::row_to_model(row)
    }

    /// Fetch by id; rows owned by other tenants are reported as `NotFound`.
    pub async fn get_by_id(&self, tenant: &TenantId, id: i64) -> Result<SiteConfigRecord, SiteConfigError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ? AND tenant_id = ?"))
            .bind(id)
            .bind(tenant.as_str())
            .fetch_optional(&self.pool)
            .await?
            .ok_or(SiteConfigError::NotFound)?;
        Self::row_to_model(row)
    }

    /// Apply `changes` to the tenant's row `id` inside one transaction.
    /// Nothing is written when the row is missing or the changes are invalid.
    pub async fn update(
        &self,
        tenant: &TenantId,
        id: i64,
        changes: &SiteConfigChanges,
    ) -> Result<SiteConfigRecord, SiteConfigError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ? AND tenant_id = ?"))
            .bind(id)
            .bind(tenant.as_str())
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(SiteConfigError::NotFound)?;
        let mut record = Self::row_to_model(row)?;

        changes.apply_to(&mut record)?;
        record.updated_at = Utc::now();

        sqlx::query(
            r#"UPDATE site_config SET
                site_name = ?,
                banner_image = ?,
                banner_image_dark = ?,
                site_logo = ?,
                default_icon = ?,
                favicon = ?,
                updated_at = ?
              WHERE id = ? AND tenant_id = ?"#,
        )
        .bind(&record.site_name)
        .bind(&record.banner_image)
        .bind(&record.banner_image_dark)
        .bind(&record.site_logo)
        .bind(&record.default_icon)
        .bind(&record.favicon)
        .bind(record.updated_at.to_rfc3339())
        .bind(id)
        .bind(tenant.as_str())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(record)
    }

    fn row_to_model(row: SqliteRow) -> Result<SiteConfigRecord, SiteConfigError> {
        let updated_at_str: String = row.try_get("updated_at")?;
        let updated_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&updated_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(SiteConfigRecord {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            site_name: row.try_get("site_name")?,
            banner_image: row.try_get("banner_image")?,
            banner_image_dark: row.try_get("banner_image_dark")?,
            site_logo: row.try_get("site_logo")?,
            default_icon: row.try_get("default_icon")?,
            favicon: row.try_get("favicon")?,
            updated_at,
        })
    }
}
