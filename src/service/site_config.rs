use crate::cache::{CacheBackend, CacheError, cache_key};
use crate::db::{SiteConfigChanges, SiteConfigRecord, SiteConfigStorage};
use crate::error::SiteConfigError;
use crate::types::TenantId;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Read-through, invalidate-on-write access to each tenant's configuration.
///
/// Reads prefer the cache entry at [`cache_key`]; a miss loads (or lazily creates)
/// the record from storage and populates the entry. Updates persist first and then
/// delete the entry before returning, and never repopulate it themselves.
///
/// Cache failures of any kind degrade to storage-only operation. A key whose
/// invalidation failed is marked dirty: its cached value is never served again
/// until a later delete of that key succeeds.
pub struct SiteConfigService {
    storage: SiteConfigStorage,
    cache: Arc<dyn CacheBackend>,
    // Miss-path populate holds the read side, persist+invalidate holds the write side,
    // so a load that started before an update cannot write its value back afterwards.
    populate_gate: RwLock<()>,
    dirty_keys: Mutex<HashSet<String>>,
}

impl SiteConfigService {
    pub fn new(storage: SiteConfigStorage, cache: Arc<dyn CacheBackend>) -> Self {
        Self {
            storage,
            cache,
            populate_gate: RwLock::new(()),
            dirty_keys: Mutex::new(HashSet::new()),
        }
    }

    pub fn storage(&self) -> &SiteConfigStorage {
        &self.storage
    }

    pub fn cache(&self) -> &Arc<dyn CacheBackend> {
        &self.cache
    }

    /// Current configuration for `tenant`, creating it with defaults on first access.
    pub async fn get(&self, tenant: &TenantId) -> Result<SiteConfigRecord, SiteConfigError> {
        let key = cache_key(tenant);
        if !self.is_dirty(&key)
            && let Some(record) = self.read_cached(tenant, &key).await
        {
            debug!(tenant = %tenant, cache_key = %key, "site config cache hit");
            return Ok(record);
        }

        let _gate = self.populate_gate.read().await;
        let clean = self.retry_dirty_delete(&key).await;
        let record = self.storage.get_or_create(tenant).await?;
        if clean {
            self.populate(&key, &record).await;
        }
        Ok(record)
    }

    /// Tenant-scoped lookup by id. Bypasses the cache.
    pub async fn get_by_id(&self, tenant: &TenantId, id: i64) -> Result<SiteConfigRecord, SiteConfigError> {
        self.storage.get_by_id(tenant, id).await
    }

    /// Persist `changes` on the tenant's record `id`, then drop the tenant's cache entry.
    ///
    /// Fails with `NotFound` when `id` is not owned by `tenant`; no cache entry is
    /// touched on any failure.
    pub async fn update(
        &self,
        tenant: &TenantId,
        id: i64,
        changes: &SiteConfigChanges,
    ) -> Result<SiteConfigRecord, SiteConfigError> {
        let _gate = self.populate_gate.write().await;
        let record = self.storage.update(tenant, id, changes).await?;
        self.invalidate(tenant).await;
        info!(tenant = %tenant, id, "site configuration updated");
        Ok(record)
    }

    /// Update the tenant's own record without knowing its id.
    pub async fn update_own(
        &self,
        tenant: &TenantId,
        changes: &SiteConfigChanges,
    ) -> Result<SiteConfigRecord, SiteConfigError> {
        let current = self.storage.get_or_create(tenant).await?;
        self.update(tenant, current.id, changes).await
    }

    async fn read_cached(&self, tenant: &TenantId, key: &str) -> Option<SiteConfigRecord> {
        let raw = match self.cache.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(tenant = %tenant, cache_key = %key, "site config cache miss");
                return None;
            }
            Err(e) => {
                warn!(cache_key = %key, error = %e, "cache get failed; reading from storage");
                return None;
            }
        };

        let decoded = serde_json::from_str::<SiteConfigRecord>(&raw)
            .map_err(|e| e.to_string())
            .and_then(|record| {
                if record.tenant_id == tenant.as_str() {
                    Ok(record)
                } else {
                    Err(format!("entry belongs to tenant {}", record.tenant_id))
                }
            });

        match decoded {
            Ok(record) => Some(record),
            Err(reason) => {
                let err = CacheError::Corrupt {
                    key: key.to_string(),
                    reason,
                };
                warn!(error = %err, "discarding cache entry");
                if let Err(e) = self.cache.delete(key).await {
                    warn!(cache_key = %key, error = %e, "failed to delete corrupt cache entry");
                    self.mark_dirty(key);
                }
                None
            }
        }
    }

    async fn populate(&self, key: &str, record: &SiteConfigRecord) {
        let value = match serde_json::to_string(record) {
            Ok(v) => v,
            Err(e) => {
                warn!(cache_key = %key, error = %e, "failed to encode site config for cache");
                return;
            }
        };
        if let Err(e) = self.cache.set(key, value).await {
            warn!(cache_key = %key, error = %e, "cache set failed; continuing without cache");
        }
    }

    async fn invalidate(&self, tenant: &TenantId) {
        let key = cache_key(tenant);
        match self.cache.delete(&key).await {
            Ok(()) => {
                self.clear_dirty(&key);
                debug!(tenant = %tenant, cache_key = %key, "site config cache invalidated");
            }
            Err(e) => {
                self.mark_dirty(&key);
                warn!(tenant = %tenant, cache_key = %key, error = %e, "cache delete failed after update; key marked dirty");
            }
        }
    }

    /// Whether `key` may still be populated. Dirty keys get their delete retried;
    /// they stay dirty, and unpopulated, until it succeeds.
    async fn retry_dirty_delete(&self, key: &str) -> bool {
        if !self.is_dirty(key) {
            return true;
        }
        match self.cache.delete(key).await {
            Ok(()) => {
                self.clear_dirty(key);
                debug!(cache_key = %key, "dirty cache key cleared");
                true
            }
            Err(e) => {
                warn!(cache_key = %key, error = %e, "dirty cache key still undeletable; bypassing cache");
                false
            }
        }
    }

    fn is_dirty(&self, key: &str) -> bool {
        self.dirty_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
    }

    fn mark_dirty(&self, key: &str) {
        self.dirty_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string());
    }

    fn clear_dirty(&self, key: &str) {
        self.dirty_keys
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}
