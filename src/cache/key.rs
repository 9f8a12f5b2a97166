use crate::types::TenantId;

const KEY_PREFIX: &str = "siteconfig";

/// The single cache key under which a tenant's configuration is stored and invalidated.
pub fn cache_key(tenant: &TenantId) -> String {
    format!("{KEY_PREFIX}:{tenant}")
}
