use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Runtime settings, read from `SITECONFIG_*` environment variables over built-in defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    pub loglevel: String,
    /// Staff secret per tenant, e.g. `SITECONFIG_STAFF_KEYS='{acme="s3cret"}'`.
    /// A tenant without an entry has no staff.
    pub staff_keys: HashMap<String, String>,
    pub cache_max_capacity: u64,
    pub cache_ttl_secs: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: "sqlite:siteconfig.db".to_string(),
            listen_addr: "0.0.0.0:8000".to_string(),
            loglevel: "info".to_string(),
            staff_keys: HashMap::new(),
            cache_max_capacity: 10_000,
            cache_ttl_secs: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, figment::Error> {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Env::prefixed("SITECONFIG_"))
            .extract()
    }

    pub fn cache_ttl(&self) -> Option<Duration> {
        self.cache_ttl_secs.map(Duration::from_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_no_staff_and_no_ttl() {
        let cfg = Config::default();
        assert!(cfg.staff_keys.is_empty());
        assert_eq!(cfg.cache_ttl(), None);
        assert_eq!(cfg.cache_max_capacity, 10_000);
    }

    #[test]
    fn staff_keys_extract_as_a_tenant_map() {
        let cfg: Config = Figment::from(Serialized::defaults(Config::default()))
            .merge(Serialized::default(
                "staff_keys",
                HashMap::from([("acme", "acme-key"), ("other", "other-key")]),
            ))
            .extract()
            .unwrap();
        assert_eq!(cfg.staff_keys.len(), 2);
        assert_eq!(cfg.staff_keys.get("acme").map(String::as_str), Some("acme-key"));
    }

    #[test]
    fn ttl_converts_seconds() {
        let cfg = Config {
            cache_ttl_secs: Some(30),
            ..Config::default()
        };
        assert_eq!(cfg.cache_ttl(), Some(Duration::from_secs(30)));
    }
}
