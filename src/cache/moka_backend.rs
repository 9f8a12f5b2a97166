use async_trait::async_trait;
use moka::future::Cache;
use std::time::Duration;

use super::traits::{CacheBackend, CacheError};

/// In-process backend over `moka`. Expiry, if any, is moka's own TTL.
#[derive(Clone)]
pub struct MokaCacheBackend {
    cache: Cache<String, String>,
}

impl MokaCacheBackend {
    pub fn new(max_capacity: u64, ttl: Option<Duration>) -> Self {
        let mut builder = Cache::<String, String>::builder().max_capacity(max_capacity);
        if let Some(ttl) = ttl {
            builder = builder.time_to_live(ttl);
        }
        Self {
            cache: builder.build(),
        }
    }
}

#[async_trait]
impl CacheBackend for MokaCacheBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        Ok(self.cache.get(key).await)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError> {
        self.cache.insert(key.to_string(), value).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.cache.invalidate(key).await;
        Ok(())
    }
}
