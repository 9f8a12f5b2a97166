use async_trait::async_trait;
use thiserror::Error as ThisError;

#[derive(Debug, Clone, ThisError)]
pub enum CacheError {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("corrupt cache entry at {key}: {reason}")]
    Corrupt { key: String, reason: String },
}

/// Minimal key-value contract the configuration accessor relies on.
///
/// No transactional guarantees are assumed. Any error is treated by callers as
/// a miss, never as a failed request.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    async fn set(&self, key: &str, value: String) -> Result<(), CacheError>;

    /// Removing an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<(), CacheError>;
}
