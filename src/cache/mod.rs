//! Tenant-keyed cache for site configuration records.
//!
//! Backends are plain string key-value stores. Records are stored as JSON so a
//! corrupted entry can be detected and treated as a miss by the caller.

pub mod key;
pub mod moka_backend;
pub mod traits;

pub use key::cache_key;
pub use moka_backend::MokaCacheBackend;
pub use traits::{CacheBackend, CacheError};
