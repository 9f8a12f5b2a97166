pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod types;

pub use error::SiteConfigError;
pub use service::SiteConfigService;
pub use types::TenantId;
