use mimalloc::MiMalloc;
use siteconfig::cache::{CacheBackend, MokaCacheBackend};
use siteconfig::config::Config;
use siteconfig::db::{SiteConfigStorage, connect};
use siteconfig::middleware::auth::StaffKeys;
use siteconfig::router::{SiteConfigState, site_config_router};
use siteconfig::service::SiteConfigService;
use siteconfig::SiteConfigError;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), SiteConfigError> {
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        database_url = %cfg.database_url,
        listen_addr = %cfg.listen_addr,
        loglevel = %cfg.loglevel,
        cache_max_capacity = cfg.cache_max_capacity,
        cache_ttl_secs = ?cfg.cache_ttl_secs,
    );
    let staff_keys = StaffKeys::new(cfg.staff_keys.clone());
    if staff_keys.is_empty() {
        warn!("SITECONFIG_STAFF_KEYS is not set; administrative routes will reject every caller");
    }

    let pool = connect(&cfg.database_url, 5).await?;
    let storage = SiteConfigStorage::new(pool);
    storage.init_schema().await?;

    let cache: Arc<dyn CacheBackend> =
        Arc::new(MokaCacheBackend::new(cfg.cache_max_capacity, cfg.cache_ttl()));
    let service = Arc::new(SiteConfigService::new(storage, cache));

    let state = SiteConfigState::new(service, staff_keys);
    let app = site_config_router(state);

    let listener = TcpListener::bind(cfg.listen_addr.as_str()).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
