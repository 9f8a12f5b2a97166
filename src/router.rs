use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::get,
};
use std::sync::Arc;

use crate::handlers::site_config::{
    site_config_detail, site_config_update, site_config_update_form, site_config_update_own,
    site_config_update_own_form,
};
use crate::middleware::auth::StaffKeys;
use crate::service::SiteConfigService;

const BODY_LIMIT: usize = 64 * 1024;

#[derive(Clone)]
pub struct SiteConfigState {
    pub service: Arc<SiteConfigService>,
    pub staff_keys: StaffKeys,
}

impl SiteConfigState {
    pub fn new(service: Arc<SiteConfigService>, staff_keys: StaffKeys) -> Self {
        Self {
            service,
            staff_keys,
        }
    }
}

impl FromRef<SiteConfigState> for StaffKeys {
    fn from_ref(state: &SiteConfigState) -> Self {
        state.staff_keys.clone()
    }
}

pub fn site_config_router(state: SiteConfigState) -> Router {
    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .route("/config/", get(site_config_detail))
        .route(
            "/config/edit/",
            get(site_config_update_own_form).post(site_config_update_own),
        )
        .route(
            "/config/{id}/edit/",
            get(site_config_update_form).post(site_config_update),
        )
        .layer(DefaultBodyLimit::max(BODY_LIMIT))
        .with_state(state)
}
