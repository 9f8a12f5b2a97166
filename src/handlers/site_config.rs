use axum::{
    Json,
    extract::{Path, State},
};

use crate::middleware::auth::RequireStaff;
use crate::middleware::site_config_request::ChangesPayload;
use crate::middleware::tenant::CurrentTenant;
use crate::{SiteConfigError, db::SiteConfigRecord, router::SiteConfigState};

/// GET /config/ -> the tenant's configuration, served through the cache.
pub async fn site_config_detail(
    State(state): State<SiteConfigState>,
    CurrentTenant(tenant): CurrentTenant,
) -> Result<Json<SiteConfigRecord>, SiteConfigError> {
    Ok(Json(state.service.get(&tenant).await?))
}

/// GET /config/edit/ -> current values for the "update own" form.
pub async fn site_config_update_own_form(
    _staff: RequireStaff,
    State(state): State<SiteConfigState>,
    CurrentTenant(tenant): CurrentTenant,
) -> Result<Json<SiteConfigRecord>, SiteConfigError> {
    Ok(Json(state.service.get(&tenant).await?))
}

/// POST /config/edit/ -> update this tenant's configuration singleton.
pub async fn site_config_update_own(
    _staff: RequireStaff,
    State(state): State<SiteConfigState>,
    CurrentTenant(tenant): CurrentTenant,
    ChangesPayload(changes): ChangesPayload,
) -> Result<Json<SiteConfigRecord>, SiteConfigError> {
    Ok(Json(state.service.update_own(&tenant, &changes).await?))
}

/// GET /config/{id}/edit/ -> current values of a record owned by this tenant.
pub async fn site_config_update_form(
    _staff: RequireStaff,
    State(state): State<SiteConfigState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(id): Path<i64>,
) -> Result<Json<SiteConfigRecord>, SiteConfigError> {
    Ok(Json(state.service.get_by_id(&tenant, id).await?))
}

/// POST /config/{id}/edit/ -> update by explicit id, still scoped to this tenant.
pub async fn site_config_update(
    _staff: RequireStaff,
    State(state): State<SiteConfigState>,
    CurrentTenant(tenant): CurrentTenant,
    Path(id): Path<i64>,
    ChangesPayload(changes): ChangesPayload,
) -> Result<Json<SiteConfigRecord>, SiteConfigError> {
    Ok(Json(state.service.update(&tenant, id, &changes).await?))
}
