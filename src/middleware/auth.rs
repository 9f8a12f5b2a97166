use axum::extract::{FromRef, FromRequestParts};
use axum::http::{HeaderMap, StatusCode, header, request::Parts};
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use tracing::{debug, warn};

use crate::middleware::tenant::CurrentTenant;
use crate::types::TenantId;

/// Where non-staff callers of administrative routes are sent.
pub const ADMIN_LOGIN_PATH: &str = "/admin/login/";

/// Per-tenant staff secrets. A caller is staff only for the tenant whose key it presents.
#[derive(Debug, Clone)]
pub struct StaffKeys(Arc<HashMap<TenantId, String>>);

impl StaffKeys {
    /// Tenant names are normalized like [`TenantId`]; blank names or keys are dropped.
    pub fn new(keys: HashMap<String, String>) -> Self {
        let keys = keys
            .into_iter()
            .filter_map(|(tenant, key)| match TenantId::parse(&tenant) {
                Some(tenant) if !key.is_empty() => Some((tenant, key)),
                _ => {
                    warn!(tenant = %tenant, "ignoring staff key with blank tenant or key");
                    None
                }
            })
            .collect();
        Self(Arc::new(keys))
    }

    pub fn key_for(&self, tenant: &TenantId) -> Option<&str> {
        self.0.get(tenant).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Whether the inbound request carries the staff key.
/// Accepts either:
/// - Header: `x-staff-key: ...`
/// - Header: `Authorization: Bearer ...`
pub fn is_staff(headers: &HeaderMap, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    let key_matches = |candidate: &str| bool::from(candidate.as_bytes().ct_eq(expected.as_bytes()));

    if let Some(hv) = headers.get("x-staff-key").and_then(|v| v.to_str().ok())
        && key_matches(hv.trim())
    {
        return true;
    }

    if let Some(auth) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        let auth = auth.trim();
        if let Some(token) = auth
            .strip_prefix("Bearer ")
            .or_else(|| auth.strip_prefix("bearer "))
            && key_matches(token.trim())
        {
            return true;
        }
    }

    false
}

/// `302` to the admin login page, carrying the original target as `next`.
pub fn redirect_to_admin_login(next: &str) -> Response {
    let next: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
    let location = format!("{ADMIN_LOGIN_PATH}?next={next}");
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

/// Extractor gate for administrative routes. Rejects with a login redirect, so the
/// handler never runs for non-staff callers.
#[derive(Debug, Clone, Copy)]
pub struct RequireStaff;

impl<S> FromRequestParts<S> for RequireStaff
where
    S: Send + Sync,
    StaffKeys: FromRef<S>,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentTenant(tenant) = CurrentTenant::from_request_parts(parts, state).await?;
        let keys = StaffKeys::from_ref(state);
        if let Some(expected) = keys.key_for(&tenant)
            && is_staff(&parts.headers, expected)
        {
            return Ok(Self);
        }

        let target = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| parts.uri.path());
        debug!(tenant = %tenant, path = %target, "non-staff caller redirected to admin login");
        Err(redirect_to_admin_login(target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(name: &'static str, value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(name, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn accepts_staff_header_and_bearer() {
        assert!(is_staff(&headers("x-staff-key", "s3cret"), "s3cret"));
        assert!(is_staff(&headers("authorization", "Bearer s3cret"), "s3cret"));
        assert!(is_staff(&headers("authorization", "bearer s3cret"), "s3cret"));
    }

    #[test]
    fn rejects_wrong_or_missing_key() {
        assert!(!is_staff(&HeaderMap::new(), "s3cret"));
        assert!(!is_staff(&headers("x-staff-key", "nope"), "s3cret"));
        assert!(!is_staff(&headers("authorization", "Basic s3cret"), "s3cret"));
    }

    #[test]
    fn empty_expected_key_matches_nobody() {
        assert!(!is_staff(&headers("x-staff-key", ""), ""));
        assert!(!is_staff(&headers("authorization", "Bearer "), ""));
    }

    #[test]
    fn staff_keys_are_scoped_by_normalized_tenant() {
        let keys = StaffKeys::new(HashMap::from([
            ("Acme".to_string(), "acme-key".to_string()),
            ("other".to_string(), "other-key".to_string()),
            ("  ".to_string(), "orphan".to_string()),
            ("blank".to_string(), String::new()),
        ]));
        let acme = TenantId::parse("acme").unwrap();
        let other = TenantId::parse("other").unwrap();

        assert_eq!(keys.key_for(&acme), Some("acme-key"));
        assert_eq!(keys.key_for(&other), Some("other-key"));
        assert_eq!(keys.key_for(&TenantId::parse("blank").unwrap()), None);
        assert!(!is_staff(&headers("x-staff-key", "acme-key"), keys.key_for(&other).unwrap()));
    }

    #[test]
    fn redirect_carries_encoded_next() {
        let resp = redirect_to_admin_login("/config/3/edit/");
        assert_eq!(resp.status(), StatusCode::FOUND);
        let location = resp.headers().get(header::LOCATION).unwrap();
        assert_eq!(location, "/admin/login/?next=%2Fconfig%2F3%2Fedit%2F");
    }
}
