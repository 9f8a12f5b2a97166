use axum::Json;
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};
use axum::response::{IntoResponse, Response};
use axum_extra::TypedHeader;
use headers::Host;
use serde_json::json;

use crate::types::TenantId;

pub const TENANT_HEADER: &str = "x-tenant-id";

/// Tenant the request is scoped to.
///
/// Resolved from `x-tenant-id` when present, otherwise from the first label of `Host`.
#[derive(Debug, Clone)]
pub struct CurrentTenant(pub TenantId);

impl<S> FromRequestParts<S> for CurrentTenant
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // An explicit header must be valid on its own; it never falls back to `Host`.
        if let Some(raw) = parts.headers.get(TENANT_HEADER) {
            return raw
                .to_str()
                .ok()
                .and_then(TenantId::parse)
                .map(Self)
                .ok_or_else(|| reject("invalid x-tenant-id header"));
        }

        let host = TypedHeader::<Host>::from_request_parts(parts, state).await.ok();
        host.and_then(|TypedHeader(host)| TenantId::from_host(host.hostname()))
            .map(Self)
            .ok_or_else(|| reject("unable to resolve tenant"))
    }
}

fn reject(reason: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({"error": "bad_request", "reason": reason})),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn resolve(req: Request<()>) -> Result<CurrentTenant, Response> {
        let (mut parts, _) = req.into_parts();
        CurrentTenant::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn header_takes_precedence_over_host() {
        let req = Request::builder()
            .header(TENANT_HEADER, "Acme")
            .header("host", "other.example.com")
            .body(())
            .unwrap();
        let CurrentTenant(tenant) = resolve(req).await.unwrap();
        assert_eq!(tenant.as_str(), "acme");
    }

    #[tokio::test]
    async fn blank_header_is_rejected_even_with_host() {
        let req = Request::builder()
            .header(TENANT_HEADER, "   ")
            .header("host", "acme.example.com")
            .body(())
            .unwrap();
        let rejection = resolve(req).await.unwrap_err();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn non_ascii_header_is_rejected_even_with_host() {
        let req = Request::builder()
            .header(
                TENANT_HEADER,
                axum::http::HeaderValue::from_bytes(b"acm\xe9").unwrap(),
            )
            .header("host", "acme.example.com")
            .body(())
            .unwrap();
        let rejection = resolve(req).await.unwrap_err();
        assert_eq!(rejection.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn host_label_is_used_without_header() {
        let req = Request::builder()
            .header("host", "acme.example.com:8000")
            .body(())
            .unwrap();
        let CurrentTenant(tenant) = resolve(req).await.unwrap();
        assert_eq!(tenant.as_str(), "acme");
    }
}
