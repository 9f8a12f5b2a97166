use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use crate::db::SiteConfigChanges;

/// Update payload from either a browser form post or a JSON body.
pub struct ChangesPayload(pub SiteConfigChanges);

impl<S> FromRequest<S> for ChangesPayload
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.trim_start().starts_with("application/json"));

        if is_json {
            let Json(changes) = Json::<SiteConfigChanges>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(changes))
        } else {
            let Form(changes) = Form::<SiteConfigChanges>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(changes))
        }
    }
}
