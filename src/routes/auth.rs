//! Anonymous identity endpoint and the extractor gating creator-scoped routes.

use axum::{Json, Router, extract::FromRequestParts, http::request::Parts, routing::post};

use crate::{
    dto::auth::AnonymousSession, error::AppError, services::auth_service, state::SharedState,
};

/// Header carrying the opaque user id on identity-gated endpoints.
pub const USER_ID_HEADER: &str = "x-user-id";

/// Identity taken from the `x-user-id` header.
///
/// Extracting it rejects the request with 401 when the header is missing or
/// blank; handlers that take an [`Identity`] parameter are creator-scoped.
#[derive(Debug, Clone)]
pub struct Identity(pub String);

impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| Identity(value.to_string()))
            .ok_or_else(|| AppError::Unauthorized(format!("missing `{USER_ID_HEADER}` header")))
    }
}

/// Mint a fresh anonymous identity for a new client.
#[utoipa::path(
    post,
    path = "/auth/anonymous",
    tag = "auth",
    responses((status = 200, description = "Anonymous identity minted", body = AnonymousSession))
)]
pub async fn anonymous_session() -> Json<AnonymousSession> {
    Json(auth_service::sign_in_anonymously())
}

/// Configure the auth routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/auth/anonymous", post(anonymous_session))
}
