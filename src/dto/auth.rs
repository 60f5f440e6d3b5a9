//! DTO definitions for the anonymous identity endpoint.

use serde::Serialize;
use utoipa::ToSchema;

/// Opaque identity minted for an anonymous user.
///
/// Clients present the id in the `x-user-id` header on identity-gated
/// endpoints; the backend never stores it outside the documents it stamps.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnonymousSession {
    /// Opaque user identifier.
    pub user_id: String,
}
