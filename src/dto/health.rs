use serde::Serialize;
use utoipa::ToSchema;

/// Health payload returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Overall status ("ok" or "degraded").
    pub status: String,
    /// Whether the backend currently runs without a storage connection.
    pub degraded: bool,
}

impl HealthResponse {
    /// Health response for a backend with working storage.
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            degraded: false,
        }
    }

    /// Health response for a backend in degraded mode.
    pub fn degraded() -> Self {
        Self {
            status: "degraded".to_string(),
            degraded: true,
        }
    }
}
