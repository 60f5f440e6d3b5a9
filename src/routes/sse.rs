use std::convert::Infallible;

use axum::{
    Router,
    extract::{Path, State},
    response::sse::Sse,
    routing::get,
};
use futures::Stream;
use tracing::info;

use crate::{error::AppError, services::sse_service, state::SharedState};

#[utoipa::path(
    get,
    path = "/rooms/{id}/events",
    tag = "sse",
    params(("id" = String, Path, description = "Room code")),
    responses(
        (status = 200, description = "Room event stream", content_type = "text/event-stream", body = String),
        (status = 404, description = "Room not found")
    )
)]
/// Stream realtime room snapshots to a connected client. The first event
/// replays the current snapshot.
pub async fn room_stream(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>>, AppError> {
    let (handshake, receiver) = sse_service::subscribe_room(&state, &id).await?;
    info!(room = %id, "new room SSE connection");
    Ok(sse_service::to_sse_stream(handshake, receiver))
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/rooms/{id}/events", get(room_stream))
}
