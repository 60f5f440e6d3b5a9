//! Gameplay endpoints: cell marking, approval decisions and call-outs.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use axum_valid::Valid;

use crate::{
    dto::{
        common::ActionResponse,
        play::{ApprovalDecisionResponse, CallOutRequest, CallOutResponse, MarkCellRequest},
    },
    error::AppError,
    services::play_service,
    state::SharedState,
};

/// Configure the gameplay routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/rooms/{id}/marks", post(mark_cell))
        .route("/rooms/{id}/approvals/{index}/approve", post(approve_mark))
        .route("/rooms/{id}/approvals/{index}/reject", post(reject_mark))
        .route(
            "/rooms/{id}/callouts",
            post(call_out_word).delete(clear_called_out_words),
        )
}

/// Mark a cell of the calling player's grid, queueing an approval.
#[utoipa::path(
    post,
    path = "/rooms/{id}/marks",
    tag = "play",
    params(("id" = String, Path, description = "Room code")),
    request_body = MarkCellRequest,
    responses(
        (status = 200, description = "Cell marked", body = ActionResponse),
        (status = 409, description = "Cell already marked")
    )
)]
pub async fn mark_cell(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<MarkCellRequest>>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(play_service::mark_cell(&state, &id, payload).await?))
}

/// Approve the pending mark at the given queue index.
#[utoipa::path(
    post,
    path = "/rooms/{id}/approvals/{index}/approve",
    tag = "play",
    params(
        ("id" = String, Path, description = "Room code"),
        ("index" = usize, Path, description = "Index into the pending approvals queue")
    ),
    responses((status = 200, description = "Mark approved", body = ApprovalDecisionResponse))
)]
pub async fn approve_mark(
    State(state): State<SharedState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<ApprovalDecisionResponse>, AppError> {
    Ok(Json(play_service::approve_mark(&state, &id, index).await?))
}

/// Reject the pending mark at the given queue index.
#[utoipa::path(
    post,
    path = "/rooms/{id}/approvals/{index}/reject",
    tag = "play",
    params(
        ("id" = String, Path, description = "Room code"),
        ("index" = usize, Path, description = "Index into the pending approvals queue")
    ),
    responses((status = 200, description = "Mark rejected", body = ApprovalDecisionResponse))
)]
pub async fn reject_mark(
    State(state): State<SharedState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<ApprovalDecisionResponse>, AppError> {
    Ok(Json(play_service::reject_mark(&state, &id, index).await?))
}

/// Toggle a call-out for a word, auto-marking matching cells room-wide.
#[utoipa::path(
    post,
    path = "/rooms/{id}/callouts",
    tag = "play",
    params(("id" = String, Path, description = "Room code")),
    request_body = CallOutRequest,
    responses((status = 200, description = "Call-out toggled", body = CallOutResponse))
)]
pub async fn call_out_word(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<CallOutRequest>>,
) -> Result<Json<CallOutResponse>, AppError> {
    Ok(Json(
        play_service::call_out_word(&state, &id, payload).await?,
    ))
}

/// Clear the called-out word list without touching grids.
#[utoipa::path(
    delete,
    path = "/rooms/{id}/callouts",
    tag = "play",
    params(("id" = String, Path, description = "Room code")),
    responses((status = 200, description = "Called-out words cleared", body = ActionResponse))
)]
pub async fn clear_called_out_words(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ActionResponse>, AppError> {
    Ok(Json(
        play_service::clear_called_out_words(&state, &id).await?,
    ))
}
