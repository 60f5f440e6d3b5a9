//! Business logic behind the gameplay routes: the player-mark →
//! pending-approval → admin-decision workflow and admin call-outs.

use std::time::SystemTime;

use tracing::info;

use crate::{
    dto::{
        common::ActionResponse,
        play::{ApprovalDecisionResponse, CallOutRequest, CallOutResponse, MarkCellRequest},
    },
    error::ServiceError,
    services::{reconcile, room_service::normalize_code},
    state::SharedState,
};

/// Mark a cell on behalf of a player and enqueue the admin approval.
pub async fn mark_cell(
    state: &SharedState,
    room_id: &str,
    request: MarkCellRequest,
) -> Result<ActionResponse, ServiceError> {
    let code = normalize_code(room_id);
    let nickname = request.nickname.trim().to_string();
    let store = state.require_room_store().await?;
    let policy = state.config().write_retry.clone();

    let now = SystemTime::now();
    reconcile::update_room(&store, &policy, &code, |room| {
        room.mark_cell(&nickname, request.row, request.col, now)
    })
    .await?;

    Ok(ActionResponse {
        message: "cell marked; waiting for admin approval".into(),
    })
}

/// Approve the pending mark at `index`, recording a fresh bingo when the
/// approval completes a line.
pub async fn approve_mark(
    state: &SharedState,
    room_id: &str,
    index: usize,
) -> Result<ApprovalDecisionResponse, ServiceError> {
    let code = normalize_code(room_id);
    let store = state.require_room_store().await?;
    let policy = state.config().write_retry.clone();

    let (decision, entity) =
        reconcile::update_room(&store, &policy, &code, |room| room.approve_mark(index)).await?;

    if decision.bingo {
        info!(room = %code, player = %decision.player_name, "bingo!");
    }

    Ok(ApprovalDecisionResponse {
        player_name: decision.player_name,
        word: decision.word,
        bingo: decision.bingo,
        pending_approvals: entity.pending_approvals.len(),
    })
}

/// Reject the pending mark at `index`, reverting the cell to unmarked.
pub async fn reject_mark(
    state: &SharedState,
    room_id: &str,
    index: usize,
) -> Result<ApprovalDecisionResponse, ServiceError> {
    let code = normalize_code(room_id);
    let store = state.require_room_store().await?;
    let policy = state.config().write_retry.clone();

    let (decision, entity) =
        reconcile::update_room(&store, &policy, &code, |room| room.reject_mark(index)).await?;

    Ok(ApprovalDecisionResponse {
        player_name: decision.player_name,
        word: decision.word,
        bingo: false,
        pending_approvals: entity.pending_approvals.len(),
    })
}

/// Toggle a call-out: auto-mark (or revert) every matching cell room-wide
/// and recompute the winner set.
pub async fn call_out_word(
    state: &SharedState,
    room_id: &str,
    request: CallOutRequest,
) -> Result<CallOutResponse, ServiceError> {
    let code = normalize_code(room_id);
    let word = request.word.trim().to_string();
    let store = state.require_room_store().await?;
    let policy = state.config().write_retry.clone();

    let (outcome, entity) =
        reconcile::update_room(&store, &policy, &code, |room| room.toggle_call_out(&word))
            .await?;

    info!(
        room = %code,
        word = %outcome.word,
        called = outcome.called,
        cells = outcome.cells_changed,
        "call-out toggled"
    );

    Ok(CallOutResponse {
        word: outcome.word,
        called: outcome.called,
        cells_changed: outcome.cells_changed,
        bingo_winners: entity.bingo_winners,
    })
}

/// Clear the called-out word list without touching any grid.
pub async fn clear_called_out_words(
    state: &SharedState,
    room_id: &str,
) -> Result<ActionResponse, ServiceError> {
    let code = normalize_code(room_id);
    let store = state.require_room_store().await?;
    let policy = state.config().write_retry.clone();

    let (cleared, _) = reconcile::update_room(&store, &policy, &code, |room| {
        Ok(room.clear_called_out_words())
    })
    .await?;

    Ok(ActionResponse {
        message: format!("cleared {cleared} called-out words"),
    })
}
