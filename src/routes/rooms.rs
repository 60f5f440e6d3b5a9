//! Room lifecycle endpoints: create, inspect, join, start/reset, word pool.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use axum_valid::Valid;

use crate::{
    dto::{
        common::RoomSnapshot,
        room::{
            AddWordRequest, AddWordsRequest, CreateRoomRequest, JoinRoomRequest, JoinRoomResponse,
            RoomListItem, WordPoolResponse,
        },
    },
    error::AppError,
    routes::auth::Identity,
    services::room_service,
    state::SharedState,
};

/// Room routes; creator-scoped handlers take an [`Identity`] extractor.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/rooms", post(create_room).get(list_rooms))
        .route("/rooms/{id}", get(get_room).delete(delete_room))
        .route("/rooms/{id}/join", post(join_room))
        .route("/rooms/{id}/start", post(start_game))
        .route("/rooms/{id}/reset", post(reset_game))
        .route("/rooms/{id}/words", post(add_word))
        .route("/rooms/{id}/words/batch", post(add_words))
        .route("/rooms/{id}/words/{index}", delete(remove_word))
}

/// Create a new room owned by the calling user.
#[utoipa::path(
    post,
    path = "/rooms",
    tag = "rooms",
    params(("x-user-id" = String, Header, description = "Identity of the creating admin")),
    request_body = CreateRoomRequest,
    responses(
        (status = 200, description = "Room created", body = RoomSnapshot),
        (status = 409, description = "Room code already taken")
    )
)]
pub async fn create_room(
    State(state): State<SharedState>,
    Identity(user_id): Identity,
    Valid(Json(payload)): Valid<Json<CreateRoomRequest>>,
) -> Result<Json<RoomSnapshot>, AppError> {
    Ok(Json(
        room_service::create_room(&state, &user_id, payload).await?,
    ))
}

/// List the rooms created by the calling user.
#[utoipa::path(
    get,
    path = "/rooms",
    tag = "rooms",
    params(("x-user-id" = String, Header, description = "Identity of the creating admin")),
    responses((status = 200, description = "Rooms owned by the caller", body = [RoomListItem]))
)]
pub async fn list_rooms(
    State(state): State<SharedState>,
    Identity(user_id): Identity,
) -> Result<Json<Vec<RoomListItem>>, AppError> {
    Ok(Json(room_service::list_rooms(&state, &user_id).await?))
}

/// Fetch the current snapshot of a room.
#[utoipa::path(
    get,
    path = "/rooms/{id}",
    tag = "rooms",
    params(("id" = String, Path, description = "Room code")),
    responses(
        (status = 200, description = "Room snapshot", body = RoomSnapshot),
        (status = 404, description = "Room not found")
    )
)]
pub async fn get_room(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<RoomSnapshot>, AppError> {
    Ok(Json(room_service::get_room(&state, &id).await?))
}

/// Delete a room; restricted to its creator.
#[utoipa::path(
    delete,
    path = "/rooms/{id}",
    tag = "rooms",
    params(
        ("x-user-id" = String, Header, description = "Identity of the creating admin"),
        ("id" = String, Path, description = "Room code")
    ),
    responses(
        (status = 204, description = "Room deleted"),
        (status = 403, description = "Caller is not the creator")
    )
)]
pub async fn delete_room(
    State(state): State<SharedState>,
    Identity(user_id): Identity,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    room_service::delete_room(&state, &user_id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Join a room as a player (idempotent for the roster).
#[utoipa::path(
    post,
    path = "/rooms/{id}/join",
    tag = "rooms",
    params(("id" = String, Path, description = "Room code")),
    request_body = JoinRoomRequest,
    responses(
        (status = 200, description = "Joined (or resumed)", body = JoinRoomResponse),
        (status = 404, description = "Room not found")
    )
)]
pub async fn join_room(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<JoinRoomRequest>>,
) -> Result<Json<JoinRoomResponse>, AppError> {
    Ok(Json(room_service::join_room(&state, &id, payload).await?))
}

/// Start the game, assigning grids to every current player.
#[utoipa::path(
    post,
    path = "/rooms/{id}/start",
    tag = "rooms",
    params(("id" = String, Path, description = "Room code")),
    responses(
        (status = 200, description = "Game started", body = RoomSnapshot),
        (status = 400, description = "Not enough words for the grid size")
    )
)]
pub async fn start_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<RoomSnapshot>, AppError> {
    Ok(Json(room_service::start_game(&state, &id).await?))
}

/// Reset the game back to setup, preserving words and roster.
#[utoipa::path(
    post,
    path = "/rooms/{id}/reset",
    tag = "rooms",
    params(("id" = String, Path, description = "Room code")),
    responses((status = 200, description = "Game reset", body = RoomSnapshot))
)]
pub async fn reset_game(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<RoomSnapshot>, AppError> {
    Ok(Json(room_service::reset_game(&state, &id).await?))
}

/// Add a single word to the pool.
#[utoipa::path(
    post,
    path = "/rooms/{id}/words",
    tag = "rooms",
    params(("id" = String, Path, description = "Room code")),
    request_body = AddWordRequest,
    responses((status = 200, description = "Word pool after the addition", body = WordPoolResponse))
)]
pub async fn add_word(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<AddWordRequest>>,
) -> Result<Json<WordPoolResponse>, AppError> {
    Ok(Json(room_service::add_word(&state, &id, payload).await?))
}

/// Add several words to the pool at once.
#[utoipa::path(
    post,
    path = "/rooms/{id}/words/batch",
    tag = "rooms",
    params(("id" = String, Path, description = "Room code")),
    request_body = AddWordsRequest,
    responses((status = 200, description = "Word pool after the additions", body = WordPoolResponse))
)]
pub async fn add_words(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    Valid(Json(payload)): Valid<Json<AddWordsRequest>>,
) -> Result<Json<WordPoolResponse>, AppError> {
    Ok(Json(room_service::add_words(&state, &id, payload).await?))
}

/// Remove the word at the given index from the pool.
#[utoipa::path(
    delete,
    path = "/rooms/{id}/words/{index}",
    tag = "rooms",
    params(
        ("id" = String, Path, description = "Room code"),
        ("index" = usize, Path, description = "Zero-based index into the pool")
    ),
    responses((status = 200, description = "Word pool after the removal", body = WordPoolResponse))
)]
pub async fn remove_word(
    State(state): State<SharedState>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<Json<WordPoolResponse>, AppError> {
    Ok(Json(room_service::remove_word(&state, &id, index).await?))
}
