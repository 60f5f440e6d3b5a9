//! Business logic behind the room lifecycle routes: creation, lookup,
//! joining, start/reset, word-pool management and deletion.

use std::time::SystemTime;

use tracing::info;

use crate::{
    dao::models::RoomEntity,
    dto::{
        common::RoomSnapshot,
        room::{
            AddWordRequest, AddWordsRequest, CreateRoomRequest, JoinRoomRequest, JoinRoomResponse,
            RoomListItem, WordPoolResponse,
        },
    },
    error::{RoomError, ServiceError},
    services::reconcile,
    state::{SharedState, room::Room},
};

/// Normalize a human-entered room code the way the store keys it.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Create a new room owned by `user_id`, failing when the code is taken.
pub async fn create_room(
    state: &SharedState,
    user_id: &str,
    request: CreateRoomRequest,
) -> Result<RoomSnapshot, ServiceError> {
    let code = normalize_code(&request.code);
    let store = state.require_room_store().await?;

    let mut room = Room::new(
        code.clone(),
        request.grid_size,
        user_id.to_string(),
        Vec::new(),
        SystemTime::now(),
    );
    room.add_words(&request.words);

    let entity: RoomEntity = room.into();
    if !store.create_room(entity.clone()).await? {
        return Err(RoomError::DuplicateCode(code).into());
    }

    info!(room = %code, grid_size = request.grid_size, "room created");
    Ok((&entity).into())
}

/// Fetch the current snapshot of a room.
pub async fn get_room(state: &SharedState, room_id: &str) -> Result<RoomSnapshot, ServiceError> {
    let code = normalize_code(room_id);
    let store = state.require_room_store().await?;
    let entity = store
        .find_room(&code)
        .await?
        .ok_or_else(|| ServiceError::from(RoomError::RoomNotFound(code.clone())))?;
    Ok((&entity).into())
}

/// List the rooms created by `user_id`.
pub async fn list_rooms(
    state: &SharedState,
    user_id: &str,
) -> Result<Vec<RoomListItem>, ServiceError> {
    let store = state.require_room_store().await?;
    let items = store.list_rooms(user_id).await?;
    Ok(items.into_iter().map(Into::into).collect())
}

/// Delete a room; only its creator may do so. The room's live feed is torn
/// down with it.
pub async fn delete_room(
    state: &SharedState,
    user_id: &str,
    room_id: &str,
) -> Result<(), ServiceError> {
    let code = normalize_code(room_id);
    let store = state.require_room_store().await?;

    let entity = store
        .find_room(&code)
        .await?
        .ok_or_else(|| ServiceError::from(RoomError::RoomNotFound(code.clone())))?;

    if entity.creator_id != user_id {
        return Err(RoomError::PermissionDenied.into());
    }

    if !store.delete_room(&code).await? {
        return Err(RoomError::RoomNotFound(code).into());
    }

    state.feeds().close(&entity.id).await;
    info!(room = %entity.id, "room deleted");
    Ok(())
}

/// Join a room as a player. Idempotent for the roster; a grid is generated
/// lazily when joining an already-active game.
pub async fn join_room(
    state: &SharedState,
    room_id: &str,
    request: JoinRoomRequest,
) -> Result<JoinRoomResponse, ServiceError> {
    let code = normalize_code(room_id);
    let nickname = request.nickname.trim().to_string();
    let store = state.require_room_store().await?;
    let policy = state.config().write_retry.clone();

    let now = SystemTime::now();
    let (outcome, entity) = reconcile::update_room(&store, &policy, &code, |room| {
        room.join(&nickname, now)
    })
    .await?;

    if outcome.newly_joined {
        info!(room = %code, player = %nickname, "player joined");
    }

    Ok(JoinRoomResponse {
        room_id: entity.id,
        grid_ready: entity.player_grids.contains_key(&nickname),
        nickname,
        newly_joined: outcome.newly_joined,
    })
}

/// Start the game: setup → active, assigning a grid to every current player.
pub async fn start_game(state: &SharedState, room_id: &str) -> Result<RoomSnapshot, ServiceError> {
    let code = normalize_code(room_id);
    let store = state.require_room_store().await?;
    let policy = state.config().write_retry.clone();

    let now = SystemTime::now();
    let (_, entity) =
        reconcile::update_room(&store, &policy, &code, |room| room.start_game(now)).await?;

    info!(room = %code, players = entity.players.len(), "game started");
    Ok((&entity).into())
}

/// Reset the game back to setup, preserving the word pool and roster.
pub async fn reset_game(state: &SharedState, room_id: &str) -> Result<RoomSnapshot, ServiceError> {
    let code = normalize_code(room_id);
    let store = state.require_room_store().await?;
    let policy = state.config().write_retry.clone();

    let (_, entity) = reconcile::update_room(&store, &policy, &code, |room| {
        room.reset_game();
        Ok(())
    })
    .await?;

    info!(room = %code, "game reset to setup");
    Ok((&entity).into())
}

/// Add a single word to the pool, skipping exact duplicates.
pub async fn add_word(
    state: &SharedState,
    room_id: &str,
    request: AddWordRequest,
) -> Result<WordPoolResponse, ServiceError> {
    let code = normalize_code(room_id);
    let store = state.require_room_store().await?;
    let policy = state.config().write_retry.clone();

    let (added, entity) = reconcile::update_room(&store, &policy, &code, |room| {
        Ok(room.add_word(&request.word))
    })
    .await?;

    Ok(WordPoolResponse {
        words: entity.words,
        changed: usize::from(added),
    })
}

/// Add several words to the pool in one operation.
pub async fn add_words(
    state: &SharedState,
    room_id: &str,
    request: AddWordsRequest,
) -> Result<WordPoolResponse, ServiceError> {
    let code = normalize_code(room_id);
    let store = state.require_room_store().await?;
    let policy = state.config().write_retry.clone();

    let (added, entity) = reconcile::update_room(&store, &policy, &code, |room| {
        Ok(room.add_words(&request.words))
    })
    .await?;

    Ok(WordPoolResponse {
        words: entity.words,
        changed: added,
    })
}

/// Remove the word at `index` from the pool.
pub async fn remove_word(
    state: &SharedState,
    room_id: &str,
    index: usize,
) -> Result<WordPoolResponse, ServiceError> {
    let code = normalize_code(room_id);
    let store = state.require_room_store().await?;
    let policy = state.config().write_retry.clone();

    let (_, entity) =
        reconcile::update_room(&store, &policy, &code, |room| room.remove_word(index)).await?;

    Ok(WordPoolResponse {
        words: entity.words,
        changed: 1,
    })
}
