//! Reusable word-set library, capped per owner so the admin UI stays
//! manageable and the `startGame` precondition can be satisfied from a
//! saved set.

use std::time::SystemTime;

use uuid::Uuid;

use crate::{
    dao::models::WordSetEntity,
    dto::word_set::{SaveWordSetRequest, WordSetSummary},
    error::ServiceError,
    state::SharedState,
};

/// List the word sets owned by `user_id`, newest first.
pub async fn list_word_sets(
    state: &SharedState,
    user_id: &str,
) -> Result<Vec<WordSetSummary>, ServiceError> {
    let store = state.require_room_store().await?;
    let sets = store.list_word_sets(user_id).await?;
    Ok(sets.into_iter().map(Into::into).collect())
}

/// Create a new word set, enforcing the per-owner and per-set caps.
pub async fn create_word_set(
    state: &SharedState,
    user_id: &str,
    request: SaveWordSetRequest,
) -> Result<WordSetSummary, ServiceError> {
    let caps = state.config().word_set_caps;
    let items = sanitize_items(request.items, caps.max_items_per_set)?;

    let store = state.require_room_store().await?;
    let existing = store.list_word_sets(user_id).await?;
    if existing.len() >= caps.max_sets_per_owner {
        return Err(ServiceError::InvalidInput(format!(
            "you already have the maximum of {} word sets",
            caps.max_sets_per_owner
        )));
    }

    let now = SystemTime::now();
    let entity = WordSetEntity {
        id: Uuid::new_v4(),
        owner_id: user_id.to_string(),
        name: request.name.trim().to_string(),
        items,
        created_at: now,
        updated_at: now,
    };

    store.save_word_set(entity.clone()).await?;
    Ok(entity.into())
}

/// Replace the name and items of an existing word set.
pub async fn update_word_set(
    state: &SharedState,
    user_id: &str,
    id: Uuid,
    request: SaveWordSetRequest,
) -> Result<WordSetSummary, ServiceError> {
    let caps = state.config().word_set_caps;
    let items = sanitize_items(request.items, caps.max_items_per_set)?;

    let store = state.require_room_store().await?;
    let existing = require_owned(state, user_id, id).await?;

    let entity = WordSetEntity {
        id,
        owner_id: existing.owner_id,
        name: request.name.trim().to_string(),
        items,
        created_at: existing.created_at,
        updated_at: SystemTime::now(),
    };

    store.save_word_set(entity.clone()).await?;
    Ok(entity.into())
}

/// Delete a word set owned by `user_id`.
pub async fn delete_word_set(
    state: &SharedState,
    user_id: &str,
    id: Uuid,
) -> Result<(), ServiceError> {
    let store = state.require_room_store().await?;
    require_owned(state, user_id, id).await?;

    if !store.delete_word_set(id).await? {
        return Err(ServiceError::NotFound(format!("word set `{id}` not found")));
    }
    Ok(())
}

async fn require_owned(
    state: &SharedState,
    user_id: &str,
    id: Uuid,
) -> Result<WordSetEntity, ServiceError> {
    let store = state.require_room_store().await?;
    let set = store
        .find_word_set(id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("word set `{id}` not found")))?;

    if set.owner_id != user_id {
        return Err(ServiceError::Forbidden(
            "word sets can only be modified by their owner".into(),
        ));
    }
    Ok(set)
}

fn sanitize_items(items: Vec<String>, max_items: usize) -> Result<Vec<String>, ServiceError> {
    let items: Vec<String> = items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect();

    if items.is_empty() {
        return Err(ServiceError::InvalidInput(
            "a word set needs at least one non-empty item".into(),
        ));
    }

    if items.len() > max_items {
        return Err(ServiceError::InvalidInput(format!(
            "a word set may hold at most {max_items} items"
        )));
    }

    Ok(items)
}
