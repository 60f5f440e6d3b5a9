//! Reusable word-set endpoints, all scoped to the calling identity.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use axum_valid::Valid;
use uuid::Uuid;

use crate::{
    dto::word_set::{SaveWordSetRequest, WordSetSummary},
    error::AppError,
    routes::auth::Identity,
    services::word_set_service,
    state::SharedState,
};

/// Configure the word-set routes subtree (identity required throughout).
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/word-sets", get(list_word_sets).post(create_word_set))
        .route(
            "/word-sets/{id}",
            put(update_word_set).delete(delete_word_set),
        )
}

/// List the word sets owned by the caller.
#[utoipa::path(
    get,
    path = "/word-sets",
    tag = "word-sets",
    params(("x-user-id" = String, Header, description = "Identity of the owner")),
    responses((status = 200, description = "Word sets owned by the caller", body = [WordSetSummary]))
)]
pub async fn list_word_sets(
    State(state): State<SharedState>,
    Identity(user_id): Identity,
) -> Result<Json<Vec<WordSetSummary>>, AppError> {
    Ok(Json(
        word_set_service::list_word_sets(&state, &user_id).await?,
    ))
}

/// Create a new word set for the caller.
#[utoipa::path(
    post,
    path = "/word-sets",
    tag = "word-sets",
    params(("x-user-id" = String, Header, description = "Identity of the owner")),
    request_body = SaveWordSetRequest,
    responses(
        (status = 200, description = "Word set created", body = WordSetSummary),
        (status = 400, description = "Set or item caps exceeded")
    )
)]
pub async fn create_word_set(
    State(state): State<SharedState>,
    Identity(user_id): Identity,
    Valid(Json(payload)): Valid<Json<SaveWordSetRequest>>,
) -> Result<Json<WordSetSummary>, AppError> {
    Ok(Json(
        word_set_service::create_word_set(&state, &user_id, payload).await?,
    ))
}

/// Replace the name and items of an existing word set.
#[utoipa::path(
    put,
    path = "/word-sets/{id}",
    tag = "word-sets",
    params(
        ("x-user-id" = String, Header, description = "Identity of the owner"),
        ("id" = Uuid, Path, description = "Word set identifier")
    ),
    request_body = SaveWordSetRequest,
    responses((status = 200, description = "Word set updated", body = WordSetSummary))
)]
pub async fn update_word_set(
    State(state): State<SharedState>,
    Identity(user_id): Identity,
    Path(id): Path<Uuid>,
    Valid(Json(payload)): Valid<Json<SaveWordSetRequest>>,
) -> Result<Json<WordSetSummary>, AppError> {
    Ok(Json(
        word_set_service::update_word_set(&state, &user_id, id, payload).await?,
    ))
}

/// Delete a word set owned by the caller.
#[utoipa::path(
    delete,
    path = "/word-sets/{id}",
    tag = "word-sets",
    params(
        ("x-user-id" = String, Header, description = "Identity of the owner"),
        ("id" = Uuid, Path, description = "Word set identifier")
    ),
    responses((status = 204, description = "Word set deleted"))
)]
pub async fn delete_word_set(
    State(state): State<SharedState>,
    Identity(user_id): Identity,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    word_set_service::delete_word_set(&state, &user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
