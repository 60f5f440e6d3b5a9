use axum::Router;

use crate::state::SharedState;

pub mod auth;
pub mod docs;
pub mod health;
pub mod play;
pub mod rooms;
pub mod sse;
pub mod word_sets;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    let api_router = health::router()
        .merge(auth::router())
        .merge(sse::router())
        .merge(rooms::router())
        .merge(play::router())
        .merge(word_sets::router());

    let docs_router = docs::router(state.clone());

    api_router.merge(docs_router).with_state(state)
}
