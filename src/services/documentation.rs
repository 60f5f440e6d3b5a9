use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the stream bingo backend.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::auth::anonymous_session,
        crate::routes::rooms::create_room,
        crate::routes::rooms::list_rooms,
        crate::routes::rooms::get_room,
        crate::routes::rooms::delete_room,
        crate::routes::rooms::join_room,
        crate::routes::rooms::start_game,
        crate::routes::rooms::reset_game,
        crate::routes::rooms::add_word,
        crate::routes::rooms::add_words,
        crate::routes::rooms::remove_word,
        crate::routes::play::mark_cell,
        crate::routes::play::approve_mark,
        crate::routes::play::reject_mark,
        crate::routes::play::call_out_word,
        crate::routes::play::clear_called_out_words,
        crate::routes::word_sets::list_word_sets,
        crate::routes::word_sets::create_word_set,
        crate::routes::word_sets::update_word_set,
        crate::routes::word_sets::delete_word_set,
        crate::routes::sse::room_stream,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::auth::AnonymousSession,
            crate::dto::common::ActionResponse,
            crate::dto::common::RoomSnapshot,
            crate::dto::common::CellSnapshot,
            crate::dto::common::PlayerSnapshot,
            crate::dto::common::ApprovalSnapshot,
            crate::dto::room::CreateRoomRequest,
            crate::dto::room::JoinRoomRequest,
            crate::dto::room::JoinRoomResponse,
            crate::dto::room::AddWordRequest,
            crate::dto::room::AddWordsRequest,
            crate::dto::room::WordPoolResponse,
            crate::dto::room::RoomListItem,
            crate::dto::play::MarkCellRequest,
            crate::dto::play::ApprovalDecisionResponse,
            crate::dto::play::CallOutRequest,
            crate::dto::play::CallOutResponse,
            crate::dto::word_set::SaveWordSetRequest,
            crate::dto::word_set::WordSetSummary,
            crate::dto::sse::RoomDeletedEvent,
            crate::dao::models::RoomStatus,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Anonymous identity"),
        (name = "rooms", description = "Room lifecycle and word pool management"),
        (name = "play", description = "Marking, approvals and call-outs"),
        (name = "word-sets", description = "Reusable word lists"),
        (name = "sse", description = "Server-sent room event streams"),
    )
)]
pub struct ApiDoc;
