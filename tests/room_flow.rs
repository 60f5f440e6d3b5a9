//! End-to-end scenarios driving the service layer against the in-memory store.

use std::sync::Arc;
use std::time::Duration;

use stream_bingo_back::{
    config::{AppConfig, RetryPolicy},
    dao::{
        models::RoomStatus,
        room_store::{RoomStore, memory::MemoryRoomStore},
    },
    dto::{
        play::{CallOutRequest, MarkCellRequest},
        room::{AddWordRequest, AddWordsRequest, CreateRoomRequest, JoinRoomRequest},
    },
    error::ServiceError,
    services::{play_service, room_service},
    state::{AppState, SharedState},
};

fn fast_config() -> AppConfig {
    AppConfig {
        write_retry: RetryPolicy {
            attempts: 1,
            initial_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(100),
        },
        ..AppConfig::default()
    }
}

async fn test_state() -> (SharedState, MemoryRoomStore) {
    let state = AppState::new(fast_config());
    let store = MemoryRoomStore::new();
    state.install_room_store(Arc::new(store.clone())).await;
    (state, store)
}

fn nine_words() -> Vec<String> {
    (0..9).map(|i| format!("catchphrase-{i}")).collect()
}

fn create_request(code: &str, grid_size: u8, words: Vec<String>) -> CreateRoomRequest {
    CreateRoomRequest {
        code: code.into(),
        grid_size,
        words,
    }
}

fn join_request(nickname: &str) -> JoinRoomRequest {
    JoinRoomRequest {
        nickname: nickname.into(),
    }
}

#[tokio::test]
async fn create_start_join_mark_approve_round_trip() {
    let (state, store) = test_state().await;

    let snapshot = room_service::create_room(&state, "admin", create_request("abc123", 3, nine_words()))
        .await
        .unwrap();
    assert_eq!(snapshot.id, "ABC123");
    assert_eq!(snapshot.status, RoomStatus::Setup);

    let started = room_service::start_game(&state, "ABC123").await.unwrap();
    assert_eq!(started.status, RoomStatus::Active);

    let joined = room_service::join_room(&state, "abc123", join_request("Alice"))
        .await
        .unwrap();
    assert!(joined.newly_joined);
    assert!(joined.grid_ready);

    // Alice's grid holds all nine pool words exactly once.
    let entity = store.find_room("ABC123").await.unwrap().unwrap();
    let grid = &entity.player_grids["Alice"];
    assert_eq!(grid.len(), 9);
    let mut used: Vec<&str> = grid.values().map(|cell| cell.word.as_str()).collect();
    used.sort_unstable();
    let mut expected: Vec<String> = nine_words();
    expected.sort_unstable();
    assert_eq!(used, expected.iter().map(String::as_str).collect::<Vec<_>>());

    play_service::mark_cell(
        &state,
        "ABC123",
        MarkCellRequest {
            nickname: "Alice".into(),
            row: 0,
            col: 0,
        },
    )
    .await
    .unwrap();

    let entity = store.find_room("ABC123").await.unwrap().unwrap();
    assert_eq!(entity.pending_approvals.len(), 1);
    assert_eq!(entity.pending_approvals[0].player_name, "Alice");

    let decision = play_service::approve_mark(&state, "ABC123", 0).await.unwrap();
    assert_eq!(decision.player_name, "Alice");
    assert_eq!(decision.pending_approvals, 0);

    let entity = store.find_room("ABC123").await.unwrap().unwrap();
    let cell = &entity.player_grids["Alice"]["0_0"];
    assert!(cell.marked && cell.approved);
    assert!(entity.pending_approvals.is_empty());
}

#[tokio::test]
async fn starting_with_too_few_words_fails_and_changes_nothing() {
    let (state, store) = test_state().await;

    let words: Vec<String> = (0..4).map(|i| format!("word-{i}")).collect();
    room_service::create_room(&state, "admin", create_request("FEWW", 3, words))
        .await
        .unwrap();

    let err = room_service::start_game(&state, "FEWW").await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
    assert!(err.to_string().contains("need 9"));

    let entity = store.find_room("FEWW").await.unwrap().unwrap();
    assert_eq!(entity.status, RoomStatus::Setup);
    assert!(entity.player_grids.is_empty());
}

#[tokio::test]
async fn duplicate_room_codes_are_rejected() {
    let (state, _) = test_state().await;

    room_service::create_room(&state, "admin", create_request("TWIN", 3, nine_words()))
        .await
        .unwrap();
    let err = room_service::create_room(&state, "admin", create_request("twin", 3, nine_words()))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));
}

#[tokio::test]
async fn marking_a_marked_cell_is_rejected_without_mutation() {
    let (state, store) = test_state().await;

    room_service::create_room(&state, "admin", create_request("MARKS", 3, nine_words()))
        .await
        .unwrap();
    room_service::start_game(&state, "MARKS").await.unwrap();
    room_service::join_room(&state, "MARKS", join_request("Alice"))
        .await
        .unwrap();

    let request = || MarkCellRequest {
        nickname: "Alice".into(),
        row: 1,
        col: 1,
    };
    play_service::mark_cell(&state, "MARKS", request()).await.unwrap();

    let before = store.find_room("MARKS").await.unwrap().unwrap();
    let err = play_service::mark_cell(&state, "MARKS", request())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict(_)));

    // The failed attempt must not have written anything.
    let after = store.find_room("MARKS").await.unwrap().unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn call_out_hits_every_grid_and_retraction_revokes_wins() {
    let (state, store) = test_state().await;

    room_service::create_room(&state, "admin", create_request("CALLS", 3, nine_words()))
        .await
        .unwrap();
    room_service::join_room(&state, "CALLS", join_request("Alice"))
        .await
        .unwrap();
    room_service::join_room(&state, "CALLS", join_request("Bob"))
        .await
        .unwrap();
    room_service::start_game(&state, "CALLS").await.unwrap();

    let entity = store.find_room("CALLS").await.unwrap().unwrap();
    let called_word = entity.player_grids["Alice"]["0_0"].word.clone();

    let result = play_service::call_out_word(
        &state,
        "CALLS",
        CallOutRequest {
            word: called_word.clone(),
        },
    )
    .await
    .unwrap();
    assert!(result.called);
    // Every grid uses every pool word once, so both players matched.
    assert_eq!(result.cells_changed, 2);

    let entity = store.find_room("CALLS").await.unwrap().unwrap();
    for player in ["Alice", "Bob"] {
        let matched = entity.player_grids[player]
            .values()
            .find(|cell| cell.word == called_word)
            .unwrap();
        assert!(matched.marked && matched.approved);
    }

    // Toggle back: both cells revert in one operation.
    let result = play_service::call_out_word(
        &state,
        "CALLS",
        CallOutRequest {
            word: called_word.clone(),
        },
    )
    .await
    .unwrap();
    assert!(!result.called);
    let entity = store.find_room("CALLS").await.unwrap().unwrap();
    for player in ["Alice", "Bob"] {
        assert!(
            entity.player_grids[player]
                .values()
                .all(|cell| !cell.marked && !cell.approved)
        );
    }

    // Complete Alice's top row via call-outs, then retract one of them:
    // the winner set must reflect both the win and its revocation.
    let entity = store.find_room("CALLS").await.unwrap().unwrap();
    let row_words: Vec<String> = (0..3)
        .map(|col| entity.player_grids["Alice"][&format!("0_{col}")].word.clone())
        .collect();

    for word in &row_words {
        play_service::call_out_word(&state, "CALLS", CallOutRequest { word: word.clone() })
            .await
            .unwrap();
    }
    let entity = store.find_room("CALLS").await.unwrap().unwrap();
    assert!(entity.bingo_winners.contains(&"Alice".to_string()));

    let result = play_service::call_out_word(
        &state,
        "CALLS",
        CallOutRequest {
            word: row_words[1].clone(),
        },
    )
    .await
    .unwrap();
    assert!(!result.bingo_winners.contains(&"Alice".to_string()));
}

#[tokio::test]
async fn word_pool_management_round_trip() {
    let (state, _) = test_state().await;

    room_service::create_room(&state, "admin", create_request("WORDS", 3, Vec::new()))
        .await
        .unwrap();

    let pool = room_service::add_word(
        &state,
        "WORDS",
        AddWordRequest {
            word: "  poggers  ".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(pool.words, vec!["poggers".to_string()]);
    assert_eq!(pool.changed, 1);

    // Duplicates are skipped, not appended.
    let pool = room_service::add_word(
        &state,
        "WORDS",
        AddWordRequest {
            word: "poggers".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(pool.changed, 0);
    assert_eq!(pool.words.len(), 1);

    let pool = room_service::add_words(
        &state,
        "WORDS",
        AddWordsRequest {
            words: vec!["one".into(), "two".into(), "poggers".into()],
        },
    )
    .await
    .unwrap();
    assert_eq!(pool.changed, 2);
    assert_eq!(pool.words.len(), 3);

    let pool = room_service::remove_word(&state, "WORDS", 0).await.unwrap();
    assert_eq!(pool.words, vec!["one".to_string(), "two".to_string()]);

    let err = room_service::remove_word(&state, "WORDS", 9).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidInput(_)));
}

#[tokio::test]
async fn reset_preserves_words_and_roster() {
    let (state, store) = test_state().await;

    room_service::create_room(&state, "admin", create_request("RESET", 3, nine_words()))
        .await
        .unwrap();
    room_service::join_room(&state, "RESET", join_request("Alice"))
        .await
        .unwrap();
    room_service::start_game(&state, "RESET").await.unwrap();
    play_service::mark_cell(
        &state,
        "RESET",
        MarkCellRequest {
            nickname: "Alice".into(),
            row: 0,
            col: 0,
        },
    )
    .await
    .unwrap();

    let snapshot = room_service::reset_game(&state, "RESET").await.unwrap();
    assert_eq!(snapshot.status, RoomStatus::Setup);

    let entity = store.find_room("RESET").await.unwrap().unwrap();
    assert_eq!(entity.words.len(), 9);
    assert_eq!(entity.players.len(), 1);
    assert!(entity.player_grids.is_empty());
    assert!(entity.pending_approvals.is_empty());
    assert!(entity.bingo_winners.is_empty());
    assert!(entity.called_out_words.is_empty());
}

#[tokio::test]
async fn only_the_creator_may_delete_a_room() {
    let (state, store) = test_state().await;

    room_service::create_room(&state, "admin", create_request("MINE", 3, nine_words()))
        .await
        .unwrap();

    let err = room_service::delete_room(&state, "intruder", "MINE")
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Forbidden(_)));
    assert!(store.find_room("MINE").await.unwrap().is_some());

    room_service::delete_room(&state, "admin", "MINE").await.unwrap();
    assert!(store.find_room("MINE").await.unwrap().is_none());

    let err = room_service::get_room(&state, "MINE").await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}

#[tokio::test]
async fn unknown_rooms_report_not_found() {
    let (state, _) = test_state().await;

    let err = room_service::join_room(&state, "GHOST", join_request("Alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(_)));
}
