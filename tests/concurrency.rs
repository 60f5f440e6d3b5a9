//! Write-conflict handling: the reconciler retries a bounded number of times
//! with a fresh snapshot, then surfaces a retryable conflict.

use std::sync::{
    Arc,
    atomic::{AtomicU32, Ordering},
};
use std::time::Duration;

use futures::future::BoxFuture;
use uuid::Uuid;

use stream_bingo_back::{
    config::{AppConfig, RetryPolicy},
    dao::{
        models::{RoomEntity, RoomListItemEntity, WordSetEntity},
        room_store::{RoomStore, RoomUpdates, memory::MemoryRoomStore},
        storage::{StorageError, StorageResult},
    },
    dto::room::{AddWordRequest, CreateRoomRequest},
    error::ServiceError,
    services::room_service,
    state::{AppState, SharedState},
};

/// Store wrapper that fails the first `failures` writes with a conflict,
/// then delegates to the in-memory backend.
#[derive(Clone)]
struct ConflictingStore {
    inner: MemoryRoomStore,
    failures: Arc<AtomicU32>,
}

impl ConflictingStore {
    fn new(failures: u32) -> Self {
        Self {
            inner: MemoryRoomStore::new(),
            failures: Arc::new(AtomicU32::new(failures)),
        }
    }
}

impl RoomStore for ConflictingStore {
    fn create_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<bool>> {
        self.inner.create_room(room)
    }

    fn find_room(&self, id: &str) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        self.inner.find_room(id)
    }

    fn put_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let failures = self.failures.clone();
        let inner = self.inner.clone();
        Box::pin(async move {
            if failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok()
            {
                return Err(StorageError::conflict(room.id));
            }
            inner.put_room(room).await
        })
    }

    fn delete_room(&self, id: &str) -> BoxFuture<'static, StorageResult<bool>> {
        self.inner.delete_room(id)
    }

    fn list_rooms(
        &self,
        creator_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<RoomListItemEntity>>> {
        self.inner.list_rooms(creator_id)
    }

    fn watch_room(&self, id: &str) -> BoxFuture<'static, StorageResult<RoomUpdates>> {
        self.inner.watch_room(id)
    }

    fn save_word_set(&self, set: WordSetEntity) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.save_word_set(set)
    }

    fn find_word_set(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<WordSetEntity>>> {
        self.inner.find_word_set(id)
    }

    fn list_word_sets(
        &self,
        owner_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<WordSetEntity>>> {
        self.inner.list_word_sets(owner_id)
    }

    fn delete_word_set(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        self.inner.delete_word_set(id)
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.health_check()
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        self.inner.try_reconnect()
    }
}

async fn state_with(failures: u32, attempts: u32) -> (SharedState, ConflictingStore) {
    let config = AppConfig {
        write_retry: RetryPolicy {
            attempts,
            initial_delay: Duration::from_millis(5),
            max_delay: Duration::from_millis(50),
        },
        ..AppConfig::default()
    };
    let state = AppState::new(config);
    let store = ConflictingStore::new(failures);
    state.install_room_store(Arc::new(store.clone())).await;
    (state, store)
}

fn create_request(code: &str) -> CreateRoomRequest {
    CreateRoomRequest {
        code: code.into(),
        grid_size: 3,
        words: Vec::new(),
    }
}

#[tokio::test]
async fn a_single_conflict_is_retried_and_succeeds() {
    let (state, store) = state_with(0, 1).await;
    room_service::create_room(&state, "admin", create_request("RACE"))
        .await
        .unwrap();

    store.failures.store(1, Ordering::SeqCst);

    let pool = room_service::add_word(
        &state,
        "RACE",
        AddWordRequest {
            word: "contested".into(),
        },
    )
    .await
    .unwrap();

    assert_eq!(pool.words, vec!["contested".to_string()]);
    assert_eq!(store.failures.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn exhausted_retries_surface_a_retryable_conflict() {
    let (state, store) = state_with(0, 1).await;
    room_service::create_room(&state, "admin", create_request("RACE"))
        .await
        .unwrap();

    store.failures.store(5, Ordering::SeqCst);

    let err = room_service::add_word(
        &state,
        "RACE",
        AddWordRequest {
            word: "contested".into(),
        },
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ServiceError::Conflict(_)));

    // The operation is safe to retry as a whole once the contention clears.
    store.failures.store(0, Ordering::SeqCst);
    let pool = room_service::add_word(
        &state,
        "RACE",
        AddWordRequest {
            word: "contested".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(pool.words, vec!["contested".to_string()]);
}

#[tokio::test]
async fn a_racing_writer_does_not_lose_updates() {
    let (state, store) = state_with(0, 1).await;
    room_service::create_room(&state, "admin", create_request("RACE"))
        .await
        .unwrap();

    // A competing client writes between our read and our write: the memory
    // store rejects the stale version and the reconciler recomputes from the
    // fresh snapshot, keeping both words.
    let stale = store.find_room("RACE").await.unwrap().unwrap();
    let mut competing = stale.clone();
    competing.words.push("first".into());
    store.put_room(competing).await.unwrap();

    let err = store.put_room(stale).await.unwrap_err();
    assert!(matches!(err, StorageError::Conflict { .. }));

    let pool = room_service::add_word(
        &state,
        "RACE",
        AddWordRequest {
            word: "second".into(),
        },
    )
    .await
    .unwrap();
    assert_eq!(
        pool.words,
        vec!["first".to_string(), "second".to_string()]
    );
}
