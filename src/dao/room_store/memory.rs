//! In-process store backend.
//!
//! Keeps every document in a [`DashMap`] and publishes snapshots through a
//! per-document watch channel, giving the same reactive surface as a remote
//! document database. Used by the test suites and by deployments that run
//! without external storage.

use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;
use tokio::sync::watch;
use uuid::Uuid;

use crate::dao::{
    models::{RoomEntity, RoomListItemEntity, WordSetEntity},
    room_store::{RoomStore, RoomUpdates},
    storage::{StorageError, StorageResult},
};

struct RoomDoc {
    entity: RoomEntity,
    publisher: watch::Sender<Option<RoomEntity>>,
}

/// Fully in-memory [`RoomStore`] implementation.
#[derive(Clone, Default)]
pub struct MemoryRoomStore {
    rooms: Arc<DashMap<String, RoomDoc>>,
    word_sets: Arc<DashMap<Uuid, WordSetEntity>>,
}

impl MemoryRoomStore {
    /// Build an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoomStore for MemoryRoomStore {
    fn create_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<bool>> {
        let rooms = self.rooms.clone();
        Box::pin(async move {
            match rooms.entry(room.id.clone()) {
                Entry::Occupied(_) => Ok(false),
                Entry::Vacant(slot) => {
                    let (publisher, _) = watch::channel(Some(room.clone()));
                    slot.insert(RoomDoc {
                        entity: room,
                        publisher,
                    });
                    Ok(true)
                }
            }
        })
    }

    fn find_room(&self, id: &str) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>> {
        let rooms = self.rooms.clone();
        let id = id.to_string();
        Box::pin(async move { Ok(rooms.get(&id).map(|doc| doc.entity.clone())) })
    }

    fn put_room(&self, mut room: RoomEntity) -> BoxFuture<'static, StorageResult<()>> {
        let rooms = self.rooms.clone();
        Box::pin(async move {
            let Some(mut doc) = rooms.get_mut(&room.id) else {
                // The document vanished between read and write: that is a
                // concurrent deletion, reported the same way as any race.
                return Err(StorageError::conflict(room.id));
            };

            if doc.entity.version != room.version {
                return Err(StorageError::conflict(room.id));
            }

            room.version += 1;
            doc.entity = room.clone();
            let _ = doc.publisher.send(Some(room));
            Ok(())
        })
    }

    fn delete_room(&self, id: &str) -> BoxFuture<'static, StorageResult<bool>> {
        let rooms = self.rooms.clone();
        let id = id.to_string();
        Box::pin(async move {
            match rooms.remove(&id) {
                Some((_, doc)) => {
                    // Tell subscribers the document is gone before the
                    // publisher drops and the channel closes.
                    let _ = doc.publisher.send(None);
                    Ok(true)
                }
                None => Ok(false),
            }
        })
    }

    fn list_rooms(
        &self,
        creator_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<RoomListItemEntity>>> {
        let rooms = self.rooms.clone();
        let creator_id = creator_id.to_string();
        Box::pin(async move {
            let mut items: Vec<RoomListItemEntity> = rooms
                .iter()
                .filter(|doc| doc.entity.creator_id == creator_id)
                .map(|doc| (&doc.entity).into())
                .collect();
            items.sort_by(|a, b| a.created_at.cmp(&b.created_at));
            Ok(items)
        })
    }

    fn watch_room(&self, id: &str) -> BoxFuture<'static, StorageResult<RoomUpdates>> {
        let rooms = self.rooms.clone();
        let id = id.to_string();
        Box::pin(async move {
            match rooms.get(&id) {
                Some(doc) => Ok(doc.publisher.subscribe()),
                None => {
                    // Unknown document: hand out a closed channel primed with
                    // `None` so subscribers observe a deleted room.
                    let (publisher, receiver) = watch::channel(None);
                    drop(publisher);
                    Ok(receiver)
                }
            }
        })
    }

    fn save_word_set(&self, set: WordSetEntity) -> BoxFuture<'static, StorageResult<()>> {
        let word_sets = self.word_sets.clone();
        Box::pin(async move {
            word_sets.insert(set.id, set);
            Ok(())
        })
    }

    fn find_word_set(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<WordSetEntity>>> {
        let word_sets = self.word_sets.clone();
        Box::pin(async move { Ok(word_sets.get(&id).map(|set| set.value().clone())) })
    }

    fn list_word_sets(
        &self,
        owner_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<WordSetEntity>>> {
        let word_sets = self.word_sets.clone();
        let owner_id = owner_id.to_string();
        Box::pin(async move {
            let mut sets: Vec<WordSetEntity> = word_sets
                .iter()
                .filter(|set| set.owner_id == owner_id)
                .map(|set| set.value().clone())
                .collect();
            sets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(sets)
        })
    }

    fn delete_word_set(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>> {
        let word_sets = self.word_sets.clone();
        Box::pin(async move { Ok(word_sets.remove(&id).is_some()) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
