#[cfg(feature = "couch-store")]
pub mod couchdb;
pub mod memory;

use futures::future::BoxFuture;
use tokio::sync::watch;
use uuid::Uuid;

use crate::dao::models::{RoomEntity, RoomListItemEntity, WordSetEntity};
use crate::dao::storage::StorageResult;

/// Receiver side of a room-document subscription.
///
/// The store publishes the latest snapshot whenever the document changes and
/// `None` once it has been deleted; the channel closes when the subscription
/// ends on the store side.
pub type RoomUpdates = watch::Receiver<Option<RoomEntity>>;

/// Abstraction over the persistence layer for rooms and word sets.
///
/// `put_room` implements optimistic concurrency: the entity must carry the
/// `version` it was read at, and the store answers with
/// [`StorageError::Conflict`](crate::dao::storage::StorageError::Conflict)
/// when the stored document has moved on in the meantime.
pub trait RoomStore: Send + Sync {
    /// Insert a new room if no document with its id exists yet. Returns
    /// whether the room was created.
    fn create_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<bool>>;
    /// Fetch the latest snapshot of a room.
    fn find_room(&self, id: &str) -> BoxFuture<'static, StorageResult<Option<RoomEntity>>>;
    /// Persist a full room snapshot, advancing its version by one.
    fn put_room(&self, room: RoomEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Delete a room. Returns whether a document was removed.
    fn delete_room(&self, id: &str) -> BoxFuture<'static, StorageResult<bool>>;
    /// List the rooms created by the given user.
    fn list_rooms(
        &self,
        creator_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<RoomListItemEntity>>>;
    /// Subscribe to changes of a room document.
    fn watch_room(&self, id: &str) -> BoxFuture<'static, StorageResult<RoomUpdates>>;
    /// Create or replace a word set.
    fn save_word_set(&self, set: WordSetEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Fetch a word set by id.
    fn find_word_set(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<WordSetEntity>>>;
    /// List the word sets owned by the given user.
    fn list_word_sets(
        &self,
        owner_id: &str,
    ) -> BoxFuture<'static, StorageResult<Vec<WordSetEntity>>>;
    /// Delete a word set. Returns whether a document was removed.
    fn delete_word_set(&self, id: Uuid) -> BoxFuture<'static, StorageResult<bool>>;
    /// Cheap connectivity probe used by the storage supervisor.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
    /// Attempt to re-establish a dropped connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
