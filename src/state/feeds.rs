//! Per-room subscription registry.
//!
//! Each room has at most one live store subscription, forwarded into a
//! broadcast hub that SSE connections attach to. Opening a feed for a room
//! that already has one cancels the previous forwarder before starting the
//! replacement, and closing is idempotent, so store listeners never leak.

use dashmap::DashMap;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    dao::room_store::RoomUpdates, dto::sse::ServerEvent, services::sse_events, state::sse::SseHub,
};

struct RoomFeed {
    hub: SseHub,
    forwarder: JoinHandle<()>,
}

/// Registry of live room feeds keyed by room code.
pub struct RoomFeeds {
    feeds: DashMap<String, RoomFeed>,
    capacity: usize,
    // Serializes open/close so a racing pair cannot orphan a forwarder.
    gate: Mutex<()>,
}

impl RoomFeeds {
    /// Build an empty registry whose hubs use the given channel capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            feeds: DashMap::new(),
            capacity,
            gate: Mutex::new(()),
        }
    }

    /// Subscribe to an existing live feed, if the room has one.
    pub fn subscribe(&self, room_id: &str) -> Option<broadcast::Receiver<ServerEvent>> {
        self.feeds
            .get(room_id)
            .filter(|feed| !feed.forwarder.is_finished())
            .map(|feed| feed.hub.subscribe())
    }

    /// Start (or restart) the feed for a room from a fresh store subscription.
    ///
    /// Any previous forwarder for the room is cancelled and awaited first;
    /// the broadcast hub survives the swap so existing SSE clients keep
    /// receiving events without interruption.
    pub async fn open(&self, room_id: &str, updates: RoomUpdates) -> broadcast::Receiver<ServerEvent> {
        let _gate = self.gate.lock().await;

        let hub = match self.feeds.remove(room_id) {
            Some((_, feed)) => {
                feed.forwarder.abort();
                let _ = feed.forwarder.await;
                feed.hub
            }
            None => SseHub::new(self.capacity),
        };

        let forwarder = spawn_forwarder(hub.clone(), room_id.to_string(), updates);
        let receiver = hub.subscribe();
        self.feeds
            .insert(room_id.to_string(), RoomFeed { hub, forwarder });

        receiver
    }

    /// Tear down the feed for a room. Safe to call when none exists and safe
    /// to call repeatedly.
    pub async fn close(&self, room_id: &str) {
        let _gate = self.gate.lock().await;

        if let Some((_, feed)) = self.feeds.remove(room_id) {
            feed.forwarder.abort();
            let _ = feed.forwarder.await;
            debug!(room = %room_id, "room feed closed");
        }
    }
}

fn spawn_forwarder(hub: SseHub, room_id: String, mut updates: RoomUpdates) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if updates.changed().await.is_err() {
                break;
            }

            let snapshot = updates.borrow_and_update().clone();
            match snapshot {
                Some(entity) => sse_events::broadcast_room_snapshot(&hub, &entity),
                None => {
                    sse_events::broadcast_room_deleted(&hub, &room_id);
                    break;
                }
            }
        }

        debug!(room = %room_id, "room feed forwarder stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::RoomEntity;
    use crate::dao::room_store::{RoomStore, memory::MemoryRoomStore};
    use crate::state::room::Room;
    use std::time::{Duration, SystemTime};
    use tokio::time::timeout;

    fn entity(code: &str) -> RoomEntity {
        Room::new(
            code.to_string(),
            3,
            "admin".into(),
            Vec::new(),
            SystemTime::UNIX_EPOCH,
        )
        .into()
    }

    async fn bump(store: &MemoryRoomStore, code: &str) {
        let mut fresh = store.find_room(code).await.unwrap().unwrap();
        fresh.words.push(format!("word-{}", fresh.version));
        store.put_room(fresh).await.unwrap();
    }

    #[tokio::test]
    async fn feed_forwards_store_updates() {
        let store = MemoryRoomStore::new();
        store.create_room(entity("FEED")).await.unwrap();

        let feeds = RoomFeeds::new(8);
        let updates = store.watch_room("FEED").await.unwrap();
        let mut receiver = feeds.open("FEED", updates).await;

        bump(&store, "FEED").await;

        let event = timeout(Duration::from_secs(1), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.event.as_deref(), Some("room.updated"));
    }

    #[tokio::test]
    async fn reopening_replaces_the_forwarder_without_duplicating_events() {
        let store = MemoryRoomStore::new();
        store.create_room(entity("FEED")).await.unwrap();

        let feeds = RoomFeeds::new(8);
        feeds
            .open("FEED", store.watch_room("FEED").await.unwrap())
            .await;
        let mut receiver = feeds
            .open("FEED", store.watch_room("FEED").await.unwrap())
            .await;

        bump(&store, "FEED").await;

        let event = timeout(Duration::from_secs(1), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.event.as_deref(), Some("room.updated"));

        // Only the replacement forwarder is alive, so no second copy arrives.
        assert!(
            timeout(Duration::from_millis(100), receiver.recv())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn deletion_emits_a_terminal_event() {
        let store = MemoryRoomStore::new();
        store.create_room(entity("FEED")).await.unwrap();

        let feeds = RoomFeeds::new(8);
        let mut receiver = feeds
            .open("FEED", store.watch_room("FEED").await.unwrap())
            .await;

        store.delete_room("FEED").await.unwrap();

        let event = timeout(Duration::from_secs(1), receiver.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(event.event.as_deref(), Some("room.deleted"));
    }

    #[tokio::test]
    async fn close_is_idempotent() {
        let feeds = RoomFeeds::new(8);
        feeds.close("NEVER-OPENED").await;

        let store = MemoryRoomStore::new();
        store.create_room(entity("FEED")).await.unwrap();
        feeds
            .open("FEED", store.watch_room("FEED").await.unwrap())
            .await;

        feeds.close("FEED").await;
        feeds.close("FEED").await;
        assert!(feeds.subscribe("FEED").is_none());
    }
}
