//! Typed constructors for the events broadcast on room feeds.

use tracing::warn;

use crate::{
    dao::models::RoomEntity,
    dto::{
        common::RoomSnapshot,
        sse::{RoomDeletedEvent, ServerEvent},
    },
    state::SseHub,
};

const EVENT_ROOM_UPDATED: &str = "room.updated";
const EVENT_ROOM_DELETED: &str = "room.deleted";

/// Build the `room.updated` event carrying the full room snapshot.
pub fn room_snapshot_event(entity: &RoomEntity) -> serde_json::Result<ServerEvent> {
    let snapshot: RoomSnapshot = entity.into();
    ServerEvent::json(Some(EVENT_ROOM_UPDATED.to_string()), &snapshot)
}

/// Broadcast the full room snapshot to every feed subscriber.
pub fn broadcast_room_snapshot(hub: &SseHub, entity: &RoomEntity) {
    match room_snapshot_event(entity) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(room = %entity.id, error = %err, "failed to serialize room snapshot"),
    }
}

/// Broadcast the terminal `room.deleted` event.
pub fn broadcast_room_deleted(hub: &SseHub, room_id: &str) {
    let payload = RoomDeletedEvent {
        room_id: room_id.to_string(),
    };
    match ServerEvent::json(Some(EVENT_ROOM_DELETED.to_string()), &payload) {
        Ok(event) => hub.broadcast(event),
        Err(err) => warn!(room = %room_id, error = %err, "failed to serialize deletion event"),
    }
}
