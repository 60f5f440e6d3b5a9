//! SSE plumbing: turning a room feed subscription into an HTTP event stream.

use std::{convert::Infallible, time::Duration};

use axum::response::sse::{Event, KeepAlive, Sse};
use futures::Stream;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::info;

use crate::{
    dto::sse::ServerEvent,
    error::{RoomError, ServiceError},
    services::{room_service::normalize_code, sse_events},
    state::SharedState,
};

/// Subscribe to a room's event feed.
///
/// The room's feed is started on first use (one store subscription per
/// room); the returned handshake event replays the current snapshot so a
/// late subscriber does not have to wait for the next change.
pub async fn subscribe_room(
    state: &SharedState,
    room_id: &str,
) -> Result<(ServerEvent, broadcast::Receiver<ServerEvent>), ServiceError> {
    let code = normalize_code(room_id);
    let store = state.require_room_store().await?;

    let entity = store
        .find_room(&code)
        .await?
        .ok_or_else(|| ServiceError::from(RoomError::RoomNotFound(code.clone())))?;

    let receiver = match state.feeds().subscribe(&code) {
        Some(receiver) => receiver,
        None => {
            let updates = store.watch_room(&code).await?;
            info!(room = %code, "opening room feed");
            state.feeds().open(&code, updates).await
        }
    };

    let handshake = sse_events::room_snapshot_event(&entity)
        .map_err(|err| ServiceError::Internal(format!("failed to serialize snapshot: {err}")))?;

    Ok((handshake, receiver))
}

/// Convert a broadcast receiver into an SSE response, forwarding events and
/// cleaning up once the client disconnects.
pub fn to_sse_stream(
    handshake: ServerEvent,
    mut receiver: broadcast::Receiver<ServerEvent>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    // small bounded channel between forwarder and response
    let (tx, rx) = mpsc::channel::<Result<Event, Infallible>>(8);

    // forwarder task: replays the handshake, then reads from the broadcast
    // channel and pushes into the mpsc until either side goes away
    tokio::spawn(async move {
        if tx.send(Ok(to_event(handshake))).await.is_err() {
            return;
        }

        loop {
            tokio::select! {
                _ = tx.closed() => break,
                recv_result = receiver.recv() => {
                    match recv_result {
                        Ok(payload) => {
                            if tx.send(Ok(to_event(payload))).await.is_err() {
                                break;
                            }
                        }
                        Err(RecvError::Closed) => break,
                        Err(RecvError::Lagged(_)) => {
                            // Skip lagged messages but keep the stream alive.
                            continue;
                        }
                    }
                }
            }
        }

        info!("room SSE stream disconnected");
    });

    // response stream reads from mpsc; when client disconnects axum drops this stream
    let stream = ReceiverStream::new(rx);
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

fn to_event(payload: ServerEvent) -> Event {
    let mut event = Event::default().data(payload.data);
    if let Some(name) = payload.event {
        event = event.event(name);
    }
    event
}
