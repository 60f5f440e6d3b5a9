//! Read-modify-write discipline for room documents.
//!
//! Every mutation re-fetches the latest snapshot immediately before
//! computing the next state, computes the full next state from that fresh
//! snapshot, and writes it back presenting the version it read. A write
//! conflict triggers a bounded retry with a doubling delay; exhausted
//! retries surface as a retryable conflict error. A failed precondition
//! inside the mutation leaves the stored document untouched.

use std::sync::Arc;

use tokio::time::sleep;
use tracing::warn;

use crate::{
    config::RetryPolicy,
    dao::{models::RoomEntity, room_store::RoomStore, storage::StorageError},
    error::{RoomError, ServiceError},
    state::room::Room,
};

/// Apply `mutate` to the latest snapshot of `room_id` and persist the result.
///
/// Returns the closure's value together with the entity that was written
/// (as presented to the store, i.e. carrying the version it was read at).
pub async fn update_room<T, F>(
    store: &Arc<dyn RoomStore>,
    policy: &RetryPolicy,
    room_id: &str,
    mut mutate: F,
) -> Result<(T, RoomEntity), ServiceError>
where
    F: FnMut(&mut Room) -> Result<T, RoomError>,
{
    let mut attempt = 0u32;
    let mut delay = policy.initial_delay;

    loop {
        let entity = store
            .find_room(room_id)
            .await?
            .ok_or_else(|| ServiceError::from(RoomError::RoomNotFound(room_id.to_string())))?;

        let mut room = Room::from(entity);
        let value = mutate(&mut room).map_err(ServiceError::from)?;
        let next: RoomEntity = room.into();

        match store.put_room(next.clone()).await {
            Ok(()) => return Ok((value, next)),
            Err(StorageError::Conflict { .. }) if attempt < policy.attempts => {
                attempt += 1;
                warn!(
                    room = %room_id,
                    attempt,
                    "write conflict; re-fetching and retrying"
                );
                sleep(delay).await;
                delay = (delay * 2).min(policy.max_delay);
            }
            Err(err) => return Err(err.into()),
        }
    }
}
