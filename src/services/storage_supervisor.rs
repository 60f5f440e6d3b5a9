//! Background storage supervision: connect, watch health, reconnect.
//!
//! While no backend is reachable the application stays in degraded mode;
//! rooms and word sets reject mutations but the HTTP surface stays up.

use std::{future::Future, sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::{
    dao::{room_store::RoomStore, storage::StorageError},
    state::SharedState,
};

const INITIAL_DELAY: Duration = Duration::from_millis(1_000);
const MAX_DELAY: Duration = Duration::from_secs(10);
const HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(5);
const MAX_RECONNECT_ATTEMPTS: u32 = 3;

/// Drive the connect/monitor cycle forever.
///
/// `connect` is invoked to (re)establish a store; once one is installed the
/// supervisor polls its health and tries a bounded number of reconnects
/// before dropping back to the connect phase.
pub async fn run<F, Fut>(state: SharedState, mut connect: F)
where
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<Arc<dyn RoomStore>, StorageError>> + Send,
{
    let mut delay = INITIAL_DELAY;

    loop {
        let store = match connect().await {
            Ok(store) => {
                delay = INITIAL_DELAY;
                store
            }
            Err(err) => {
                warn!(error = %err, "storage connection attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
                continue;
            }
        };

        state.install_room_store(store.clone()).await;
        info!("storage connection established; leaving degraded mode");

        monitor(&state, store.as_ref()).await;

        warn!("storage connection lost; reconnecting from scratch");
        sleep(delay).await;
        delay = (delay * 2).min(MAX_DELAY);
    }
}

/// Poll the store's health until it fails beyond repair.
async fn monitor(state: &SharedState, store: &dyn RoomStore) {
    loop {
        match store.health_check().await {
            Ok(()) => {
                if state.is_degraded().await {
                    info!("storage healthy again; leaving degraded mode");
                    state.update_degraded(false).await;
                }
                sleep(HEALTH_POLL_INTERVAL).await;
            }
            Err(err) => {
                warn!(error = %err, "storage health check failed; entering degraded mode");
                state.update_degraded(true).await;

                if reconnect_with_backoff(store).await {
                    state.update_degraded(false).await;
                    info!("storage reconnected; leaving degraded mode");
                    sleep(HEALTH_POLL_INTERVAL).await;
                } else {
                    warn!("exhausted storage reconnect attempts");
                    return;
                }
            }
        }
    }
}

/// Try a bounded number of reconnects with a doubling delay.
async fn reconnect_with_backoff(store: &dyn RoomStore) -> bool {
    let mut delay = INITIAL_DELAY;

    for attempt in 0..MAX_RECONNECT_ATTEMPTS {
        match store.try_reconnect().await {
            Ok(()) => return true,
            Err(err) => {
                warn!(attempt, error = %err, "storage reconnect attempt failed");
                sleep(delay).await;
                delay = (delay * 2).min(MAX_DELAY);
            }
        }
    }

    false
}
