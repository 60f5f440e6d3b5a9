//! Stream bingo backend binary entrypoint wiring REST, SSE and storage layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod dao;
mod dto;
mod error;
mod routes;
mod services;
mod state;

use config::AppConfig;
use dao::room_store::memory::MemoryRoomStore;
use state::{AppState, SharedState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let app_state = AppState::new(AppConfig::load());

    install_storage(&app_state).await;

    // Build the HTTP router once the shared state is ready.
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Pick a storage backend from `STORAGE_BACKEND` and install or supervise it.
///
/// `memory` installs the in-process store immediately; anything else starts
/// the CouchDB supervisor, which connects in the background and toggles
/// degraded mode when connectivity changes. Without the `couch-store`
/// feature the memory backend is the only option.
async fn install_storage(state: &SharedState) {
    let backend = env::var("STORAGE_BACKEND").unwrap_or_else(|_| "couch".into());

    #[cfg(feature = "couch-store")]
    if backend != "memory" {
        use crate::dao::room_store::RoomStore;
        use crate::dao::room_store::couchdb::{CouchConfig, CouchRoomStore};

        match CouchConfig::from_env() {
            Ok(couch_config) => {
                tokio::spawn(services::storage_supervisor::run(
                    state.clone(),
                    move || {
                        let couch_config = couch_config.clone();
                        async move {
                            CouchRoomStore::connect(couch_config)
                                .await
                                .map(|store| Arc::new(store) as Arc<dyn RoomStore>)
                                .map_err(Into::into)
                        }
                    },
                ));
                return;
            }
            Err(err) => {
                tracing::warn!(error = %err, "CouchDB not configured; using the in-memory store");
            }
        }
    }

    #[cfg(not(feature = "couch-store"))]
    if backend != "memory" {
        tracing::warn!("built without couch-store; using the in-memory store");
    }

    state
        .install_room_store(Arc::new(MemoryRoomStore::new()))
        .await;
    info!("in-memory store installed");
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
