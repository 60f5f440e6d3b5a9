//! CouchDB-backed [`RoomStore`](crate::dao::room_store::RoomStore)
//! implementation. CouchDB's MVCC revisions carry the optimistic-concurrency
//! checks: a stale write comes back as `409 Conflict` and is surfaced as a
//! retryable storage conflict.

mod config;
mod error;
mod models;
mod store;

pub use config::CouchConfig;
pub use store::CouchRoomStore;
