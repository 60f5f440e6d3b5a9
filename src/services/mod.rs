//! Service layer coordinating storage, domain transitions and feeds.

pub mod auth_service;
pub mod documentation;
pub mod health_service;
pub mod play_service;
pub mod reconcile;
pub mod room_service;
pub mod sse_events;
pub mod sse_service;
pub mod storage_supervisor;
pub mod word_set_service;
