//! Request, response and event payloads exchanged with clients.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod auth;
pub mod common;
pub mod health;
pub mod play;
pub mod room;
pub mod sse;
pub mod validation;
pub mod word_set;

fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
