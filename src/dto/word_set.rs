//! DTO definitions for the reusable word-set library.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{dao::models::WordSetEntity, dto::format_system_time};

/// Payload creating or replacing a word set.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SaveWordSetRequest {
    /// Display name of the set.
    #[validate(length(min = 1, max = 60))]
    pub name: String,
    /// Words or phrases in the set.
    #[validate(length(min = 1))]
    pub items: Vec<String>,
}

/// Word set as exposed to its owner.
#[derive(Debug, Serialize, ToSchema)]
pub struct WordSetSummary {
    /// Stable identifier for the set.
    pub id: Uuid,
    /// Display name of the set.
    pub name: String,
    /// Words or phrases in the set.
    pub items: Vec<String>,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last update.
    pub updated_at: String,
}

impl From<WordSetEntity> for WordSetSummary {
    fn from(entity: WordSetEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            items: entity.items,
            created_at: format_system_time(entity.created_at),
            updated_at: format_system_time(entity.updated_at),
        }
    }
}
