//! DTO definitions for the room lifecycle and word-pool endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::{
    dao::models::{RoomListItemEntity, RoomStatus},
    dto::{
        format_system_time,
        validation::{validate_nickname, validate_room_code},
    },
};

/// Payload used to create a brand-new room.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateRoomRequest {
    /// Human-entered room code; upper-cased server-side.
    pub code: String,
    /// Grid side length, one of 3, 4 or 5.
    pub grid_size: u8,
    /// Optional initial word pool.
    #[serde(default)]
    pub words: Vec<String>,
}

impl Validate for CreateRoomRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_room_code(&self.code) {
            errors.add("code", e);
        }

        if !matches!(self.grid_size, 3..=5) {
            let mut err = validator::ValidationError::new("grid_size");
            err.message = Some("Grid size must be 3, 4 or 5".into());
            errors.add("grid_size", err);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Payload used to join a room as a player.
#[derive(Debug, Deserialize, ToSchema)]
pub struct JoinRoomRequest {
    /// Desired nickname, unique within the room.
    pub nickname: String,
}

impl Validate for JoinRoomRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_nickname(&self.nickname) {
            errors.add("nickname", e);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Response confirming a join attempt.
#[derive(Debug, Serialize, ToSchema)]
pub struct JoinRoomResponse {
    /// Normalized room code.
    pub room_id: String,
    /// Nickname under which the player is registered.
    pub nickname: String,
    /// Whether the nickname was added to the roster (false when rejoining).
    pub newly_joined: bool,
    /// Whether the player has a grid after this join.
    pub grid_ready: bool,
}

/// Payload adding a single word or phrase to the pool.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddWordRequest {
    /// Word or phrase to add.
    #[validate(length(min = 1, max = 80))]
    pub word: String,
}

/// Payload adding several words at once.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct AddWordsRequest {
    /// Words or phrases to add, in order.
    #[validate(length(min = 1))]
    pub words: Vec<String>,
}

/// Word pool returned after any pool mutation.
#[derive(Debug, Serialize, ToSchema)]
pub struct WordPoolResponse {
    /// The full pool after the mutation, in display order.
    pub words: Vec<String>,
    /// How many entries the mutation added or removed.
    pub changed: usize,
}

/// Summary projection of a room in creator-scoped listings.
#[derive(Debug, Serialize, ToSchema)]
pub struct RoomListItem {
    /// Room code.
    pub id: String,
    /// Current lifecycle status.
    pub status: RoomStatus,
    /// Grid side length.
    pub grid_size: u8,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// Number of players in the roster.
    pub player_count: usize,
}

impl From<RoomListItemEntity> for RoomListItem {
    fn from(entity: RoomListItemEntity) -> Self {
        Self {
            id: entity.id,
            status: entity.status,
            grid_size: entity.grid_size,
            created_at: format_system_time(entity.created_at),
            player_count: entity.player_count,
        }
    }
}
