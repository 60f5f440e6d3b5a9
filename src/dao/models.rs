use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::SystemTime;
use uuid::Uuid;

/// Lifecycle status of a room document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RoomStatus {
    /// The admin is still configuring the word pool; play is not possible.
    Setup,
    /// Grids are assigned and players can mark cells.
    Active,
}

/// One cell of a player's bingo grid.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellEntity {
    /// Word drawn from the room's pool.
    pub word: String,
    /// Player claims the word was called.
    pub marked: bool,
    /// Admin (or a call-out) confirmed the claim.
    pub approved: bool,
}

/// A full player grid keyed by `"{row}_{col}"` in row-major insertion order.
pub type GridEntity = IndexMap<String, CellEntity>;

/// Roster entry for a player who joined a room.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerEntity {
    /// Display name, unique within the room.
    pub nickname: String,
    /// When the player first joined.
    pub joined_at: SystemTime,
}

/// A player's self-reported mark awaiting an admin decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApprovalEntity {
    /// Nickname of the player who marked the cell.
    pub player_name: String,
    /// Cell row.
    pub row: u8,
    /// Cell column.
    pub col: u8,
    /// Word in the marked cell at the time of the request.
    pub word: String,
    /// When the mark was submitted.
    pub requested_at: SystemTime,
}

/// Aggregate room document persisted by the storage layer.
///
/// The document id is the human-entered room code, upper-cased at creation
/// and immutable afterwards. `version` is the optimistic-concurrency
/// revision: writers must present the version they read, and the store
/// advances it on every successful write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomEntity {
    /// Short uppercase alphanumeric room code.
    pub id: String,
    /// Whether the room is open for players to join. Rooms are created open
    /// and only ever leave this state by being deleted.
    pub open: bool,
    /// Current lifecycle status.
    pub status: RoomStatus,
    /// Grid side length, one of 3, 4 or 5; fixed at creation.
    pub grid_size: u8,
    /// Identity of the owning admin; immutable.
    pub creator_id: String,
    /// Creation timestamp for auditing/debugging.
    pub created_at: SystemTime,
    /// When the game was last started, if ever.
    pub started_at: Option<SystemTime>,
    /// Ordered word pool; insertion order matters for display only.
    pub words: Vec<String>,
    /// Players who joined the room, in join order.
    pub players: Vec<PlayerEntity>,
    /// Per-player grids, keyed by nickname.
    pub player_grids: IndexMap<String, GridEntity>,
    /// Marks awaiting an admin decision, oldest first.
    pub pending_approvals: Vec<ApprovalEntity>,
    /// Players whose grid currently satisfies a win condition.
    pub bingo_winners: Vec<String>,
    /// Words the admin has called out.
    pub called_out_words: Vec<String>,
    /// Document revision used for optimistic writes.
    pub version: u64,
}

/// Summary projection of a room returned by creator-scoped listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoomListItemEntity {
    /// Room code.
    pub id: String,
    /// Current lifecycle status.
    pub status: RoomStatus,
    /// Grid side length.
    pub grid_size: u8,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Number of players currently in the roster.
    pub player_count: usize,
}

impl From<&RoomEntity> for RoomListItemEntity {
    fn from(entity: &RoomEntity) -> Self {
        Self {
            id: entity.id.clone(),
            status: entity.status,
            grid_size: entity.grid_size,
            created_at: entity.created_at,
            player_count: entity.players.len(),
        }
    }
}

/// Reusable word list owned by a single user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WordSetEntity {
    /// Stable identifier for the set.
    pub id: Uuid,
    /// Identity of the owning user.
    pub owner_id: String,
    /// Human readable set name.
    pub name: String,
    /// Words or phrases in the set.
    pub items: Vec<String>,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// Last time the set was updated.
    pub updated_at: SystemTime,
}
