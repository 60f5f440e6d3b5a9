use indexmap::IndexMap;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    dao::models::{ApprovalEntity, CellEntity, PlayerEntity, RoomEntity, RoomStatus},
    dto::format_system_time,
};

/// Generic action acknowledgement used by mutation endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    /// Human-readable outcome description.
    pub message: String,
}

/// Snapshot of one grid cell as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CellSnapshot {
    /// Word placed in the cell.
    pub word: String,
    /// Player claims the word was called.
    pub marked: bool,
    /// Admin (or a call-out) confirmed the claim.
    pub approved: bool,
}

impl From<&CellEntity> for CellSnapshot {
    fn from(cell: &CellEntity) -> Self {
        Self {
            word: cell.word.clone(),
            marked: cell.marked,
            approved: cell.approved,
        }
    }
}

/// Roster entry as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerSnapshot {
    /// Display name.
    pub nickname: String,
    /// RFC 3339 join timestamp.
    pub joined_at: String,
}

impl From<&PlayerEntity> for PlayerSnapshot {
    fn from(player: &PlayerEntity) -> Self {
        Self {
            nickname: player.nickname.clone(),
            joined_at: format_system_time(player.joined_at),
        }
    }
}

/// Pending approval as exposed to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApprovalSnapshot {
    /// Player who marked the cell.
    pub player_name: String,
    /// Cell row.
    pub row: u8,
    /// Cell column.
    pub col: u8,
    /// Word in the marked cell.
    pub word: String,
    /// RFC 3339 submission timestamp.
    pub requested_at: String,
}

impl From<&ApprovalEntity> for ApprovalSnapshot {
    fn from(approval: &ApprovalEntity) -> Self {
        Self {
            player_name: approval.player_name.clone(),
            row: approval.row,
            col: approval.col,
            word: approval.word.clone(),
            requested_at: format_system_time(approval.requested_at),
        }
    }
}

/// Full projection of a room pushed to every subscribed client.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct RoomSnapshot {
    /// Room code.
    pub id: String,
    /// Current lifecycle status.
    pub status: RoomStatus,
    /// Grid side length.
    pub grid_size: u8,
    /// Identity of the owning admin.
    pub creator_id: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 timestamp of the last game start, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Ordered word pool.
    pub words: Vec<String>,
    /// Players in join order.
    pub players: Vec<PlayerSnapshot>,
    /// Per-player grids keyed by nickname, cells keyed by `"{row}_{col}"`.
    pub player_grids: IndexMap<String, IndexMap<String, CellSnapshot>>,
    /// Marks awaiting an admin decision, oldest first.
    pub pending_approvals: Vec<ApprovalSnapshot>,
    /// Players whose grid currently satisfies a win condition.
    pub bingo_winners: Vec<String>,
    /// Words the admin has called out.
    pub called_out_words: Vec<String>,
}

impl From<&RoomEntity> for RoomSnapshot {
    fn from(entity: &RoomEntity) -> Self {
        Self {
            id: entity.id.clone(),
            status: entity.status,
            grid_size: entity.grid_size,
            creator_id: entity.creator_id.clone(),
            created_at: format_system_time(entity.created_at),
            started_at: entity.started_at.map(format_system_time),
            words: entity.words.clone(),
            players: entity.players.iter().map(Into::into).collect(),
            player_grids: entity
                .player_grids
                .iter()
                .map(|(nickname, grid)| {
                    (
                        nickname.clone(),
                        grid.iter()
                            .map(|(key, cell)| (key.clone(), cell.into()))
                            .collect(),
                    )
                })
                .collect(),
            pending_approvals: entity.pending_approvals.iter().map(Into::into).collect(),
            bingo_winners: entity.bingo_winners.clone(),
            called_out_words: entity.called_out_words.clone(),
        }
    }
}
