//! DTO definitions for the gameplay endpoints: marking, approvals, call-outs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationErrors};

use crate::dto::validation::validate_nickname;

/// Payload marking one cell of the calling player's grid.
#[derive(Debug, Deserialize, ToSchema)]
pub struct MarkCellRequest {
    /// Player marking the cell.
    pub nickname: String,
    /// Cell row, zero-based.
    pub row: u8,
    /// Cell column, zero-based.
    pub col: u8,
}

impl Validate for MarkCellRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Err(e) = validate_nickname(&self.nickname) {
            errors.add("nickname", e);
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Outcome of an admin decision on a pending approval.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApprovalDecisionResponse {
    /// Player whose mark was decided.
    pub player_name: String,
    /// Word in the decided cell.
    pub word: String,
    /// Whether the decision completed a fresh bingo for the player.
    pub bingo: bool,
    /// Approvals still waiting after this decision.
    pub pending_approvals: usize,
}

/// Payload toggling a call-out for a word.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CallOutRequest {
    /// Word to call out (or retract when already called).
    #[validate(length(min = 1, max = 80))]
    pub word: String,
}

/// Outcome of a call-out toggle.
#[derive(Debug, Serialize, ToSchema)]
pub struct CallOutResponse {
    /// The toggled word.
    pub word: String,
    /// Whether the word is called out after the toggle.
    pub called: bool,
    /// Number of cells whose state changed across all grids.
    pub cells_changed: usize,
    /// The recomputed winner set.
    pub bingo_winners: Vec<String>,
}
