//! Runtime room model and the transitions the service layer applies to it.
//!
//! Every mutation is a method returning `Result<_, RoomError>` so a failed
//! precondition leaves the model untouched; the reconciler only persists a
//! room after the whole mutation succeeded.

use std::time::SystemTime;

use indexmap::IndexMap;

use crate::{
    dao::models::{ApprovalEntity, CellEntity, PlayerEntity, RoomEntity, RoomStatus},
    error::RoomError,
    state::grid::{self, Cell, Grid, cell_key},
};

/// Roster entry tracked during a game session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    /// Display name, unique within the room.
    pub nickname: String,
    /// When the player first joined.
    pub joined_at: SystemTime,
}

/// A player's self-reported mark awaiting an admin decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Approval {
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

/// Aggregated state for one bingo room.
#[derive(Debug, Clone)]
pub struct Room {
    /// Short uppercase room code; immutable after creation.
    pub id: String,
    /// Whether the room is open for players to join.
    pub open: bool,
    /// Current lifecycle status.
    pub status: RoomStatus,
    /// Grid side length, fixed at creation.
    pub grid_size: u8,
    /// Identity of the owning admin.
    pub creator_id: String,
    /// Creation timestamp.
    pub created_at: SystemTime,
    /// When the game was last started, if ever.
    pub started_at: Option<SystemTime>,
    /// Ordered word pool.
    pub words: Vec<String>,
    /// Players in join order.
    pub players: Vec<Player>,
    /// Per-player grids, keyed by nickname.
    pub player_grids: IndexMap<String, Grid>,
    /// Marks awaiting an admin decision, oldest first.
    pub pending_approvals: Vec<Approval>,
    /// Players whose grid currently satisfies a win condition.
    pub bingo_winners: Vec<String>,
    /// Words the admin has called out.
    pub called_out_words: Vec<String>,
    /// Document revision carried through from the read that produced this model.
    pub version: u64,
}

/// Result of a join attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Whether the nickname was added to the roster (false when rejoining).
    pub newly_joined: bool,
    /// Whether a grid was generated as part of this join.
    pub grid_assigned: bool,
}

/// Result of an admin decision on a pending approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalDecision {
    /// Player whose mark was decided.
    pub player_name: String,
    /// Word in the decided cell.
    pub word: String,
    /// Whether the decision completed a fresh bingo for the player.
    pub bingo: bool,
}

/// Result of toggling a call-out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOut {
    /// The toggled word.
    pub word: String,
    /// Whether the word is called out after the toggle.
    pub called: bool,
    /// Number of cells whose state changed across all grids.
    pub cells_changed: usize,
}

impl Room {
    /// Build a fresh room in setup mode with empty play collections.
    pub fn new(
        code: String,
        grid_size: u8,
        creator_id: String,
        words: Vec<String>,
        now: SystemTime,
    ) -> Self {
        Self {
            id: code,
            open: true,
            status: RoomStatus::Setup,
            grid_size,
            creator_id,
            created_at: now,
            started_at: None,
            words,
            players: Vec::new(),
            player_grids: IndexMap::new(),
            pending_approvals: Vec::new(),
            bingo_winners: Vec::new(),
            called_out_words: Vec::new(),
            version: 0,
        }
    }

    /// Number of words required before the game can start (`grid_size²`).
    pub fn required_words(&self) -> usize {
        (self.grid_size as usize).pow(2)
    }

    /// Whether the nickname is part of the roster.
    pub fn is_member(&self, nickname: &str) -> bool {
        self.players.iter().any(|player| player.nickname == nickname)
    }

    fn ensure_active(&self) -> Result<(), RoomError> {
        if self.status == RoomStatus::Active {
            Ok(())
        } else {
            Err(RoomError::RoomInactive)
        }
    }

    /// Append a word to the pool unless an identical word is already present.
    ///
    /// Returns whether the word was added. Words are trimmed before the
    /// duplicate check; an empty word is never added.
    pub fn add_word(&mut self, word: &str) -> bool {
        let word = word.trim();
        if word.is_empty() || self.words.iter().any(|existing| existing == word) {
            return false;
        }
        self.words.push(word.to_string());
        true
    }

    /// Append several words at once, applying the [`add_word`](Self::add_word)
    /// rules per element. Returns how many were added.
    pub fn add_words(&mut self, words: &[String]) -> usize {
        words.iter().filter(|word| self.add_word(word)).count()
    }

    /// Remove the word at `index` from the pool, returning it.
    pub fn remove_word(&mut self, index: usize) -> Result<String, RoomError> {
        if index >= self.words.len() {
            return Err(RoomError::WordIndexOutOfRange(index));
        }
        Ok(self.words.remove(index))
    }

    /// Transition setup → active: checks the word-count precondition, clears
    /// call-out bookkeeping and assigns a fresh grid to every current player.
    pub fn start_game(&mut self, now: SystemTime) -> Result<(), RoomError> {
        if self.status == RoomStatus::Active {
            return Err(RoomError::AlreadyStarted);
        }

        let needed = self.required_words();
        if self.words.len() < needed {
            return Err(RoomError::InsufficientWords {
                have: self.words.len(),
                need: needed,
            });
        }

        // Generate before mutating anything so a generation failure cannot
        // leave a half-assigned room.
        let mut grids = IndexMap::with_capacity(self.players.len());
        for player in &self.players {
            grids.insert(
                player.nickname.clone(),
                grid::generate(&self.words, self.grid_size)?,
            );
        }

        self.status = RoomStatus::Active;
        self.started_at = Some(now);
        self.player_grids = grids;
        self.pending_approvals.clear();
        self.bingo_winners.clear();
        self.called_out_words.clear();

        Ok(())
    }

    /// Transition back to setup: clears grids, approvals, winners and
    /// called-out words while preserving the word pool and the roster.
    pub fn reset_game(&mut self) {
        self.status = RoomStatus::Setup;
        self.started_at = None;
        self.player_grids.clear();
        self.pending_approvals.clear();
        self.bingo_winners.clear();
        self.called_out_words.clear();
    }

    /// Register a player, idempotently for the roster. When the room is
    /// already active a grid is generated lazily for a grid-less player
    /// (e.g. someone joining after the game started).
    pub fn join(&mut self, nickname: &str, now: SystemTime) -> Result<JoinOutcome, RoomError> {
        if !self.open {
            return Err(RoomError::RoomInactive);
        }

        let newly_joined = if self.is_member(nickname) {
            false
        } else {
            self.players.push(Player {
                nickname: nickname.to_string(),
                joined_at: now,
            });
            true
        };

        let mut grid_assigned = false;
        if self.status == RoomStatus::Active && !self.player_grids.contains_key(nickname) {
            let grid = grid::generate(&self.words, self.grid_size)?;
            self.player_grids.insert(nickname.to_string(), grid);
            grid_assigned = true;
        }

        Ok(JoinOutcome {
            newly_joined,
            grid_assigned,
        })
    }

    /// Mark a cell on behalf of a player and enqueue the admin approval.
    ///
    /// Re-marking an already-marked cell is rejected, not silently ignored.
    pub fn mark_cell(
        &mut self,
        player_name: &str,
        row: u8,
        col: u8,
        now: SystemTime,
    ) -> Result<(), RoomError> {
        self.ensure_active()?;

        if !self.is_member(player_name) {
            return Err(RoomError::NotAMember(player_name.to_string()));
        }

        let grid = self
            .player_grids
            .get_mut(player_name)
            .ok_or_else(|| RoomError::GridNotReady(player_name.to_string()))?;

        let cell = grid
            .get_mut(&cell_key(row, col))
            .ok_or(RoomError::UnknownCell { row, col })?;

        if cell.marked {
            return Err(RoomError::AlreadyMarked { row, col });
        }

        cell.marked = true;
        let word = cell.word.clone();

        self.pending_approvals.push(Approval {
            player_name: player_name.to_string(),
            row,
            col,
            word,
            requested_at: now,
        });

        Ok(())
    }

    /// Approve the pending mark at `index`: the cell becomes approved, the
    /// entry is dequeued, and the player is recorded as a winner when the
    /// approval completes a line.
    pub fn approve_mark(&mut self, index: usize) -> Result<ApprovalDecision, RoomError> {
        let (player_name, row, col, word) = self.approval_at(index)?;

        let grid = self
            .player_grids
            .get_mut(&player_name)
            .ok_or_else(|| RoomError::GridNotReady(player_name.clone()))?;
        let cell = grid
            .get_mut(&cell_key(row, col))
            .ok_or(RoomError::UnknownCell { row, col })?;

        cell.approved = true;
        self.pending_approvals.remove(index);

        let grid = &self.player_grids[&player_name];
        let bingo = grid::has_bingo(grid, self.grid_size)
            && !self.bingo_winners.iter().any(|winner| winner == &player_name);
        if bingo {
            self.bingo_winners.push(player_name.clone());
        }

        Ok(ApprovalDecision {
            player_name,
            word,
            bingo,
        })
    }

    /// Reject the pending mark at `index`, reverting the cell to unmarked.
    ///
    /// No bingo re-check happens here: a pending cell was never approved, so
    /// it cannot have contributed to a counted win.
    pub fn reject_mark(&mut self, index: usize) -> Result<ApprovalDecision, RoomError> {
        let (player_name, row, col, word) = self.approval_at(index)?;

        let grid = self
            .player_grids
            .get_mut(&player_name)
            .ok_or_else(|| RoomError::GridNotReady(player_name.clone()))?;
        let cell = grid
            .get_mut(&cell_key(row, col))
            .ok_or(RoomError::UnknownCell { row, col })?;

        cell.marked = false;
        cell.approved = false;
        self.pending_approvals.remove(index);

        Ok(ApprovalDecision {
            player_name,
            word,
            bingo: false,
        })
    }

    /// Toggle a call-out for `word`.
    ///
    /// On addition every matching cell room-wide is force-marked and
    /// auto-approved, pre-empting any pending approval for it. On removal
    /// the matching cells revert to unmarked. Either way the winner set is
    /// fully recomputed, so a retraction can revoke a win.
    pub fn toggle_call_out(&mut self, word: &str) -> Result<CallOut, RoomError> {
        self.ensure_active()?;

        if !self.words.iter().any(|pooled| pooled == word) {
            return Err(RoomError::WordNotInPool(word.to_string()));
        }

        let called = !self.called_out_words.iter().any(|called| called == word);
        if called {
            self.called_out_words.push(word.to_string());
        } else {
            self.called_out_words.retain(|called| called != word);
        }

        let mut cells_changed = 0;
        for grid in self.player_grids.values_mut() {
            for cell in grid.values_mut() {
                if cell.word == word && (cell.marked != called || cell.approved != called) {
                    cell.marked = called;
                    cell.approved = called;
                    cells_changed += 1;
                }
            }
        }

        if called {
            // A grid never holds duplicate words, so matching on the word
            // drops exactly the approvals for the auto-approved cells.
            self.pending_approvals
                .retain(|approval| approval.word != word);
        }

        self.recompute_winners();

        Ok(CallOut {
            word: word.to_string(),
            called,
            cells_changed,
        })
    }

    /// Clear the called-out list without touching any grid, returning how
    /// many entries were removed.
    pub fn clear_called_out_words(&mut self) -> usize {
        let cleared = self.called_out_words.len();
        self.called_out_words.clear();
        cleared
    }

    /// Rebuild the winner set from scratch so it exactly matches the grids.
    fn recompute_winners(&mut self) {
        self.bingo_winners = self
            .players
            .iter()
            .filter(|player| {
                self.player_grids
                    .get(&player.nickname)
                    .map(|grid| grid::has_bingo(grid, self.grid_size))
                    .unwrap_or(false)
            })
            .map(|player| player.nickname.clone())
            .collect();
    }

    fn approval_at(&self, index: usize) -> Result<(String, u8, u8, String), RoomError> {
        let approval = self
            .pending_approvals
            .get(index)
            .ok_or(RoomError::InvalidApprovalIndex(index))?;
        Ok((
            approval.player_name.clone(),
            approval.row,
            approval.col,
            approval.word.clone(),
        ))
    }
}

impl From<CellEntity> for Cell {
    fn from(value: CellEntity) -> Self {
        Self {
            word: value.word,
            marked: value.marked,
            approved: value.approved,
        }
    }
}

impl From<Cell> for CellEntity {
    fn from(value: Cell) -> Self {
        Self {
            word: value.word,
            marked: value.marked,
            approved: value.approved,
        }
    }
}

impl From<PlayerEntity> for Player {
    fn from(value: PlayerEntity) -> Self {
        Self {
            nickname: value.nickname,
            joined_at: value.joined_at,
        }
    }
}

impl From<Player> for PlayerEntity {
    fn from(value: Player) -> Self {
        Self {
            nickname: value.nickname,
            joined_at: value.joined_at,
        }
    }
}

impl From<ApprovalEntity> for Approval {
    fn from(value: ApprovalEntity) -> Self {
        Self {
            player_name: value.player_name,
            row: value.row,
            col: value.col,
            word: value.word,
            requested_at: value.requested_at,
        }
    }
}

impl From<Approval> for ApprovalEntity {
    fn from(value: Approval) -> Self {
        Self {
            player_name: value.player_name,
            row: value.row,
            col: value.col,
            word: value.word,
            requested_at: value.requested_at,
        }
    }
}

impl From<RoomEntity> for Room {
    fn from(value: RoomEntity) -> Self {
        Self {
            id: value.id,
            open: value.open,
            status: value.status,
            grid_size: value.grid_size,
            creator_id: value.creator_id,
            created_at: value.created_at,
            started_at: value.started_at,
            words: value.words,
            players: value.players.into_iter().map(Into::into).collect(),
            player_grids: value
                .player_grids
                .into_iter()
                .map(|(nickname, grid)| {
                    (
                        nickname,
                        grid.into_iter()
                            .map(|(key, cell)| (key, cell.into()))
                            .collect(),
                    )
                })
                .collect(),
            pending_approvals: value.pending_approvals.into_iter().map(Into::into).collect(),
            bingo_winners: value.bingo_winners,
            called_out_words: value.called_out_words,
            version: value.version,
        }
    }
}

impl From<Room> for RoomEntity {
    fn from(value: Room) -> Self {
        Self {
            id: value.id,
            open: value.open,
            status: value.status,
            grid_size: value.grid_size,
            creator_id: value.creator_id,
            created_at: value.created_at,
            started_at: value.started_at,
            words: value.words,
            players: value.players.into_iter().map(Into::into).collect(),
            player_grids: value
                .player_grids
                .into_iter()
                .map(|(nickname, grid)| {
                    (
                        nickname,
                        grid.into_iter()
                            .map(|(key, cell)| (key, cell.into()))
                            .collect(),
                    )
                })
                .collect(),
            pending_approvals: value.pending_approvals.into_iter().map(Into::into).collect(),
            bingo_winners: value.bingo_winners,
            called_out_words: value.called_out_words,
            version: value.version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> SystemTime {
        SystemTime::UNIX_EPOCH
    }

    fn words(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("word-{i}")).collect()
    }

    fn room_3x3() -> Room {
        Room::new("ABC123".into(), 3, "admin".into(), words(9), now())
    }

    fn active_room_with(players: &[&str]) -> Room {
        let mut room = room_3x3();
        for player in players {
            room.join(player, now()).unwrap();
        }
        room.start_game(now()).unwrap();
        room
    }

    fn word_at(room: &Room, player: &str, row: u8, col: u8) -> String {
        room.player_grids[player][&cell_key(row, col)].word.clone()
    }

    #[test]
    fn new_room_starts_in_setup_with_empty_collections() {
        let room = room_3x3();
        assert_eq!(room.status, RoomStatus::Setup);
        assert!(room.players.is_empty());
        assert!(room.player_grids.is_empty());
        assert!(room.pending_approvals.is_empty());
        assert!(room.bingo_winners.is_empty());
        assert!(room.called_out_words.is_empty());
    }

    #[test]
    fn add_word_skips_duplicates_and_blanks() {
        let mut room = Room::new("ROOM".into(), 3, "admin".into(), Vec::new(), now());
        assert!(room.add_word("  alpha "));
        assert!(!room.add_word("alpha"));
        assert!(!room.add_word("   "));
        assert_eq!(room.words, vec!["alpha".to_string()]);

        let added = room.add_words(&words(3));
        assert_eq!(added, 3);
        assert_eq!(room.add_words(&words(3)), 0);
    }

    #[test]
    fn remove_word_rejects_out_of_range_index() {
        let mut room = room_3x3();
        assert_eq!(room.remove_word(0).unwrap(), "word-0");
        assert_eq!(
            room.remove_word(99).unwrap_err(),
            RoomError::WordIndexOutOfRange(99)
        );
    }

    #[test]
    fn start_game_requires_enough_words() {
        let mut room = Room::new("ROOM".into(), 3, "admin".into(), words(4), now());
        let err = room.start_game(now()).unwrap_err();
        assert_eq!(err, RoomError::InsufficientWords { have: 4, need: 9 });
        assert_eq!(room.status, RoomStatus::Setup);
        assert!(room.player_grids.is_empty());
    }

    #[test]
    fn start_game_assigns_a_grid_to_every_current_player() {
        let room = active_room_with(&["alice", "bob"]);
        assert_eq!(room.status, RoomStatus::Active);
        assert_eq!(room.player_grids.len(), 2);
        assert_eq!(room.player_grids["alice"].len(), 9);
        assert_eq!(room.player_grids["bob"].len(), 9);
        assert!(room.called_out_words.is_empty());
    }

    #[test]
    fn start_game_twice_is_rejected() {
        let mut room = active_room_with(&["alice"]);
        assert_eq!(room.start_game(now()).unwrap_err(), RoomError::AlreadyStarted);
    }

    #[test]
    fn reset_clears_play_state_but_keeps_words_and_roster() {
        let mut room = active_room_with(&["alice"]);
        room.mark_cell("alice", 0, 0, now()).unwrap();
        room.reset_game();

        assert_eq!(room.status, RoomStatus::Setup);
        assert_eq!(room.words.len(), 9);
        assert_eq!(room.players.len(), 1);
        assert!(room.player_grids.is_empty());
        assert!(room.pending_approvals.is_empty());
        assert!(room.bingo_winners.is_empty());
        assert!(room.called_out_words.is_empty());
    }

    #[test]
    fn rejoining_is_a_roster_noop() {
        let mut room = room_3x3();
        assert!(room.join("alice", now()).unwrap().newly_joined);
        assert!(!room.join("alice", now()).unwrap().newly_joined);
        assert_eq!(room.players.len(), 1);
    }

    #[test]
    fn joining_an_active_room_lazily_generates_a_grid() {
        let mut room = active_room_with(&["alice"]);
        let outcome = room.join("late-larry", now()).unwrap();
        assert!(outcome.newly_joined);
        assert!(outcome.grid_assigned);
        assert_eq!(room.player_grids["late-larry"].len(), 9);

        // Rejoining with the grid already assigned touches nothing.
        let outcome = room.join("late-larry", now()).unwrap();
        assert!(!outcome.newly_joined);
        assert!(!outcome.grid_assigned);
    }

    #[test]
    fn mark_cell_enforces_every_precondition() {
        let mut room = room_3x3();
        room.join("alice", now()).unwrap();

        assert_eq!(
            room.mark_cell("alice", 0, 0, now()).unwrap_err(),
            RoomError::RoomInactive
        );

        room.start_game(now()).unwrap();
        assert_eq!(
            room.mark_cell("mallory", 0, 0, now()).unwrap_err(),
            RoomError::NotAMember("mallory".into())
        );
        assert_eq!(
            room.mark_cell("alice", 7, 7, now()).unwrap_err(),
            RoomError::UnknownCell { row: 7, col: 7 }
        );

        room.mark_cell("alice", 0, 0, now()).unwrap();
        assert_eq!(room.pending_approvals.len(), 1);
        assert_eq!(
            room.mark_cell("alice", 0, 0, now()).unwrap_err(),
            RoomError::AlreadyMarked { row: 0, col: 0 }
        );
        assert_eq!(room.pending_approvals.len(), 1);
    }

    #[test]
    fn approve_sets_the_cell_and_dequeues_the_entry() {
        let mut room = active_room_with(&["alice"]);
        room.mark_cell("alice", 1, 2, now()).unwrap();

        let decision = room.approve_mark(0).unwrap();
        assert_eq!(decision.player_name, "alice");
        assert!(!decision.bingo);
        assert!(room.pending_approvals.is_empty());

        let cell = &room.player_grids["alice"][&cell_key(1, 2)];
        assert!(cell.marked && cell.approved);

        assert_eq!(
            room.approve_mark(0).unwrap_err(),
            RoomError::InvalidApprovalIndex(0)
        );
    }

    #[test]
    fn reject_reverts_the_cell_to_unmarked() {
        let mut room = active_room_with(&["alice"]);
        room.mark_cell("alice", 2, 2, now()).unwrap();
        room.reject_mark(0).unwrap();

        let cell = &room.player_grids["alice"][&cell_key(2, 2)];
        assert!(!cell.marked && !cell.approved);
        assert!(room.pending_approvals.is_empty());

        // The cell can be marked again after a rejection.
        room.mark_cell("alice", 2, 2, now()).unwrap();
        assert_eq!(room.pending_approvals.len(), 1);
    }

    #[test]
    fn approving_the_last_cell_of_a_row_wins_exactly_once() {
        let mut room = active_room_with(&["alice"]);
        for col in 0..3 {
            room.mark_cell("alice", 0, col, now()).unwrap();
        }

        assert!(!room.approve_mark(0).unwrap().bingo);
        assert!(!room.approve_mark(0).unwrap().bingo);
        let decision = room.approve_mark(0).unwrap();
        assert!(decision.bingo);
        assert_eq!(room.bingo_winners, vec!["alice".to_string()]);

        // Completing a second line must not duplicate the winner entry.
        for row in 1..3 {
            room.mark_cell("alice", row, 0, now()).unwrap();
            let decision = room.approve_mark(0).unwrap();
            assert!(!decision.bingo);
        }
        assert_eq!(room.bingo_winners, vec!["alice".to_string()]);
    }

    #[test]
    fn call_out_marks_matching_cells_across_all_grids() {
        let mut room = active_room_with(&["alice", "bob"]);
        let word = word_at(&room, "alice", 0, 0);

        let result = room.toggle_call_out(&word).unwrap();
        assert!(result.called);
        // Each grid uses every pool word exactly once, so both players match.
        assert_eq!(result.cells_changed, 2);

        for player in ["alice", "bob"] {
            let matched = room.player_grids[player]
                .values()
                .find(|cell| cell.word == word)
                .unwrap();
            assert!(matched.marked && matched.approved);
        }
    }

    #[test]
    fn call_out_preempts_pending_approvals_for_matching_cells() {
        let mut room = active_room_with(&["alice"]);
        room.mark_cell("alice", 0, 0, now()).unwrap();
        let word = word_at(&room, "alice", 0, 0);

        room.toggle_call_out(&word).unwrap();
        assert!(room.pending_approvals.is_empty());
        let cell = &room.player_grids["alice"][&cell_key(0, 0)];
        assert!(cell.marked && cell.approved);
    }

    #[test]
    fn toggling_a_call_out_twice_restores_the_cells() {
        let mut room = active_room_with(&["alice", "bob"]);
        let word = word_at(&room, "alice", 1, 1);

        room.toggle_call_out(&word).unwrap();
        let result = room.toggle_call_out(&word).unwrap();
        assert!(!result.called);
        assert!(room.called_out_words.is_empty());

        for grid in room.player_grids.values() {
            assert!(grid.values().all(|cell| !cell.marked && !cell.approved));
        }
    }

    #[test]
    fn retracting_a_call_out_revokes_a_win() {
        let mut room = active_room_with(&["alice"]);
        let row_words: Vec<String> = (0..3).map(|col| word_at(&room, "alice", 0, col)).collect();

        for word in &row_words {
            room.toggle_call_out(word).unwrap();
        }
        assert_eq!(room.bingo_winners, vec!["alice".to_string()]);

        room.toggle_call_out(&row_words[1]).unwrap();
        assert!(room.bingo_winners.is_empty());
    }

    #[test]
    fn call_out_requires_an_active_room_and_a_pooled_word() {
        let mut room = room_3x3();
        assert_eq!(
            room.toggle_call_out("word-0").unwrap_err(),
            RoomError::RoomInactive
        );

        room.start_game(now()).unwrap();
        assert_eq!(
            room.toggle_call_out("unheard-of").unwrap_err(),
            RoomError::WordNotInPool("unheard-of".into())
        );
    }

    #[test]
    fn clearing_called_out_words_leaves_grids_alone() {
        let mut room = active_room_with(&["alice"]);
        let word = word_at(&room, "alice", 0, 0);
        room.toggle_call_out(&word).unwrap();

        assert_eq!(room.clear_called_out_words(), 1);
        assert!(room.called_out_words.is_empty());
        let cell = &room.player_grids["alice"][&cell_key(0, 0)];
        assert!(cell.marked && cell.approved);
    }

    #[test]
    fn entity_round_trip_preserves_the_room() {
        let mut room = active_room_with(&["alice"]);
        room.mark_cell("alice", 0, 1, now()).unwrap();

        let entity: RoomEntity = room.clone().into();
        let restored = Room::from(entity);

        assert_eq!(restored.id, room.id);
        assert_eq!(restored.status, room.status);
        assert_eq!(restored.words, room.words);
        assert_eq!(restored.players, room.players);
        assert_eq!(restored.player_grids, room.player_grids);
        assert_eq!(restored.pending_approvals, room.pending_approvals);
        assert_eq!(restored.version, room.version);
    }
}
