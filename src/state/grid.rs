//! Grid generation and win detection for bingo grids.
//!
//! A grid is a flat map keyed by `"{row}_{col}"` in row-major insertion
//! order, mirroring the persisted document shape so no reshaping is needed
//! between storage and gameplay.

use indexmap::IndexMap;
use rand::seq::SliceRandom;

use crate::error::RoomError;

/// A player grid keyed by [`cell_key`] in row-major order.
pub type Grid = IndexMap<String, Cell>;

/// One cell of a bingo grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Word drawn from the room's pool.
    pub word: String,
    /// Player claims the word was called.
    pub marked: bool,
    /// Admin (or a call-out) confirmed the claim.
    pub approved: bool,
}

impl Cell {
    /// Whether the cell counts toward a bingo line.
    pub fn counts(&self) -> bool {
        self.marked && self.approved
    }
}

/// Map key for the cell at the given coordinates.
pub fn cell_key(row: u8, col: u8) -> String {
    format!("{row}_{col}")
}

/// Build a fresh grid by sampling `grid_size²` distinct words from the pool
/// without replacement (uniform shuffle, take prefix) and placing them
/// row-major.
///
/// Every cell holds a real pool word; there is no reserved free cell. All
/// cells start unmarked and unapproved.
pub fn generate(words: &[String], grid_size: u8) -> Result<Grid, RoomError> {
    let needed = (grid_size as usize).pow(2);
    if words.len() < needed {
        return Err(RoomError::InsufficientWords {
            have: words.len(),
            need: needed,
        });
    }

    let mut pool = words.to_vec();
    pool.shuffle(&mut rand::rng());

    let mut grid = Grid::with_capacity(needed);
    for row in 0..grid_size {
        for col in 0..grid_size {
            let index = row as usize * grid_size as usize + col as usize;
            grid.insert(
                cell_key(row, col),
                Cell {
                    word: pool[index].clone(),
                    marked: false,
                    approved: false,
                },
            );
        }
    }

    Ok(grid)
}

/// Whether the grid contains at least one complete line.
///
/// A line is any full row, any full column, or either main diagonal whose
/// cells are all marked and approved. Pure function of the grid contents.
pub fn has_bingo(grid: &Grid, grid_size: u8) -> bool {
    let counts = |row: u8, col: u8| {
        grid.get(&cell_key(row, col))
            .map(Cell::counts)
            .unwrap_or(false)
    };

    for row in 0..grid_size {
        if (0..grid_size).all(|col| counts(row, col)) {
            return true;
        }
    }

    for col in 0..grid_size {
        if (0..grid_size).all(|row| counts(row, col)) {
            return true;
        }
    }

    (0..grid_size).all(|i| counts(i, i))
        || (0..grid_size).all(|i| counts(i, grid_size - 1 - i))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("word-{i}")).collect()
    }

    fn blank_grid(grid_size: u8) -> Grid {
        generate(&pool((grid_size as usize).pow(2)), grid_size).unwrap()
    }

    fn set(grid: &mut Grid, row: u8, col: u8, marked: bool, approved: bool) {
        let cell = grid.get_mut(&cell_key(row, col)).unwrap();
        cell.marked = marked;
        cell.approved = approved;
    }

    #[test]
    fn generate_uses_every_word_exactly_once() {
        for grid_size in [3u8, 4, 5] {
            let words = pool((grid_size as usize).pow(2));
            let grid = generate(&words, grid_size).unwrap();

            assert_eq!(grid.len(), (grid_size as usize).pow(2));

            let mut used: Vec<&str> = grid.values().map(|cell| cell.word.as_str()).collect();
            used.sort_unstable();
            let mut expected: Vec<&str> = words.iter().map(String::as_str).collect();
            expected.sort_unstable();
            assert_eq!(used, expected);
        }
    }

    #[test]
    fn generate_places_cells_row_major() {
        let grid = blank_grid(3);
        let keys: Vec<&String> = grid.keys().collect();
        assert_eq!(keys[0], "0_0");
        assert_eq!(keys[1], "0_1");
        assert_eq!(keys[3], "1_0");
        assert_eq!(keys[8], "2_2");
    }

    #[test]
    fn generate_starts_all_cells_unmarked() {
        let grid = blank_grid(4);
        assert!(grid.values().all(|cell| !cell.marked && !cell.approved));
    }

    #[test]
    fn generate_fails_when_pool_is_too_small() {
        let err = generate(&pool(8), 3).unwrap_err();
        assert_eq!(err, RoomError::InsufficientWords { have: 8, need: 9 });
    }

    #[test]
    fn empty_grid_has_no_bingo() {
        assert!(!has_bingo(&blank_grid(3), 3));
    }

    #[test]
    fn complete_row_is_bingo() {
        let mut grid = blank_grid(3);
        for col in 0..3 {
            set(&mut grid, 1, col, true, true);
        }
        assert!(has_bingo(&grid, 3));
    }

    #[test]
    fn complete_column_is_bingo() {
        let mut grid = blank_grid(4);
        for row in 0..4 {
            set(&mut grid, row, 2, true, true);
        }
        assert!(has_bingo(&grid, 4));
    }

    #[test]
    fn both_diagonals_are_bingo() {
        let mut main = blank_grid(5);
        for i in 0..5 {
            set(&mut main, i, i, true, true);
        }
        assert!(has_bingo(&main, 5));

        let mut anti = blank_grid(5);
        for i in 0..5 {
            set(&mut anti, i, 4 - i, true, true);
        }
        assert!(has_bingo(&anti, 5));
    }

    #[test]
    fn marked_but_unapproved_cell_breaks_the_line() {
        let mut grid = blank_grid(3);
        set(&mut grid, 0, 0, true, true);
        set(&mut grid, 0, 1, true, false);
        set(&mut grid, 0, 2, true, true);
        assert!(!has_bingo(&grid, 3));
    }
}
