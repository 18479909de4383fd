//! Terminal-condition checks: loss (no move left) and win.

use tracing::instrument;

use crate::types::{Grid, Position, SIZE, WIN_VALUE};

/// Checks whether any direction could change the grid.
///
/// True when a cell is empty or two orthogonal neighbours share a value.
/// Each pair is inspected once by only looking right and down.
#[instrument(skip(grid))]
pub fn can_move(grid: &Grid) -> bool {
    if !grid.is_full() {
        return true;
    }

    Position::all().any(|pos| {
        let value = grid.value(pos);
        let right = pos.col + 1 < SIZE && grid.value(Position { row: pos.row, col: pos.col + 1 }) == value;
        let down = pos.row + 1 < SIZE && grid.value(Position { row: pos.row + 1, col: pos.col }) == value;
        right || down
    })
}

/// Checks whether any tile has reached [`WIN_VALUE`].
#[instrument(skip(grid))]
pub fn reached_win(grid: &Grid) -> bool {
    grid.max_value() >= WIN_VALUE
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TileIdCounter;

    fn grid(values: [[u32; SIZE]; SIZE]) -> Grid {
        Grid::from_values(values, &mut TileIdCounter::default())
    }

    #[test]
    fn test_checkerboard_is_stuck() {
        let g = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        assert!(!can_move(&g));
    }

    #[test]
    fn test_single_empty_cell_allows_move() {
        let g = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 0]]);
        assert!(can_move(&g));
    }

    #[test]
    fn test_vertical_pair_allows_move() {
        let g = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [2, 8, 16, 32]]);
        assert!(can_move(&g));
    }

    #[test]
    fn test_horizontal_pair_in_last_row() {
        let g = grid([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [8, 16, 32, 32]]);
        assert!(can_move(&g));
    }

    #[test]
    fn test_reached_win() {
        assert!(!reached_win(&grid([[1024, 0, 0, 0], [0; 4], [0; 4], [0; 4]])));
        assert!(reached_win(&grid([[0; 4], [0; 4], [0; 4], [0, 0, 0, 4096]])));
    }
}
