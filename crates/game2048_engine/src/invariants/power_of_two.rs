//! Tile value invariant: every value is a power of two between 2 and
//! [`MAX_TILE_VALUE`].

use super::Invariant;
use crate::{GameState, Grid, MAX_TILE_VALUE};

/// Invariant: every tile on the grid and in history is a power of two in
/// `2..=MAX_TILE_VALUE`.
pub struct PowerOfTwoTilesInvariant;

fn grid_holds(grid: &Grid) -> bool {
    grid.tiles()
        .all(|(_, tile)| {
            (2..=MAX_TILE_VALUE).contains(&tile.value) && tile.value.is_power_of_two()
        })
}

impl Invariant<GameState> for PowerOfTwoTilesInvariant {
    fn holds(state: &GameState) -> bool {
        grid_holds(state.grid()) && state.history().iter().all(|entry| grid_holds(&entry.grid))
    }

    fn description() -> &'static str {
        "Every tile value is a power of two between 2 and 131072"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, Tile};

    #[test]
    fn test_spawned_values_hold() {
        let state = GameState::from_values([[2, 4, 8, 2048], [0; 4], [0; 4], [0; 4]]);
        assert!(PowerOfTwoTilesInvariant::holds(&state));
    }

    #[test]
    fn test_one_is_rejected() {
        let mut state = GameState::empty();
        state.grid_mut().set(Position { row: 1, col: 1 }, Some(Tile::settled(1, 0)));
        assert!(!PowerOfTwoTilesInvariant::holds(&state));
    }

    #[test]
    fn test_odd_value_is_rejected() {
        let mut state = GameState::empty();
        state.grid_mut().set(Position { row: 0, col: 0 }, Some(Tile::settled(6, 0)));
        assert!(!PowerOfTwoTilesInvariant::holds(&state));
    }

    #[test]
    fn test_value_beyond_board_capacity_is_rejected() {
        let mut state = GameState::from_values([[MAX_TILE_VALUE, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(PowerOfTwoTilesInvariant::holds(&state));

        state
            .grid_mut()
            .set(Position { row: 3, col: 3 }, Some(Tile::settled(1 << 31, 9)));
        assert!(!PowerOfTwoTilesInvariant::holds(&state));
    }
}
