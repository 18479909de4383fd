//! Tile identity invariant: ids on the grid are unique and already allocated.

use std::collections::HashSet;

use super::Invariant;
use crate::GameState;

/// Invariant: no two tiles share an id, and every id is below the counter.
///
/// The second half guarantees the counter never hands out an id that is
/// already on the board.
pub struct UniqueTileIdsInvariant;

impl Invariant<GameState> for UniqueTileIdsInvariant {
    fn holds(state: &GameState) -> bool {
        let next = state.tile_id_counter().peek();
        let mut seen = HashSet::new();
        state
            .grid()
            .tiles()
            .all(|(_, tile)| tile.id < next && seen.insert(tile.id))
    }

    fn description() -> &'static str {
        "Tile ids are unique and below the id counter"
    }
}
