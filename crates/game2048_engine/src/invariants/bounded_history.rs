//! History bound invariant.

use super::Invariant;
use crate::GameState;
use crate::history::HISTORY_CAPACITY;

/// Invariant: the undo history never exceeds its capacity.
pub struct BoundedHistoryInvariant;

impl Invariant<GameState> for BoundedHistoryInvariant {
    fn holds(state: &GameState) -> bool {
        state.history().len() <= HISTORY_CAPACITY
    }

    fn description() -> &'static str {
        "Undo history holds at most 10 snapshots"
    }
}
