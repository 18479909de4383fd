//! Terminal flag invariant.

use super::Invariant;
use crate::GameState;

/// Invariant: `game_over` is only set when no move is possible.
pub struct GameOverConsistentInvariant;

impl Invariant<GameState> for GameOverConsistentInvariant {
    fn holds(state: &GameState) -> bool {
        !state.game_over() || !state.can_move()
    }

    fn description() -> &'static str {
        "Game over implies no move is possible"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stuck_board_may_be_over() {
        let mut state = GameState::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        state.set_game_over(true);
        assert!(GameOverConsistentInvariant::holds(&state));
    }

    #[test]
    fn test_open_board_cannot_be_over() {
        let mut state = GameState::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        state.set_game_over(true);
        assert!(!GameOverConsistentInvariant::holds(&state));
    }
}
