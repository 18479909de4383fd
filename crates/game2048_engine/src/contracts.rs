//! Contract-based validation for moves.
//!
//! Contracts define correctness through preconditions and postconditions:
//! {P} move {Q}.

use tracing::{instrument, warn};

use crate::invariants::{EngineInvariants, InvariantSet};
use crate::{Direction, GameState, MoveOutcome};

/// A contract over state transitions of `S` driven by action `A`.
pub trait Contract<S, A> {
    /// Result of the transition that postconditions may inspect.
    type Outcome;

    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), ContractViolation>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S, outcome: &Self::Outcome) -> Result<(), ContractViolation>;
}

/// A broken pre- or postcondition.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ContractViolation {
    /// Moves are ignored once the game has ended.
    #[display("Game is already over")]
    GameOver,

    /// The score went down during a move.
    #[display("Score decreased from {} to {}", before, after)]
    ScoreDecreased {
        /// Score before the move.
        before: u64,
        /// Score after the move.
        after: u64,
    },

    /// Tile count does not match merges and spawns.
    #[display("Expected {} tiles after move, found {}", expected, actual)]
    TileCountMismatch {
        /// Count predicted from the outcome.
        expected: usize,
        /// Count actually on the grid.
        actual: usize,
    },

    /// An engine invariant failed.
    #[display("Invariant violation: {}", _0)]
    InvariantViolation(String),
}

impl std::error::Error for ContractViolation {}

/// Contract for [`GameState::apply_move`].
///
/// Preconditions:
/// - Game is not over
///
/// Postconditions:
/// - Score never decreases
/// - Tile count changes by exactly `spawned - merges` (or not at all for a no-op)
/// - All [`EngineInvariants`] hold
pub struct MoveContract;

impl Contract<GameState, Direction> for MoveContract {
    type Outcome = MoveOutcome;

    #[instrument(skip(state))]
    fn pre(state: &GameState, _action: &Direction) -> Result<(), ContractViolation> {
        if state.game_over() {
            Err(ContractViolation::GameOver)
        } else {
            Ok(())
        }
    }

    #[instrument(skip_all)]
    fn post(
        before: &GameState,
        after: &GameState,
        outcome: &MoveOutcome,
    ) -> Result<(), ContractViolation> {
        if after.score() < before.score() {
            warn!(before = before.score(), after = after.score(), "Score decreased");
            return Err(ContractViolation::ScoreDecreased {
                before: before.score(),
                after: after.score(),
            });
        }

        let expected = if outcome.moved {
            before.grid().occupied_count() - outcome.merges + outcome.spawned.len()
        } else {
            before.grid().occupied_count()
        };
        let actual = after.grid().occupied_count();
        if expected != actual {
            warn!(expected, actual, "Tile count mismatch");
            return Err(ContractViolation::TileCountMismatch { expected, actual });
        }

        EngineInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            ContractViolation::InvariantViolation(format!("Postcondition failed: {}", descriptions))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Position, Tile};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_precondition_rejects_finished_game() {
        let mut state = GameState::from_values([[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]);
        state.set_game_over(true);
        assert_eq!(
            MoveContract::pre(&state, &Direction::Left),
            Err(ContractViolation::GameOver)
        );
    }

    #[test]
    fn test_postcondition_holds_after_move() {
        let mut rng = StdRng::seed_from_u64(3);
        let before = GameState::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut after = before.clone();
        let outcome = after.apply_move(Direction::Left, &mut rng);
        assert!(MoveContract::post(&before, &after, &outcome).is_ok());
    }

    #[test]
    fn test_postcondition_detects_extra_tile() {
        let mut rng = StdRng::seed_from_u64(3);
        let before = GameState::from_values([[2, 2, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut after = before.clone();
        let outcome = after.apply_move(Direction::Left, &mut rng);

        let free = after.grid().empty_positions()[0];
        after.grid_mut().set(free, Some(Tile::settled(2, 999)));
        assert!(matches!(
            MoveContract::post(&before, &after, &outcome),
            Err(ContractViolation::TileCountMismatch { .. })
        ));
    }

    #[test]
    fn test_postcondition_detects_score_drop() {
        let mut before = GameState::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        before.set_score(100);
        let after = GameState::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let outcome = MoveOutcome::default();
        assert!(matches!(
            MoveContract::post(&before, &after, &outcome),
            Err(ContractViolation::ScoreDecreased { before: 100, after: 0 })
        ));
    }

    #[test]
    fn test_postcondition_detects_invariant_violation() {
        let before = GameState::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        let mut after = before.clone();
        after.grid_mut().set(Position { row: 0, col: 0 }, Some(Tile::settled(5, 0)));
        assert!(matches!(
            MoveContract::post(&before, &after, &MoveOutcome::default()),
            Err(ContractViolation::InvariantViolation(_))
        ));
    }
}
