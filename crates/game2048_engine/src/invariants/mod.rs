//! First-class invariants for the 2048 engine.
//!
//! Invariants are logical properties that must hold for every reachable
//! [`GameState`](crate::GameState). They are checked as move
//! postconditions in debug builds and used to reject persisted snapshots
//! that deserialize cleanly but describe an impossible game.

#[cfg(kani)]
mod verification;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description)
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for tuples of [`Invariant`]s.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

macro_rules! impl_invariant_set {
    ($($inv:ident),+) => {
        impl<S, $($inv),+> InvariantSet<S> for ($($inv,)+)
        where
            $($inv: Invariant<S>,)+
        {
            fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
                let mut violations = Vec::new();
                $(
                    if !$inv::holds(state) {
                        violations.push(InvariantViolation::new($inv::description()));
                    }
                )+
                if violations.is_empty() {
                    Ok(())
                } else {
                    Err(violations)
                }
            }
        }
    };
}

impl_invariant_set!(I1, I2);
impl_invariant_set!(I1, I2, I3);
impl_invariant_set!(I1, I2, I3, I4);

pub mod bounded_history;
pub mod game_over_consistent;
pub mod power_of_two;
pub mod unique_ids;

pub use bounded_history::BoundedHistoryInvariant;
pub use game_over_consistent::GameOverConsistentInvariant;
pub use power_of_two::PowerOfTwoTilesInvariant;
pub use unique_ids::UniqueTileIdsInvariant;

/// All engine invariants as a composable set.
pub type EngineInvariants = (
    PowerOfTwoTilesInvariant,
    UniqueTileIdsInvariant,
    BoundedHistoryInvariant,
    GameOverConsistentInvariant,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Direction, GameState, Position, Tile};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn test_invariant_set_holds_for_new_game() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = GameState::new_game(&mut rng);
        assert!(EngineInvariants::check_all(&state).is_ok());
    }

    #[test]
    fn test_invariant_set_holds_after_moves() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut state = GameState::new_game(&mut rng);
        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down].repeat(10) {
            state.apply_move(direction, &mut rng);
        }
        assert!(EngineInvariants::check_all(&state).is_ok());
    }

    #[test]
    fn test_invariant_set_collects_every_violation() {
        let mut state = GameState::from_values([[2, 0, 0, 0], [0; 4], [0; 4], [0; 4]]);
        // Duplicate id and a non power of two in one go.
        let dup = *state.grid().get(Position { row: 0, col: 0 }).expect("tile");
        state.grid_mut().set(Position { row: 0, col: 1 }, Some(Tile::settled(3, dup.id)));

        let violations = EngineInvariants::check_all(&state).unwrap_err();
        assert_eq!(violations.len(), 2);
    }

    #[test]
    fn test_two_invariants_as_set() {
        type TwoInvariants = (PowerOfTwoTilesInvariant, UniqueTileIdsInvariant);
        let state = GameState::from_values([[2, 4, 0, 0], [0; 4], [0; 4], [0; 4]]);
        assert!(TwoInvariants::check_all(&state).is_ok());
    }
}
