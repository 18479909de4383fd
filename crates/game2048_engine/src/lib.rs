//! 2048 board engine.
//!
//! Pure game logic with no I/O: sliding and merging lines, spawning tiles,
//! win and loss detection, and a bounded undo history.
//!
//! # Architecture
//!
//! - **Types**: [`Grid`], [`Tile`], [`Direction`] and tile id allocation
//! - **Rules**: line resolution and terminal-state checks
//! - **Game**: [`GameState`] transitions and the [`Game`] driver owning a random source
//! - **Invariants / Contracts**: properties every reachable state satisfies
//!
//! # Example
//!
//! ```
//! use game2048_engine::{Direction, Game};
//!
//! let mut game = Game::seeded(42);
//! game.new_game();
//! let outcome = game.apply_move(Direction::Left);
//! assert!(game.state().score() >= outcome.score_gained);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod game;
mod types;

pub mod contracts;
pub mod history;
pub mod invariants;
pub mod random;
pub mod rules;

// Crate-level exports - Board types
pub use types::{
    Direction, Grid, Line, MAX_TILE_VALUE, Position, SIZE, Tile, TileIdCounter, WIN_VALUE,
};

// Crate-level exports - Game state
pub use game::{Game, GameState, MoveOutcome};
pub use history::{HISTORY_CAPACITY, History, HistoryEntry};
pub use random::RandomSource;

// Crate-level exports - Verification
pub use contracts::{Contract, ContractViolation, MoveContract};
pub use invariants::{EngineInvariants, Invariant, InvariantSet, InvariantViolation};
