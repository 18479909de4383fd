//! Game rules for 2048.
//!
//! Pure functions over grids and lines. Rules are kept apart from the
//! state container so contracts and invariants can reuse them.

pub mod line;
pub mod terminal;

pub use line::{LineOutcome, resolve_line};
pub use terminal::{can_move, reached_win};
