//! SQLite persistence for the leaderboard and the saved game slot.

mod error;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use error::DbError;
pub use models::{NewSavedGame, NewScoreRecord, SavedGame, ScoreRecord};
pub use repository::{GameRepository, MIGRATIONS};
