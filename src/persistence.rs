//! Saving and restoring the game in progress.
//!
//! A snapshot is the JSON form of [`GameState`]. Anything that fails to
//! parse, or parses into a state the engine could never reach, is thrown
//! away in favour of a new game.

use game2048_engine::{GameState, RandomSource};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, GameRepository};

/// Slot holding the game in progress.
pub const CURRENT_SLOT: &str = "current";

/// Why a stored snapshot could not be used.
#[derive(Debug, derive_more::Display)]
pub enum SnapshotError {
    /// Not valid JSON for a game state.
    #[display("Snapshot could not be parsed: {}", _0)]
    Parse(serde_json::Error),

    /// Parsed, but describes a state no sequence of moves could produce.
    #[display("Snapshot is inconsistent: {}", _0)]
    Invalid(String),
}

impl std::error::Error for SnapshotError {}

/// Serializes a state to its snapshot form.
pub fn encode(state: &GameState) -> Result<String, serde_json::Error> {
    serde_json::to_string(state)
}

/// Parses and validates a snapshot.
///
/// Older snapshots without a tile id counter get one past the highest id.
/// A stuck grid saved without `gameOver` loads as finished.
#[instrument(skip(json), fields(bytes = json.len()))]
pub fn decode(json: &str) -> Result<GameState, SnapshotError> {
    let mut state: GameState = serde_json::from_str(json).map_err(SnapshotError::Parse)?;
    state.reconcile_tile_ids();
    state.check_invariants().map_err(|violations| {
        SnapshotError::Invalid(
            violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    })?;
    state.reconcile_game_over();
    Ok(state)
}

/// Where a loaded state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum LoadSource {
    /// Restored from the saved snapshot.
    Restored,
    /// Nothing was saved; a new game was started.
    Fresh,
    /// The saved snapshot was unusable; a new game was started.
    Recovered,
}

/// Game snapshot storage on top of [`GameRepository`].
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    repository: GameRepository,
    slot: String,
}

impl SnapshotStore {
    /// Creates a store using [`CURRENT_SLOT`].
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        Self::with_slot(repository, CURRENT_SLOT.to_string())
    }

    /// Creates a store using a named slot.
    #[instrument(skip(repository))]
    pub fn with_slot(repository: GameRepository, slot: String) -> Self {
        debug!(slot = %slot, "Creating SnapshotStore");
        Self { repository, slot }
    }

    /// Loads the saved game, or starts and saves a new one.
    ///
    /// A corrupt snapshot is logged and replaced, never surfaced as an error.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] only if the database itself fails.
    #[instrument(skip(self, rng), fields(slot = %self.slot))]
    pub fn load_or_new(
        &self,
        rng: &mut impl RandomSource,
    ) -> Result<(GameState, LoadSource), DbError> {
        let source = match self.repository.load_snapshot(&self.slot)? {
            Some(saved) => match decode(saved.snapshot()) {
                Ok(state) => {
                    info!(score = state.score(), "Restored saved game");
                    return Ok((state, LoadSource::Restored));
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unusable snapshot");
                    LoadSource::Recovered
                }
            },
            None => LoadSource::Fresh,
        };

        let state = GameState::new_game(rng);
        self.save(&state)?;
        info!(%source, "Started new game");
        Ok((state, source))
    }

    /// Writes `state` to the slot.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if serialization or the write fails.
    #[instrument(skip(self, state), fields(slot = %self.slot, score = state.score()))]
    pub fn save(&self, state: &GameState) -> Result<(), DbError> {
        let json = encode(state)
            .map_err(|e| DbError::new(format!("Failed to encode snapshot: {}", e)))?;
        self.repository.save_snapshot(&self.slot, json)
    }

    /// Discards the saved game. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the delete fails.
    #[instrument(skip(self), fields(slot = %self.slot))]
    pub fn reset(&self) -> Result<bool, DbError> {
        self.repository.delete_snapshot(&self.slot)
    }
}
