//! Top-10 leaderboard: ranking rules and the persisted service.

use chrono::{NaiveDateTime, Utc};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::db::{DbError, GameRepository, NewScoreRecord, ScoreRecord};

/// Maximum number of entries kept.
pub const LEADERBOARD_CAPACITY: usize = 10;

/// A submitted score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, new)]
pub struct LeaderboardEntry {
    name: String,
    score: u64,
    date: NaiveDateTime,
}

impl LeaderboardEntry {
    /// Date in `dd.mm.yyyy` form.
    pub fn date_label(&self) -> String {
        self.date.format("%d.%m.%Y").to_string()
    }
}

impl From<ScoreRecord> for LeaderboardEntry {
    fn from(record: ScoreRecord) -> Self {
        Self {
            score: u64::try_from(*record.score()).unwrap_or_default(),
            date: *record.achieved_at(),
            name: record.name().clone(),
        }
    }
}

impl From<&LeaderboardEntry> for NewScoreRecord {
    fn from(entry: &LeaderboardEntry) -> Self {
        NewScoreRecord::new(
            entry.name.clone(),
            i64::try_from(entry.score).unwrap_or(i64::MAX),
            entry.date,
        )
    }
}

/// Error submitting a score.
#[derive(Debug, Clone, derive_more::Display)]
pub enum LeaderboardError {
    /// Name was empty after trimming.
    #[display("Please enter your name")]
    BlankName,

    /// The leaderboard could not be read or written.
    #[display("Could not save score: {}", _0)]
    Storage(DbError),
}

impl std::error::Error for LeaderboardError {}

impl From<DbError> for LeaderboardError {
    fn from(err: DbError) -> Self {
        Self::Storage(err)
    }
}

/// Ranked list of at most [`LEADERBOARD_CAPACITY`] entries.
///
/// Sorted by score, highest first. Equal scores keep submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Creates an empty leaderboard.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a leaderboard from stored entries, re-ranking and truncating.
    #[instrument(skip(entries), fields(count = entries.len()))]
    pub fn from_entries(entries: Vec<LeaderboardEntry>) -> Self {
        let mut leaderboard = Self { entries };
        leaderboard.rank();
        leaderboard
    }

    /// Adds a score. Returns its 1-based rank, or `None` if it did not make the cut.
    ///
    /// # Errors
    ///
    /// Returns [`LeaderboardError::BlankName`] when `name` is empty or
    /// whitespace; the list is left unchanged.
    #[instrument(skip(self))]
    pub fn submit(
        &mut self,
        name: &str,
        score: u64,
        date: NaiveDateTime,
    ) -> Result<Option<usize>, LeaderboardError> {
        let name = name.trim();
        if name.is_empty() {
            debug!("Rejected blank name");
            return Err(LeaderboardError::BlankName);
        }

        // Equal scores rank after existing ones.
        let position = self.entries.iter().filter(|e| e.score >= score).count();
        self.entries
            .push(LeaderboardEntry::new(name.to_string(), score, date));
        self.rank();

        let rank = (position < LEADERBOARD_CAPACITY).then_some(position + 1);
        debug!(?rank, "Score submitted");
        Ok(rank)
    }

    /// Entries, best first.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether no score has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score on the board.
    pub fn best(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    fn rank(&mut self) {
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(LEADERBOARD_CAPACITY);
    }
}

/// Leaderboard backed by the database.
#[derive(Debug, Clone)]
pub struct LeaderboardService {
    repository: GameRepository,
}

impl LeaderboardService {
    /// Creates a service backed by the given repository.
    #[instrument(skip(repository))]
    pub fn new(repository: GameRepository) -> Self {
        info!("Creating LeaderboardService");
        Self { repository }
    }

    /// Loads the current ranking.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the table cannot be read.
    #[instrument(skip(self))]
    pub fn load(&self) -> Result<Leaderboard, DbError> {
        let entries = self
            .repository
            .list_scores()?
            .into_iter()
            .map(LeaderboardEntry::from)
            .collect();
        Ok(Leaderboard::from_entries(entries))
    }

    /// Validates and records a finished game's score, dated now.
    ///
    /// Returns the updated ranking and the score's rank if it made the list.
    ///
    /// # Errors
    ///
    /// [`LeaderboardError::BlankName`] for an empty name (nothing is written),
    /// [`LeaderboardError::Storage`] if the database fails.
    #[instrument(skip(self))]
    pub fn submit(
        &self,
        name: &str,
        score: u64,
    ) -> Result<(Leaderboard, Option<usize>), LeaderboardError> {
        let mut leaderboard = self.load()?;
        let rank = leaderboard.submit(name, score, Utc::now().naive_utc())?;

        let records: Vec<NewScoreRecord> = leaderboard.entries().iter().map(Into::into).collect();
        self.repository.replace_scores(&records)?;

        match rank {
            Some(rank) => info!(name = %name.trim(), score, rank, "Score entered leaderboard"),
            None => warn!(score, "Score below leaderboard cut"),
        }
        Ok((leaderboard, rank))
    }
}
