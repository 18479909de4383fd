//! Database repository for leaderboard rows and saved games.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{DbError, NewSavedGame, NewScoreRecord, SavedGame, ScoreRecord, schema};

/// Schema migrations compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for leaderboard and saved game operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Opens the database at the given path and applies pending migrations.
    ///
    /// The file is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn new(db_path: String) -> Result<Self, DbError> {
        info!(path = %db_path, "Opening GameRepository");
        let repository = Self { db_path };
        repository.run_migrations()?;
        Ok(repository)
    }

    /// Path of the backing database file.
    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path)
            .map_err(|e| DbError::new(format!("Failed to connect to '{}': {}", self.db_path, e)))
    }

    #[instrument(skip(self))]
    fn run_migrations(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS)?.len();
        if applied > 0 {
            info!(applied, "Applied pending migrations");
        } else {
            debug!("Schema up to date");
        }
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────
    //  Leaderboard
    // ─────────────────────────────────────────────────────────────

    /// Lists leaderboard rows, highest score first, ties in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn list_scores(&self) -> Result<Vec<ScoreRecord>, DbError> {
        let mut conn = self.connection()?;

        let scores = schema::leaderboard::table
            .order((schema::leaderboard::score.desc(), schema::leaderboard::id.asc()))
            .select(ScoreRecord::as_select())
            .load(&mut conn)?;

        debug!(count = scores.len(), "Leaderboard loaded");
        Ok(scores)
    }

    /// Replaces the whole leaderboard with `records`, in the given order.
    ///
    /// Runs in a single transaction so a failure leaves the old list intact.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, records), fields(count = records.len()))]
    pub fn replace_scores(&self, records: &[NewScoreRecord]) -> Result<Vec<ScoreRecord>, DbError> {
        let mut conn = self.connection()?;

        conn.transaction::<_, DbError, _>(|conn| {
            let removed = diesel::delete(schema::leaderboard::table).execute(conn)?;
            if !records.is_empty() {
                diesel::insert_into(schema::leaderboard::table)
                    .values(records)
                    .execute(conn)?;
            }
            debug!(removed, inserted = records.len(), "Leaderboard rewritten");
            Ok(())
        })?;

        self.list_scores()
    }

    // ─────────────────────────────────────────────────────────────
    //  Saved games
    // ─────────────────────────────────────────────────────────────

    /// Loads the snapshot stored under `slot`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn load_snapshot(&self, slot: &str) -> Result<Option<SavedGame>, DbError> {
        let mut conn = self.connection()?;

        let saved = schema::saved_games::table
            .filter(schema::saved_games::slot.eq(slot))
            .select(SavedGame::as_select())
            .first(&mut conn)
            .optional()?;

        debug!(found = saved.is_some(), "Snapshot lookup");
        Ok(saved)
    }

    /// Writes `snapshot` to `slot`, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, snapshot), fields(bytes = snapshot.len()))]
    pub fn save_snapshot(&self, slot: &str, snapshot: String) -> Result<(), DbError> {
        let mut conn = self.connection()?;

        let row = NewSavedGame::new(slot.to_string(), snapshot, chrono::Utc::now().naive_utc());
        diesel::replace_into(schema::saved_games::table)
            .values(&row)
            .execute(&mut conn)?;

        debug!("Snapshot saved");
        Ok(())
    }

    /// Deletes the snapshot in `slot`. Returns whether one existed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_snapshot(&self, slot: &str) -> Result<bool, DbError> {
        let mut conn = self.connection()?;

        let removed = diesel::delete(
            schema::saved_games::table.filter(schema::saved_games::slot.eq(slot)),
        )
        .execute(&mut conn)?;

        info!(removed, "Snapshot deleted");
        Ok(removed > 0)
    }
}
