//! Database models.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::schema;

/// Leaderboard row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::leaderboard)]
pub struct ScoreRecord {
    id: i32,
    name: String,
    score: i64,
    achieved_at: NaiveDateTime,
}

/// Insertable leaderboard row.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::leaderboard)]
pub struct NewScoreRecord {
    name: String,
    score: i64,
    achieved_at: NaiveDateTime,
}

/// A serialized game stored under a named slot.
#[derive(Debug, Clone, Queryable, Selectable, Getters)]
#[diesel(table_name = schema::saved_games)]
pub struct SavedGame {
    slot: String,
    snapshot: String,
    updated_at: NaiveDateTime,
}

/// Insertable (or replacing) saved game row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::saved_games)]
pub struct NewSavedGame {
    slot: String,
    snapshot: String,
    updated_at: NaiveDateTime,
}
