//! 2048 for the terminal.
//!
//! The board logic lives in [`game2048_engine`]; this crate surrounds it
//! with everything a playable game needs.
//!
//! # Architecture
//!
//! - **Session**: drives the engine and saves after every change
//! - **Persistence**: JSON snapshots of the game in a SQLite slot
//! - **Leaderboard**: top-10 scores with validation and ranking
//! - **Input**: keys and mouse drags to moves
//! - **TUI**: ratatui rendering, dialogs and the event loop
//!
//! # Example
//!
//! ```no_run
//! use std::time::{Duration, Instant};
//!
//! use game2048::{Command, GameRepository, GameSession, SnapshotStore};
//! use game2048_engine::Direction;
//! use rand::{SeedableRng, rngs::StdRng};
//!
//! # fn example() -> anyhow::Result<()> {
//! let repository = GameRepository::new("game2048.db".to_string())?;
//! let store = SnapshotStore::new(repository);
//! let (mut session, _source) =
//!     GameSession::open(store, StdRng::seed_from_u64(1), Duration::from_millis(300), Instant::now())?;
//! session.apply(Command::Move(Direction::Left), Instant::now())?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod db;
mod input;
mod leaderboard;
mod persistence;
mod session;
mod tui;

// Crate-level exports - CLI and configuration
pub use cli::{Cli, Command as CliCommand};
pub use config::{AppConfig, ConfigError, DEFAULT_CONFIG_FILE};

// Crate-level exports - Database
pub use db::{DbError, GameRepository, MIGRATIONS, NewSavedGame, NewScoreRecord, SavedGame, ScoreRecord};

// Crate-level exports - Input
pub use input::{Action, SwipePoint, SwipeTracker, action_for_key, swipe_direction};

// Crate-level exports - Leaderboard
pub use leaderboard::{
    LEADERBOARD_CAPACITY, Leaderboard, LeaderboardEntry, LeaderboardError, LeaderboardService,
};

// Crate-level exports - Persistence
pub use persistence::{CURRENT_SLOT, LoadSource, SnapshotError, SnapshotStore, decode, encode};

// Crate-level exports - Session
pub use session::{Command, CommandResult, GameSession, Notice};

// Crate-level exports - Terminal UI
pub use tui::{App, Flow, FormState, GameOverDialog, Overlay, run_tui};
