//! A play session: the engine, its save slot and pending notifications.

use std::time::{Duration, Instant};

use game2048_engine::{Direction, Game, GameState, MoveOutcome, RandomSource};
use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

use crate::db::DbError;
use crate::persistence::{LoadSource, SnapshotStore};

/// A state-changing request from the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Slide the tiles.
    Move(Direction),
    /// Step back one move.
    Undo,
    /// Abandon the current game and start another.
    NewGame,
}

/// What a command did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandResult {
    /// The grid changed.
    Moved(MoveOutcome),
    /// Nothing could slide that way, or the game is over.
    Blocked,
    /// The previous move was taken back.
    Undone,
    /// There was nothing to take back.
    NothingToUndo,
    /// A fresh game was started.
    Started,
}

impl CommandResult {
    /// Whether the state changed and was saved.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Moved(_) | Self::Undone | Self::Started)
    }
}

/// A message shown some time after the move that caused it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum Notice {
    /// The first 2048 tile appeared.
    #[strum(to_string = "You reached 2048!")]
    Won,
    /// No moves remain.
    #[strum(to_string = "Game over")]
    GameOver,
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    notice: Notice,
    due: Instant,
}

/// Single owner of the running game.
///
/// Every state-changing command is saved before it returns.
#[derive(Debug)]
pub struct GameSession<R = StdRng> {
    game: Game<R>,
    store: SnapshotStore,
    notification_delay: Duration,
    scheduled: Vec<Scheduled>,
}

impl<R: RandomSource> GameSession<R> {
    /// Restores the saved game or starts a new one.
    ///
    /// A restored game that is already over shows its game-over notice at once.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the save slot cannot be read or written.
    #[instrument(skip(store, rng))]
    pub fn open(
        store: SnapshotStore,
        mut rng: R,
        notification_delay: Duration,
        now: Instant,
    ) -> Result<(Self, LoadSource), DbError> {
        let (state, source) = store.load_or_new(&mut rng)?;
        let mut session = Self {
            game: Game::restore(state, rng),
            store,
            notification_delay,
            scheduled: Vec::new(),
        };
        if session.state().game_over() {
            session.scheduled.push(Scheduled {
                notice: Notice::GameOver,
                due: now,
            });
        }
        info!(%source, score = session.state().score(), "Session opened");
        Ok((session, source))
    }

    /// Applies a command and persists the result if anything changed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if saving fails. The in-memory state has already
    /// changed at that point.
    #[instrument(skip(self))]
    pub fn apply(&mut self, command: Command, now: Instant) -> Result<CommandResult, DbError> {
        let result = match command {
            Command::Move(direction) => {
                let outcome = self.game.apply_move(direction);
                if outcome.moved {
                    if outcome.reached_2048 {
                        self.schedule(Notice::Won, now);
                    }
                    if outcome.game_over {
                        self.schedule(Notice::GameOver, now);
                    }
                    CommandResult::Moved(outcome)
                } else {
                    CommandResult::Blocked
                }
            }
            Command::Undo => {
                if self.game.undo() {
                    CommandResult::Undone
                } else {
                    CommandResult::NothingToUndo
                }
            }
            Command::NewGame => {
                self.game.new_game();
                self.scheduled.clear();
                CommandResult::Started
            }
        };

        if result.changed() {
            self.store.save(self.game.state())?;
        }
        debug!(?result, score = self.state().score(), "Command applied");
        Ok(result)
    }

    /// Removes and returns the notices whose delay has elapsed, oldest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<Notice> {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|s| s.due <= now);
        self.scheduled = pending;
        due.into_iter().map(|s| s.notice).collect()
    }

    /// Checks whether any notice is still waiting.
    pub fn has_pending(&self) -> bool {
        !self.scheduled.is_empty()
    }

    /// Current game state.
    pub fn state(&self) -> &GameState {
        self.game.state()
    }

    fn schedule(&mut self, notice: Notice, now: Instant) {
        debug!(%notice, delay_ms = self.notification_delay.as_millis() as u64, "Notice scheduled");
        self.scheduled.push(Scheduled {
            notice,
            due: now + self.notification_delay,
        });
    }
}
