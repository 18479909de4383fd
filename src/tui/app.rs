//! Application state and key handling for the terminal front end.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use derive_getters::Getters;
use tracing::{debug, info, instrument, warn};

use crate::input::{Action, SwipeTracker, action_for_key};
use crate::leaderboard::{Leaderboard, LeaderboardError, LeaderboardService};
use crate::session::{Command, CommandResult, GameSession, Notice};

/// Whether the event loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep running.
    Continue,
    /// Leave the event loop.
    Quit,
}

/// Progress of the name form on the game-over dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    /// Typing a name.
    Editing,
    /// Score stored; `rank` is `None` when it missed the top 10.
    Saved {
        /// 1-based position on the leaderboard.
        rank: Option<usize>,
    },
    /// Player declined to enter a name.
    Skipped,
}

/// The game-over dialog.
#[derive(Debug, Clone, Getters)]
pub struct GameOverDialog {
    final_score: u64,
    name: String,
    error: Option<String>,
    form: FormState,
}

impl GameOverDialog {
    fn new(final_score: u64) -> Self {
        Self {
            final_score,
            name: String::new(),
            error: None,
            form: FormState::Editing,
        }
    }
}

/// What is drawn over the board.
#[derive(Debug, Clone)]
pub enum Overlay {
    /// Nothing; the board has focus.
    None,
    /// Final score and name entry.
    GameOver(GameOverDialog),
    /// Ranking table. `previous` is restored when it closes.
    Leaderboard {
        /// Ranking as of opening.
        board: Leaderboard,
        /// Game-over dialog hidden underneath, if any.
        previous: Option<GameOverDialog>,
    },
}

/// Main application state.
#[derive(Debug, Getters)]
pub struct App {
    session: GameSession,
    #[getter(skip)]
    leaderboard: LeaderboardService,
    overlay: Overlay,
    #[getter(skip)]
    swipe: SwipeTracker,
    status_message: String,
    best_score: u64,
}

impl App {
    /// Creates the application around an opened session.
    #[instrument(skip(session, leaderboard))]
    pub fn new(session: GameSession, leaderboard: LeaderboardService, swipe_threshold: f64) -> Self {
        let best_score = match leaderboard.load() {
            Ok(board) => board.best().unwrap_or(0),
            Err(e) => {
                warn!(error = %e, "Could not read leaderboard");
                0
            }
        };
        Self {
            session,
            leaderboard,
            overlay: Overlay::None,
            swipe: SwipeTracker::new(swipe_threshold),
            status_message: "Use the arrow keys or drag with the mouse.".to_string(),
            best_score,
        }
    }

    /// Handles a key press.
    #[instrument(skip(self, key, now), fields(code = ?key.code))]
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Flow {
        match std::mem::replace(&mut self.overlay, Overlay::None) {
            Overlay::None => self.handle_board_key(key.code, now),
            Overlay::GameOver(dialog) => self.handle_dialog_key(dialog, key.code, now),
            Overlay::Leaderboard { board, previous } => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('l') | KeyCode::Char('L') => {
                    debug!("Closing leaderboard");
                    self.overlay = previous.map_or(Overlay::None, Overlay::GameOver);
                    Flow::Continue
                }
                KeyCode::Char('q') | KeyCode::Char('Q') => Flow::Quit,
                _ => {
                    self.overlay = Overlay::Leaderboard { board, previous };
                    Flow::Continue
                }
            },
        }
    }

    /// Handles a mouse event. Drags on the board become moves.
    #[instrument(skip(self, now))]
    pub fn handle_mouse(&mut self, event: MouseEvent, now: Instant) {
        if !matches!(self.overlay, Overlay::None) {
            self.swipe.cancel();
            return;
        }
        if let Some(direction) = self.swipe.handle(event) {
            debug!(%direction, "Swipe");
            self.run_command(Command::Move(direction), now);
        }
    }

    /// Surfaces notifications whose delay has passed.
    #[instrument(skip(self, now))]
    pub fn tick(&mut self, now: Instant) {
        for notice in self.session.take_due(now) {
            info!(%notice, "Showing notice");
            match notice {
                Notice::Won => {
                    self.status_message = "You reached 2048! Keep going.".to_string();
                }
                Notice::GameOver => {
                    if !matches!(self.overlay, Overlay::GameOver(_)) {
                        self.overlay =
                            Overlay::GameOver(GameOverDialog::new(self.session.state().score()));
                    }
                }
            }
        }
    }

    fn handle_board_key(&mut self, code: KeyCode, now: Instant) -> Flow {
        match action_for_key(code) {
            Some(Action::Game(command)) => {
                self.run_command(command, now);
                Flow::Continue
            }
            Some(Action::ShowLeaderboard) => {
                self.open_leaderboard(None);
                Flow::Continue
            }
            Some(Action::Quit) => {
                info!("User quit");
                Flow::Quit
            }
            None => Flow::Continue,
        }
    }

    fn handle_dialog_key(&mut self, mut dialog: GameOverDialog, code: KeyCode, now: Instant) -> Flow {
        if dialog.form == FormState::Editing {
            match code {
                KeyCode::Char(c) => {
                    dialog.name.push(c);
                    dialog.error = None;
                }
                KeyCode::Backspace => {
                    dialog.name.pop();
                }
                KeyCode::Enter => self.submit_score(&mut dialog),
                KeyCode::Esc => {
                    debug!("Score entry skipped");
                    dialog.form = FormState::Skipped;
                }
                _ => {}
            }
            self.overlay = Overlay::GameOver(dialog);
            return Flow::Continue;
        }

        match code {
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Char('n') | KeyCode::Char('N') => {
                self.run_command(Command::NewGame, now);
            }
            KeyCode::Char('l') | KeyCode::Char('L') => self.open_leaderboard(Some(dialog)),
            KeyCode::Char('q') | KeyCode::Char('Q') => return Flow::Quit,
            _ => self.overlay = Overlay::GameOver(dialog),
        }
        Flow::Continue
    }

    fn submit_score(&mut self, dialog: &mut GameOverDialog) {
        match self.leaderboard.submit(&dialog.name, dialog.final_score) {
            Ok((board, rank)) => {
                self.best_score = board.best().unwrap_or(self.best_score);
                dialog.form = FormState::Saved { rank };
                dialog.error = None;
            }
            Err(LeaderboardError::BlankName) => {
                dialog.error = Some(LeaderboardError::BlankName.to_string());
            }
            Err(e) => {
                warn!(error = %e, "Failed to save score");
                dialog.error = Some(e.to_string());
            }
        }
    }

    fn open_leaderboard(&mut self, previous: Option<GameOverDialog>) {
        match self.leaderboard.load() {
            Ok(board) => {
                self.overlay = Overlay::Leaderboard { board, previous };
            }
            Err(e) => {
                warn!(error = %e, "Failed to load leaderboard");
                self.status_message = format!("Leaderboard unavailable: {}", e.message);
                self.overlay = previous.map_or(Overlay::None, Overlay::GameOver);
            }
        }
    }

    fn run_command(&mut self, command: Command, now: Instant) {
        match self.session.apply(command, now) {
            Ok(result) => {
                self.status_message = match result {
                    CommandResult::Moved(outcome) if outcome.score_gained > 0 => {
                        format!("+{}", outcome.score_gained)
                    }
                    CommandResult::Moved(_) => String::new(),
                    CommandResult::Blocked if self.session.state().game_over() => {
                        "No moves left. Press n for a new game.".to_string()
                    }
                    CommandResult::Blocked => "Nothing moves that way.".to_string(),
                    CommandResult::Undone => "Move undone.".to_string(),
                    CommandResult::NothingToUndo => "Nothing to undo.".to_string(),
                    CommandResult::Started => {
                        self.overlay = Overlay::None;
                        "New game.".to_string()
                    }
                };
            }
            Err(e) => {
                warn!(error = %e, "Failed to save game");
                self.status_message = format!("Could not save game: {}", e.message);
            }
        }
    }
}
