//! Keyboard and mouse-gesture translation.
//!
//! Keys map to [`Action`]s. A mouse drag is treated like a touch swipe:
//! terminal cells are scaled to swipe units so the same distance threshold
//! applies as on a touch screen.

use crossterm::event::{KeyCode, MouseButton, MouseEvent, MouseEventKind};
use game2048_engine::Direction;
use tracing::{debug, instrument};

use crate::session::Command;

/// Swipe units per terminal column.
pub const CELL_WIDTH_UNITS: f64 = 8.0;

/// Swipe units per terminal row.
pub const CELL_HEIGHT_UNITS: f64 = 16.0;

/// What the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// A game command for the session.
    Game(Command),
    /// Open the leaderboard.
    ShowLeaderboard,
    /// Leave the application.
    Quit,
}

/// Maps a key on the main game screen to an action.
///
/// Arrows and `w`/`a`/`s`/`d` move, `u` undoes, `n` starts over,
/// `l` opens the leaderboard, `q`/`Esc` quit.
#[instrument]
pub fn action_for_key(code: KeyCode) -> Option<Action> {
    let action = match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
            Action::Game(Command::Move(Direction::Up))
        }
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => {
            Action::Game(Command::Move(Direction::Down))
        }
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => {
            Action::Game(Command::Move(Direction::Left))
        }
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => {
            Action::Game(Command::Move(Direction::Right))
        }
        KeyCode::Char('u') | KeyCode::Char('U') => Action::Game(Command::Undo),
        KeyCode::Char('n') | KeyCode::Char('N') => Action::Game(Command::NewGame),
        KeyCode::Char('l') | KeyCode::Char('L') => Action::ShowLeaderboard,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

/// A point in swipe units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipePoint {
    /// Horizontal coordinate, growing rightwards.
    pub x: f64,
    /// Vertical coordinate, growing downwards.
    pub y: f64,
}

impl SwipePoint {
    /// Creates a point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Converts a terminal cell to swipe units.
    pub fn from_cell(column: u16, row: u16) -> Self {
        Self {
            x: f64::from(column) * CELL_WIDTH_UNITS,
            y: f64::from(row) * CELL_HEIGHT_UNITS,
        }
    }
}

/// Classifies a gesture from `start` to `end`.
///
/// Returns `None` when neither axis travelled `threshold`. Otherwise the
/// longer axis wins; equal travel counts as vertical.
#[instrument]
pub fn swipe_direction(start: SwipePoint, end: SwipePoint, threshold: f64) -> Option<Direction> {
    let dx = end.x - start.x;
    let dy = end.y - start.y;

    if dx.abs().max(dy.abs()) < threshold {
        debug!(dx, dy, "Swipe too short");
        return None;
    }

    let direction = if dx.abs() > dy.abs() {
        if dx > 0.0 { Direction::Right } else { Direction::Left }
    } else if dy > 0.0 {
        Direction::Down
    } else {
        Direction::Up
    };
    Some(direction)
}

/// Turns mouse down/up pairs into swipes.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f64,
    start: Option<SwipePoint>,
}

impl SwipeTracker {
    /// Creates a tracker with the given distance threshold.
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            start: None,
        }
    }

    /// Feeds a mouse event; returns a direction when a drag completes.
    #[instrument(skip(self))]
    pub fn handle(&mut self, event: MouseEvent) -> Option<Direction> {
        let point = SwipePoint::from_cell(event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.start = Some(point);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let start = self.start.take()?;
                swipe_direction(start, point, self.threshold)
            }
            _ => None,
        }
    }

    /// Forgets a drag in progress.
    pub fn cancel(&mut self) {
        self.start = None;
    }
}
