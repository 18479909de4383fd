//! The board engine: game state and its transitions.

use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::contracts::{Contract, MoveContract};
use crate::history::{History, HistoryEntry};
use crate::invariants::{EngineInvariants, InvariantSet, InvariantViolation};
use crate::random::{self, RandomSource};
use crate::rules::{can_move, reached_win, resolve_line};
use crate::types::{Direction, Grid, Position, SIZE, Tile, TileIdCounter};

/// What a single move did.
///
/// Collaborators use this to decide whether to persist, redraw and fire
/// notifications. A move that did not change the grid has `moved = false`
/// and every other field at its default.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MoveOutcome {
    /// At least one line changed.
    pub moved: bool,
    /// Score added by this move's merges.
    pub score_gained: u64,
    /// Number of merges across all lines.
    pub merges: usize,
    /// Cells that received a spawned tile.
    pub spawned: Vec<Position>,
    /// This move produced the first tile of 2048 or more.
    pub reached_2048: bool,
    /// No move is possible after this one.
    pub game_over: bool,
}

/// Complete, serializable game state.
///
/// Field names follow the snapshot format (`gameOver`, `tileIdCounter`).
/// Missing `history`, `gameOver`, `won` and `tileIdCounter` fields default
/// when loading older snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    grid: Grid,
    score: u64,
    #[serde(default)]
    history: History,
    #[serde(default)]
    game_over: bool,
    #[serde(default)]
    won: bool,
    #[serde(default)]
    tile_id_counter: TileIdCounter,
}

impl GameState {
    /// Creates a state with an empty grid and nothing else.
    pub fn empty() -> Self {
        Self {
            grid: Grid::new(),
            score: 0,
            history: History::new(),
            game_over: false,
            won: false,
            tile_id_counter: TileIdCounter::default(),
        }
    }

    /// Creates a state from raw values (`0` = empty), ids in row-major order.
    ///
    /// Intended for fixtures and scripted scenarios.
    pub fn from_values(values: [[u32; SIZE]; SIZE]) -> Self {
        let mut state = Self::empty();
        state.grid = Grid::from_values(values, &mut state.tile_id_counter);
        state
    }

    /// Starts a fresh game with 1–3 random tiles.
    #[instrument(skip(rng))]
    pub fn new_game(rng: &mut impl RandomSource) -> Self {
        let mut state = Self::empty();
        state.reset(rng);
        state
    }

    /// Restarts in place. The id counter keeps counting.
    #[instrument(skip(self, rng))]
    pub fn reset(&mut self, rng: &mut impl RandomSource) {
        self.grid = Grid::new();
        self.score = 0;
        self.history.clear();
        self.game_over = false;
        self.won = false;

        let count = random::initial_tile_count(rng);
        for _ in 0..count {
            self.spawn_tile(rng);
        }
        info!(initial_tiles = count, "New game started");
    }

    /// Places a 2 (90%) or 4 (10%) on a uniformly chosen empty cell.
    ///
    /// Returns `None` without touching anything when the grid is full.
    #[instrument(skip(self, rng))]
    pub fn spawn_tile(&mut self, rng: &mut impl RandomSource) -> Option<Position> {
        let empty = self.grid.empty_positions();
        if empty.is_empty() {
            debug!("Grid full, nothing spawned");
            return None;
        }

        let pos = empty[rng.pick_index(empty.len())];
        let value = random::spawn_value(rng);
        let tile = Tile::spawned(value, self.tile_id_counter.next_id());
        self.grid.set(pos, Some(tile));
        debug!(%pos, value, id = tile.id, "Spawned tile");
        Some(pos)
    }

    /// Slides every line toward `direction`, merging equal neighbours.
    ///
    /// Ignored once the game is over. A move that changes nothing leaves
    /// the state untouched, including history. A successful move spawns
    /// one (90%) or two (10%) tiles and re-evaluates win and loss.
    #[instrument(skip(self, rng), fields(score = self.score))]
    pub fn apply_move(&mut self, direction: Direction, rng: &mut impl RandomSource) -> MoveOutcome {
        if let Err(e) = MoveContract::pre(self, &direction) {
            debug!(error = %e, "Move ignored");
            return MoveOutcome::default();
        }

        #[cfg(debug_assertions)]
        let before = self.clone();

        let snapshot = HistoryEntry {
            grid: self.grid,
            score: self.score,
        };
        self.grid.settle_all();

        let mut outcome = MoveOutcome::default();
        for index in 0..SIZE {
            let line = self.grid.line(direction, index);
            let resolved = resolve_line(&line, &mut self.tile_id_counter);
            self.grid.set_line(direction, index, resolved.cells);
            outcome.score_gained += resolved.score;
            outcome.merges += resolved.merges;
            outcome.moved |= resolved.moved;
        }

        if !outcome.moved {
            // Flags were cleared above; put the untouched grid back.
            self.grid = snapshot.grid;
            debug!("Nothing moved");
            return MoveOutcome::default();
        }

        self.history.push(snapshot);
        self.score += outcome.score_gained;

        if !self.won && reached_win(&self.grid) {
            self.won = true;
            outcome.reached_2048 = true;
            info!(score = self.score, "Reached 2048");
        }

        for _ in 0..random::spawn_count(rng) {
            if let Some(pos) = self.spawn_tile(rng) {
                outcome.spawned.push(pos);
            }
        }

        if !self.can_move() {
            self.game_over = true;
            outcome.game_over = true;
            info!(score = self.score, max_tile = self.max_tile(), "Game over");
        }

        #[cfg(debug_assertions)]
        if let Err(e) = MoveContract::post(&before, self, &outcome) {
            warn!(error = %e, "Move postcondition failed");
            debug_assert!(false, "{e}");
        }

        debug!(
            %direction,
            gained = outcome.score_gained,
            merges = outcome.merges,
            spawned = outcome.spawned.len(),
            "Move applied"
        );
        outcome
    }

    /// Restores the grid and score from before the last successful move.
    ///
    /// Returns `false` (and does nothing) when there is no history or the
    /// game is over. `won` and `game_over` are not part of the snapshot and
    /// keep their current values.
    #[instrument(skip(self))]
    pub fn undo(&mut self) -> bool {
        if self.game_over {
            debug!("Undo disabled after game over");
            return false;
        }
        match self.history.pop() {
            Some(entry) => {
                self.grid = entry.grid;
                self.score = entry.score;
                debug!(score = self.score, remaining = self.history.len(), "Undid move");
                true
            }
            None => {
                debug!("Nothing to undo");
                false
            }
        }
    }

    /// Checks whether any direction could still change the grid.
    pub fn can_move(&self) -> bool {
        can_move(&self.grid)
    }

    /// Checks whether `undo` would do anything.
    pub fn can_undo(&self) -> bool {
        !self.history.is_empty() && !self.game_over
    }

    /// Highest tile on the grid.
    pub fn max_tile(&self) -> u32 {
        self.grid.max_value()
    }

    /// Advances the id counter past every id in the grid and history.
    ///
    /// Snapshots written without `tileIdCounter` load with a counter of 0;
    /// this keeps later allocations from colliding with restored tiles.
    #[instrument(skip(self))]
    pub fn reconcile_tile_ids(&mut self) {
        let highest = self
            .grid
            .tiles()
            .chain(self.history.iter().flat_map(|entry| entry.grid.tiles()))
            .map(|(_, tile)| tile.id)
            .max();
        let Some(highest) = highest else {
            return;
        };
        if self.tile_id_counter.peek() <= highest {
            warn!(
                counter = self.tile_id_counter.peek(),
                highest, "Tile id counter behind restored tiles"
            );
            self.tile_id_counter = TileIdCounter::starting_at(highest + 1);
        }
    }

    /// Marks the game over when the grid has no move left.
    ///
    /// A restored snapshot can hold a stuck grid with `gameOver` unset;
    /// without this every move would be ignored and the game never ends.
    #[instrument(skip(self))]
    pub fn reconcile_game_over(&mut self) {
        if !self.game_over && !self.can_move() {
            warn!(score = self.score, "Restored grid has no moves, ending game");
            self.game_over = true;
        }
    }

    /// Runs every engine invariant.
    #[instrument(skip(self))]
    pub fn check_invariants(&self) -> Result<(), Vec<InvariantViolation>> {
        EngineInvariants::check_all(self)
    }

    /// Returns the grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the score.
    pub fn score(&self) -> u64 {
        self.score
    }

    /// Returns the undo history.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Returns whether the game has ended.
    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Returns whether 2048 has been reached in this game.
    pub fn won(&self) -> bool {
        self.won
    }

    /// Returns the tile id allocator.
    pub fn tile_id_counter(&self) -> TileIdCounter {
        self.tile_id_counter
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[cfg(test)]
    pub(crate) fn set_game_over(&mut self, game_over: bool) {
        self.game_over = game_over;
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u64) {
        self.score = score;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::empty()
    }
}

/// Board engine bundling a [`GameState`] with its random source.
///
/// This is the single owner of a game session's state; collaborators
/// translate input into [`Game::apply_move`] calls and read the state back.
#[derive(Debug, Clone)]
pub struct Game<R = StdRng> {
    state: GameState,
    rng: R,
}

impl Game<StdRng> {
    /// Starts a new game seeded from the OS.
    #[instrument]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Starts a new game with a deterministic seed.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Game<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> Game<R> {
    /// Starts a new game drawing from `rng`.
    pub fn with_rng(mut rng: R) -> Self {
        let state = GameState::new_game(&mut rng);
        Self { state, rng }
    }

    /// Resumes a previously saved state.
    pub fn restore(state: GameState, rng: R) -> Self {
        Self { state, rng }
    }

    /// Discards the current game and starts over.
    pub fn new_game(&mut self) {
        self.state.reset(&mut self.rng);
    }

    /// Applies a move. See [`GameState::apply_move`].
    pub fn apply_move(&mut self, direction: Direction) -> MoveOutcome {
        self.state.apply_move(direction, &mut self.rng)
    }

    /// Spawns one random tile. See [`GameState::spawn_tile`].
    pub fn spawn_tile(&mut self) -> Option<Position> {
        self.state.spawn_tile(&mut self.rng)
    }

    /// Undoes the last move. See [`GameState::undo`].
    pub fn undo(&mut self) -> bool {
        self.state.undo()
    }

    /// Checks whether any move is possible.
    pub fn can_move(&self) -> bool {
        self.state.can_move()
    }

    /// Returns the current state.
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Consumes the engine, returning its state.
    pub fn into_state(self) -> GameState {
        self.state
    }
}
