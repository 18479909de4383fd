//! Core domain types for the 2048 board.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Side length of the square grid.
pub const SIZE: usize = 4;

/// Tile value that marks the game as won.
pub const WIN_VALUE: u32 = 2048;

/// Largest tile a 4×4 board can hold.
pub const MAX_TILE_VALUE: u32 = 1 << 17;

/// A single numbered piece on the grid.
///
/// `is_new` and `merged` are transient flags describing what the most
/// recent move did to this tile. They are cleared at the start of every
/// move and live inside the tile so history snapshots stay consistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tile {
    /// Power of two, at least 2.
    pub value: u32,
    /// Unique id, allocated once and never reused.
    pub id: u64,
    /// Tile was spawned by the most recent move.
    #[serde(default)]
    pub is_new: bool,
    /// Tile was produced by a merge during the most recent move.
    #[serde(default)]
    pub merged: bool,
}

impl Tile {
    /// Creates a freshly spawned tile.
    pub fn spawned(value: u32, id: u64) -> Self {
        Self {
            value,
            id,
            is_new: true,
            merged: false,
        }
    }

    /// Creates the tile produced by merging two tiles of `value / 2`.
    pub fn merged(value: u32, id: u64) -> Self {
        Self {
            value,
            id,
            is_new: false,
            merged: true,
        }
    }

    /// Creates a tile with both transient flags cleared.
    pub fn settled(value: u32, id: u64) -> Self {
        Self {
            value,
            id,
            is_new: false,
            merged: false,
        }
    }

    /// Clears the per-move flags.
    pub fn settle(&mut self) {
        self.is_new = false;
        self.merged = false;
    }
}

/// Monotonic tile id allocator.
///
/// Serializes as a bare integer (`tileIdCounter` in snapshots).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileIdCounter(u64);

impl TileIdCounter {
    /// Creates a counter whose next id is `next`.
    pub fn starting_at(next: u64) -> Self {
        Self(next)
    }

    /// Consumes and returns the next id.
    pub fn next_id(&mut self) -> u64 {
        let id = self.0;
        self.0 += 1;
        id
    }

    /// Returns the id the next allocation will hand out.
    pub fn peek(&self) -> u64 {
        self.0
    }
}

/// A cell coordinate. Row 0 is the top, column 0 is the left edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row index (0-3).
    pub row: usize,
    /// Column index (0-3).
    pub col: usize,
}

impl Position {
    /// Creates a position, returning `None` when out of bounds.
    pub fn new(row: usize, col: usize) -> Option<Self> {
        (row < SIZE && col < SIZE).then_some(Self { row, col })
    }

    /// All 16 positions in row-major order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| Position { row, col }))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Direction of travel for a move.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    /// Tiles slide toward row 0.
    Up,
    /// Tiles slide toward row 3.
    Down,
    /// Tiles slide toward column 0.
    Left,
    /// Tiles slide toward column 3.
    Right,
}

impl Direction {
    /// Positions of line `index`, ordered so that index 0 is the wall
    /// the tiles travel toward.
    ///
    /// Rows are lines for left/right, columns for up/down.
    #[instrument]
    pub fn line_positions(self, index: usize) -> [Position; SIZE] {
        std::array::from_fn(|step| {
            let toward_wall = step;
            let away_from_wall = SIZE - 1 - step;
            match self {
                Direction::Left => Position { row: index, col: toward_wall },
                Direction::Right => Position { row: index, col: away_from_wall },
                Direction::Up => Position { row: toward_wall, col: index },
                Direction::Down => Position { row: away_from_wall, col: index },
            }
        })
    }
}

/// One row or column, oriented toward the wall of travel.
pub type Line = [Option<Tile>; SIZE];

/// 4x4 grid of optional tiles.
///
/// Serializes as a nested array of rows where empty cells are `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    cells: [[Option<Tile>; SIZE]; SIZE],
}

impl Grid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a grid from raw values, `0` meaning empty.
    ///
    /// Ids are taken from `ids` in row-major order and every tile is settled.
    pub fn from_values(values: [[u32; SIZE]; SIZE], ids: &mut TileIdCounter) -> Self {
        let mut grid = Self::new();
        for pos in Position::all() {
            let value = values[pos.row][pos.col];
            if value != 0 {
                grid.set(pos, Some(Tile::settled(value, ids.next_id())));
            }
        }
        grid
    }

    /// Gets the cell at `pos`.
    pub fn get(&self, pos: Position) -> Option<&Tile> {
        self.cells[pos.row][pos.col].as_ref()
    }

    /// Replaces the cell at `pos`.
    pub fn set(&mut self, pos: Position, cell: Option<Tile>) {
        self.cells[pos.row][pos.col] = cell;
    }

    /// Value at `pos`, `0` when empty.
    pub fn value(&self, pos: Position) -> u32 {
        self.get(pos).map_or(0, |t| t.value)
    }

    /// Rows as stored.
    pub fn rows(&self) -> &[[Option<Tile>; SIZE]; SIZE] {
        &self.cells
    }

    /// Raw values in row-major rows, `0` meaning empty.
    pub fn values(&self) -> [[u32; SIZE]; SIZE] {
        self.cells
            .map(|row| row.map(|cell| cell.map_or(0, |t| t.value)))
    }

    /// Extracts line `index` oriented for `direction`.
    pub fn line(&self, direction: Direction, index: usize) -> Line {
        direction
            .line_positions(index)
            .map(|pos| self.cells[pos.row][pos.col])
    }

    /// Writes an oriented line back.
    pub fn set_line(&mut self, direction: Direction, index: usize, line: Line) {
        for (pos, cell) in direction.line_positions(index).into_iter().zip(line) {
            self.set(pos, cell);
        }
    }

    /// Iterates over occupied cells.
    pub fn tiles(&self) -> impl Iterator<Item = (Position, &Tile)> {
        Position::all().filter_map(move |pos| self.get(pos).map(|t| (pos, t)))
    }

    /// Positions of all empty cells in row-major order.
    pub fn empty_positions(&self) -> Vec<Position> {
        Position::all().filter(|pos| self.get(*pos).is_none()).collect()
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.tiles().count()
    }

    /// Checks whether every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.occupied_count() == SIZE * SIZE
    }

    /// Highest tile value, `0` on an empty grid.
    pub fn max_value(&self) -> u32 {
        self.tiles().map(|(_, t)| t.value).max().unwrap_or(0)
    }

    /// Clears `is_new`/`merged` on every tile.
    pub fn settle_all(&mut self) {
        for tile in self.cells.iter_mut().flatten().flatten() {
            tile.settle();
        }
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, row) in self.cells.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            let cells: Vec<String> = row
                .iter()
                .map(|cell| match cell {
                    Some(t) => format!("{:>5}", t.value),
                    None => format!("{:>5}", "."),
                })
                .collect();
            write!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}
