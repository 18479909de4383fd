//! Slide/merge resolution for a single line.

use tracing::{instrument, trace};

use crate::types::{Line, SIZE, Tile, TileIdCounter};

/// Result of resolving one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineOutcome {
    /// Resolved cells, still oriented toward the wall.
    pub cells: Line,
    /// Sum of the values of all tiles created by merges.
    pub score: u64,
    /// Number of merges performed.
    pub merges: usize,
    /// Output differs from input in emptiness or value at some index.
    pub moved: bool,
}

/// Slides and merges a line toward index 0.
///
/// Empties are squeezed out, then a single left-to-right pass merges equal
/// neighbours. A merge result gets a fresh id from `ids` and carries
/// `merged = true`, which keeps it from merging again in the same pass.
/// Pairs whose sum would overflow `u32` stay apart.
#[instrument(skip(ids))]
pub fn resolve_line(line: &Line, ids: &mut TileIdCounter) -> LineOutcome {
    let mut compacted: Vec<Tile> = line.iter().flatten().copied().collect();
    let mut score = 0;
    let mut merges = 0;

    let mut i = 0;
    while i + 1 < compacted.len() {
        let (left, right) = (compacted[i], compacted[i + 1]);
        if left.value == right.value
            && !left.merged
            && !right.merged
            && let Some(value) = left.value.checked_mul(2)
        {
            let tile = Tile::merged(value, ids.next_id());
            trace!(value = tile.value, id = tile.id, "Merged pair");
            score += u64::from(tile.value);
            merges += 1;
            compacted[i] = tile;
            compacted.remove(i + 1);
        }
        i += 1;
    }

    let mut cells: Line = [None; SIZE];
    for (slot, tile) in cells.iter_mut().zip(compacted) {
        *slot = Some(tile);
    }

    let moved = line
        .iter()
        .zip(cells.iter())
        .any(|(before, after)| match (before, after) {
            (None, None) => false,
            (Some(a), Some(b)) => a.value != b.value,
            _ => true,
        });

    LineOutcome {
        cells,
        score,
        merges,
        moved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_of(values: [u32; SIZE], ids: &mut TileIdCounter) -> Line {
        values.map(|v| (v != 0).then(|| Tile::settled(v, ids.next_id())))
    }

    fn values(line: &Line) -> [u32; SIZE] {
        line.map(|cell| cell.map_or(0, |t| t.value))
    }

    #[test]
    fn test_four_equal_tiles_merge_pairwise() {
        let mut ids = TileIdCounter::default();
        let line = line_of([2, 2, 2, 2], &mut ids);
        let out = resolve_line(&line, &mut ids);
        assert_eq!(values(&out.cells), [4, 4, 0, 0]);
        assert_eq!(out.score, 8);
        assert_eq!(out.merges, 2);
        assert!(out.moved);
    }

    #[test]
    fn test_gap_then_triple_merges_leftmost_pair() {
        let mut ids = TileIdCounter::default();
        let line = line_of([2, 0, 2, 2], &mut ids);
        let out = resolve_line(&line, &mut ids);
        assert_eq!(values(&out.cells), [4, 2, 0, 0]);
        assert_eq!(out.score, 4);
        assert!(out.moved);
    }

    #[test]
    fn test_merge_result_does_not_merge_again() {
        let mut ids = TileIdCounter::default();
        let line = line_of([2, 2, 4, 0], &mut ids);
        let out = resolve_line(&line, &mut ids);
        assert_eq!(values(&out.cells), [4, 4, 0, 0]);
        assert_eq!(out.merges, 1);
        assert_eq!(out.score, 4);
    }

    #[test]
    fn test_blocked_line_is_unchanged() {
        let mut ids = TileIdCounter::default();
        let line = line_of([2, 4, 8, 16], &mut ids);
        let out = resolve_line(&line, &mut ids);
        assert_eq!(out.cells, line);
        assert!(!out.moved);
        assert_eq!(out.score, 0);
    }

    #[test]
    fn test_packed_prefix_is_not_a_move() {
        let mut ids = TileIdCounter::default();
        let line = line_of([2, 4, 0, 0], &mut ids);
        let out = resolve_line(&line, &mut ids);
        assert!(!out.moved);
        assert_eq!(out.cells, line);
    }

    #[test]
    fn test_slide_without_merge_moves() {
        let mut ids = TileIdCounter::default();
        let line = line_of([0, 0, 0, 8], &mut ids);
        let out = resolve_line(&line, &mut ids);
        assert_eq!(values(&out.cells), [8, 0, 0, 0]);
        assert!(out.moved);
        assert_eq!(out.merges, 0);
        // Slid tiles keep their identity.
        assert_eq!(out.cells[0].map(|t| t.id), line[3].map(|t| t.id));
    }

    #[test]
    fn test_merged_tiles_get_fresh_ids() {
        let mut ids = TileIdCounter::default();
        let line = line_of([4, 4, 0, 0], &mut ids);
        let before = ids.peek();
        let out = resolve_line(&line, &mut ids);
        let tile = out.cells[0].expect("merged tile");
        assert_eq!(tile.id, before);
        assert!(tile.merged);
        assert!(!tile.is_new);
        assert_eq!(ids.peek(), before + 1);
    }

    #[test]
    fn test_empty_line_is_noop() {
        let mut ids = TileIdCounter::default();
        let out = resolve_line(&[None; SIZE], &mut ids);
        assert!(!out.moved);
        assert_eq!(ids.peek(), 0);
    }

    #[test]
    fn test_overflowing_pair_stays_apart() {
        let mut ids = TileIdCounter::default();
        let line = line_of([1 << 31, 1 << 31, 0, 0], &mut ids);
        let before = ids.peek();
        let out = resolve_line(&line, &mut ids);
        assert_eq!(out.cells, line);
        assert!(!out.moved);
        assert_eq!(out.merges, 0);
        assert_eq!(ids.peek(), before);
    }
}
