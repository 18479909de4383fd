//! Bounded undo history.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::types::Grid;

/// Maximum number of undo steps kept.
pub const HISTORY_CAPACITY: usize = 10;

/// Grid and score as they were before a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Grid before the move.
    pub grid: Grid,
    /// Score before the move.
    pub score: u64,
}

/// Ring of at most [`HISTORY_CAPACITY`] snapshots, most recent last.
///
/// Pushing onto a full history evicts the oldest entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a snapshot, dropping the oldest one on overflow.
    #[instrument(skip(self, entry), fields(len = self.entries.len()))]
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);
        while self.entries.len() > HISTORY_CAPACITY {
            self.entries.pop_front();
            debug!("Evicted oldest history entry");
        }
    }

    /// Removes and returns the most recent snapshot.
    pub fn pop(&mut self) -> Option<HistoryEntry> {
        self.entries.pop_back()
    }

    /// Most recent snapshot without removing it.
    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.back()
    }

    /// Number of stored snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether there is nothing to undo.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Drops every snapshot.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(score: u64) -> HistoryEntry {
        HistoryEntry {
            grid: Grid::new(),
            score,
        }
    }

    #[test]
    fn test_push_pop_is_lifo() {
        let mut history = History::new();
        history.push(entry(1));
        history.push(entry(2));
        assert_eq!(history.pop().map(|e| e.score), Some(2));
        assert_eq!(history.pop().map(|e| e.score), Some(1));
        assert!(history.pop().is_none());
    }

    #[test]
    fn test_overflow_evicts_oldest() {
        let mut history = History::new();
        for score in 0..15 {
            history.push(entry(score));
        }
        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert_eq!(history.iter().next().map(|e| e.score), Some(5));
        assert_eq!(history.last().map(|e| e.score), Some(14));
    }
}
