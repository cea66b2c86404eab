//! Transposition Table for caching search results
//!
//! Entries are keyed by the position hash together with both capture counts
//! and the side to move: the cell hash alone does not tell apart positions
//! that differ only in captured pairs, and those can be won or lost on the
//! capture count.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Pos, Stone};
//! use gomoku::search::{Bound, TranspositionTable, TtKey};
//!
//! let mut tt = TranspositionTable::new(1); // 1 MB
//! let key = TtKey::new(0x1234_5678_9ABC_DEF0, [0, 1], Stone::Black);
//!
//! tt.store(key, 5, 100, Bound::Exact, Some(Pos::new(9, 9)));
//! assert_eq!(tt.probe(key, 5, -1000, 1000), Some(100));
//! assert_eq!(tt.best_move(key), Some(Pos::new(9, 9)));
//! ```

use crate::board::{Pos, Stone};

/// How a stored score relates to the true value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside the window
    Exact,
    /// Score >= stored value (beta cutoff)
    LowerBound,
    /// Score <= stored value (failed low)
    UpperBound,
}

/// Identity of a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TtKey {
    pub hash: u64,
    /// Captured pairs, black then white
    pub captures: [u8; 2],
    pub side: Stone,
}

impl TtKey {
    #[inline]
    pub fn new(hash: u64, captures: [u8; 2], side: Stone) -> Self {
        Self {
            hash,
            captures,
            side,
        }
    }

    /// Slot selector mixing the non-hash parts into the hash.
    #[inline]
    fn mixed(&self) -> u64 {
        let extra = (self.captures[0] as u64) << 8
            | (self.captures[1] as u64) << 16
            | (self.side == Stone::White) as u64;
        self.hash ^ extra.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TtEntry {
    pub key: TtKey,
    /// Remaining depth the score was searched to
    pub depth: u8,
    pub score: i64,
    pub bound: Bound,
    pub best_move: Option<Pos>,
}

/// Direct-mapped table: each key maps to exactly one slot, and collisions are
/// settled by a depth-preferred replacement policy.
pub struct TranspositionTable {
    entries: Vec<Option<TtEntry>>,
    size: usize,
}

impl TranspositionTable {
    /// Create a table of about `size_mb` megabytes (at least 1024 slots).
    #[must_use]
    pub fn new(size_mb: usize) -> Self {
        let entry_size = std::mem::size_of::<Option<TtEntry>>();
        let size = ((size_mb * 1024 * 1024) / entry_size).max(1024);

        Self {
            entries: vec![None; size],
            size,
        }
    }

    #[inline]
    fn slot(&self, key: &TtKey) -> usize {
        (key.mixed() % self.size as u64) as usize
    }

    fn entry(&self, key: TtKey) -> Option<&TtEntry> {
        self.entries[self.slot(&key)]
            .as_ref()
            .filter(|e| e.key == key)
    }

    /// Score usable as a cutoff for a node searched to `depth` with the
    /// window `(alpha, beta)`.
    ///
    /// The entry must be at least as deep, and its bound must settle the
    /// window: exact always, a lower bound at or above `beta`, an upper bound
    /// at or below `alpha`.
    #[must_use]
    pub fn probe(&self, key: TtKey, depth: u8, alpha: i64, beta: i64) -> Option<i64> {
        let entry = self.entry(key)?;
        if entry.depth < depth {
            return None;
        }
        match entry.bound {
            Bound::Exact => Some(entry.score),
            Bound::LowerBound if entry.score >= beta => Some(entry.score),
            Bound::UpperBound if entry.score <= alpha => Some(entry.score),
            _ => None,
        }
    }

    /// Best move of an earlier search of this node, for move ordering.
    #[must_use]
    pub fn best_move(&self, key: TtKey) -> Option<Pos> {
        self.entry(key).and_then(|e| e.best_move)
    }

    /// Replace if the slot is empty, holds the same node, or the new search
    /// is at least as deep.
    pub fn store(&mut self, key: TtKey, depth: u8, score: i64, bound: Bound, best_move: Option<Pos>) {
        let idx = self.slot(&key);
        let replace = match &self.entries[idx] {
            None => true,
            Some(e) => e.key == key || e.depth <= depth,
        };
        if replace {
            self.entries[idx] = Some(TtEntry {
                key,
                depth,
                score,
                bound,
                best_move,
            });
        }
    }

    #[must_use]
    pub fn stats(&self) -> TtStats {
        let used = self.entries.iter().filter(|e| e.is_some()).count();
        TtStats {
            size: self.size,
            used,
            usage_percent: (used as f64 / self.size as f64 * 100.0) as u8,
        }
    }
}

/// Statistics about table usage.
#[derive(Debug, Clone, Copy)]
pub struct TtStats {
    /// Total number of slots
    pub size: usize,
    /// Slots currently occupied
    pub used: usize,
    /// Percentage of table in use (0-100)
    pub usage_percent: u8,
}
