//! Zobrist hashing for position identification
//!
//! The hash covers (cell, occupant) only. Capture counts and the side to move
//! are kept next to the hash in the transposition key instead of being folded
//! into it, so the hash of a board depends on its stones alone.
//!
//! # Example
//!
//! ```
//! use gomoku::board::{Board, Pos, Stone, ZobristTable};
//!
//! let zt = ZobristTable::shared();
//! let mut board = Board::new();
//! let hash1 = zt.hash(&board);
//!
//! let pos = Pos::new(9, 9);
//! board.place_stone(pos, Stone::Black);
//!
//! // Incremental update is equivalent to full recomputation
//! assert_eq!(zt.toggle(hash1, pos, Stone::Black), zt.hash(&board));
//! ```

use std::sync::OnceLock;

use super::{Board, Pos, Stone, TOTAL_CELLS};

/// Precomputed random keys for each (cell, color) pair.
pub struct ZobristTable {
    black: [u64; TOTAL_CELLS],
    white: [u64; TOTAL_CELLS],
}

static SHARED: OnceLock<ZobristTable> = OnceLock::new();

impl ZobristTable {
    /// Create a table with deterministic keys.
    ///
    /// Uses a linear congruential generator with a fixed seed, so every
    /// table ever built holds the same keys.
    #[must_use]
    pub fn new() -> Self {
        // Constants from Knuth's MMIX LCG
        let mut seed: u64 = 0x1234_5678_9ABC_DEF0;
        let mut next_rand = || {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1);
            seed
        };

        let mut black = [0u64; TOTAL_CELLS];
        let mut white = [0u64; TOTAL_CELLS];
        for i in 0..TOTAL_CELLS {
            black[i] = next_rand();
            white[i] = next_rand();
        }

        Self { black, white }
    }

    /// Process-wide table shared by every [`crate::rules::Position`].
    pub fn shared() -> &'static ZobristTable {
        SHARED.get_or_init(ZobristTable::new)
    }

    #[inline]
    fn key(&self, pos: Pos, stone: Stone) -> u64 {
        let idx = pos.to_index();
        match stone {
            Stone::Black => self.black[idx],
            Stone::White => self.white[idx],
            Stone::Empty => 0,
        }
    }

    /// Full hash of every stone on the board.
    #[must_use]
    pub fn hash(&self, board: &Board) -> u64 {
        board
            .black
            .iter_ones()
            .map(|p| self.black[p.to_index()])
            .chain(board.white.iter_ones().map(|p| self.white[p.to_index()]))
            .fold(0, |h, k| h ^ k)
    }

    /// Add or remove `stone` at `pos`. XOR is its own inverse, so the same
    /// call serves placement, capture and undo.
    #[inline]
    #[must_use]
    pub fn toggle(&self, hash: u64, pos: Pos, stone: Stone) -> u64 {
        hash ^ self.key(pos, stone)
    }
}

impl Default for ZobristTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zobrist_empty_board() {
        let zt = ZobristTable::new();
        assert_eq!(zt.hash(&Board::new()), 0);
    }

    #[test]
    fn test_zobrist_deterministic() {
        let zt1 = ZobristTable::new();
        let zt2 = ZobristTable::new();
        let mut board = Board::new();
        board.place_stone(Pos::new(3, 4), Stone::White);

        assert_eq!(zt1.hash(&board), zt2.hash(&board));
        assert_eq!(zt1.hash(&board), ZobristTable::shared().hash(&board));
    }

    #[test]
    fn test_zobrist_same_position_different_path() {
        let zt = ZobristTable::new();
        let mut board1 = Board::new();
        let mut board2 = Board::new();

        board1.place_stone(Pos::new(9, 9), Stone::Black);
        board1.place_stone(Pos::new(10, 10), Stone::White);

        board2.place_stone(Pos::new(10, 10), Stone::White);
        board2.place_stone(Pos::new(9, 9), Stone::Black);

        assert_eq!(zt.hash(&board1), zt.hash(&board2));
    }

    #[test]
    fn test_zobrist_color_matters() {
        let zt = ZobristTable::new();
        let pos = Pos::new(9, 9);
        assert_ne!(zt.toggle(0, pos, Stone::Black), zt.toggle(0, pos, Stone::White));
    }

    #[test]
    fn test_zobrist_capture_sequence() {
        let zt = ZobristTable::new();
        let mut board = Board::new();
        board.place_stone(Pos::new(5, 5), Stone::Black);
        board.place_stone(Pos::new(5, 6), Stone::White);
        board.place_stone(Pos::new(5, 7), Stone::White);
        let before = zt.hash(&board);

        // Black plays (5,8) and removes the pair
        let mut h = zt.toggle(before, Pos::new(5, 8), Stone::Black);
        h = zt.toggle(h, Pos::new(5, 6), Stone::White);
        h = zt.toggle(h, Pos::new(5, 7), Stone::White);

        board.place_stone(Pos::new(5, 8), Stone::Black);
        board.remove_stone(Pos::new(5, 6));
        board.remove_stone(Pos::new(5, 7));
        assert_eq!(h, zt.hash(&board));

        // Undo in any order restores the original hash
        h = zt.toggle(h, Pos::new(5, 7), Stone::White);
        h = zt.toggle(h, Pos::new(5, 8), Stone::Black);
        h = zt.toggle(h, Pos::new(5, 6), Stone::White);
        assert_eq!(h, before);
    }

    #[test]
    fn test_zobrist_all_corners() {
        let zt = ZobristTable::new();
        let mut board = Board::new();
        let corners = [
            Pos::new(0, 0),
            Pos::new(0, 18),
            Pos::new(18, 0),
            Pos::new(18, 18),
        ];
        for &pos in &corners {
            board.place_stone(pos, Stone::Black);
        }

        let expected = corners
            .iter()
            .fold(0u64, |h, p| h ^ zt.black[p.to_index()]);
        assert_eq!(zt.hash(&board), expected);
    }
}
