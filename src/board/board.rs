//! Board structure with capture tracking

use super::bitboard::Bitboard;
use super::{Pos, Stone, MAX_BOARD_SIZE};

/// Game board with capture tracking.
///
/// The board only stores stones and capture counters. Captures, hashing and
/// game status are driven by [`crate::rules::Position`]; `place_stone` and
/// `remove_stone` here are raw edits used for setting up positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    /// Black stones bitboard
    pub black: Bitboard,
    /// White stones bitboard
    pub white: Bitboard,
    /// Number of pairs captured by each side
    pub black_captures: u8,
    pub white_captures: u8,
    size: u8,
}

impl Board {
    /// Standard 19x19 board.
    pub fn new() -> Self {
        Self::with_size(MAX_BOARD_SIZE)
    }

    /// Board with `size` rows and columns, clamped to `5..=19`.
    pub fn with_size(size: usize) -> Self {
        let size = size.clamp(super::MIN_BOARD_SIZE, MAX_BOARD_SIZE);
        Self {
            black: Bitboard::new(),
            white: Bitboard::new(),
            black_captures: 0,
            white_captures: 0,
            size: size as u8,
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size as usize
    }

    /// Whether (row, col) lies on this board.
    #[inline]
    pub fn contains(&self, row: i32, col: i32) -> bool {
        let n = self.size as i32;
        row >= 0 && row < n && col >= 0 && col < n
    }

    #[inline]
    pub fn contains_pos(&self, pos: Pos) -> bool {
        pos.row < self.size && pos.col < self.size
    }

    /// Cell `k` steps from `pos` along (dr, dc), if it is on the board.
    #[inline]
    pub fn step(&self, pos: Pos, dr: i32, dc: i32, k: i32) -> Option<Pos> {
        let r = pos.row as i32 + dr * k;
        let c = pos.col as i32 + dc * k;
        if self.contains(r, c) {
            Some(Pos::new(r as u8, c as u8))
        } else {
            None
        }
    }

    /// Center cell, where the first stone goes.
    #[inline]
    pub fn center(&self) -> Pos {
        let mid = self.size / 2;
        Pos::new(mid, mid)
    }

    /// Get stone at position
    #[inline]
    pub fn get(&self, pos: Pos) -> Stone {
        if self.black.get(pos) {
            Stone::Black
        } else if self.white.get(pos) {
            Stone::White
        } else {
            Stone::Empty
        }
    }

    #[inline]
    pub fn is_empty(&self, pos: Pos) -> bool {
        !self.black.get(pos) && !self.white.get(pos)
    }

    /// Place a stone (without capture processing)
    #[inline]
    pub fn place_stone(&mut self, pos: Pos, stone: Stone) {
        match stone {
            Stone::Black => self.black.set(pos),
            Stone::White => self.white.set(pos),
            Stone::Empty => {}
        }
    }

    #[inline]
    pub fn remove_stone(&mut self, pos: Pos) {
        self.black.clear(pos);
        self.white.clear(pos);
    }

    /// Captured pairs for a color
    #[inline]
    pub fn captures(&self, stone: Stone) -> u8 {
        match stone {
            Stone::Black => self.black_captures,
            Stone::White => self.white_captures,
            Stone::Empty => 0,
        }
    }

    /// Capture counts as (black, white)
    #[inline]
    pub fn capture_counts(&self) -> [u8; 2] {
        [self.black_captures, self.white_captures]
    }

    #[inline]
    pub fn add_captures(&mut self, stone: Stone, count: u8) {
        match stone {
            Stone::Black => self.black_captures = self.black_captures.saturating_add(count),
            Stone::White => self.white_captures = self.white_captures.saturating_add(count),
            Stone::Empty => {}
        }
    }

    /// Subtract captures for a color (saturating, min 0) - used for undo
    #[inline]
    pub fn sub_captures(&mut self, stone: Stone, count: u8) {
        match stone {
            Stone::Black => self.black_captures = self.black_captures.saturating_sub(count),
            Stone::White => self.white_captures = self.white_captures.saturating_sub(count),
            Stone::Empty => {}
        }
    }

    /// Total stones on board
    #[inline]
    pub fn stone_count(&self) -> u32 {
        self.black.count() + self.white.count()
    }

    #[inline]
    pub fn is_board_empty(&self) -> bool {
        self.black.is_empty() && self.white.is_empty()
    }

    /// All occupied cells, black first.
    pub fn occupied(&self) -> impl Iterator<Item = Pos> + '_ {
        self.black.iter_ones().chain(self.white.iter_ones())
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "   ")?;
        for c in 0..self.size {
            write!(f, "{:>3}", c)?;
        }
        writeln!(f)?;
        for r in 0..self.size {
            write!(f, "{:>3}", r)?;
            for c in 0..self.size {
                let ch = match self.get(Pos::new(r, c)) {
                    Stone::Black => 'X',
                    Stone::White => 'O',
                    Stone::Empty => '.',
                };
                write!(f, "{:>3}", ch)?;
            }
            writeln!(f)?;
        }
        write!(
            f,
            "captures: black {} / white {}",
            self.black_captures, self.white_captures
        )
    }
}
