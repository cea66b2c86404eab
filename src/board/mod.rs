//! Board representation for Gomoku
//!
//! Cells are always indexed with a fixed stride of [`MAX_BOARD_SIZE`], so the
//! bitboards and Zobrist tables have the same shape for every playable size.
//! The playable size itself lives on [`Board`].

pub mod bitboard;
pub mod board;
pub mod line;
pub mod zobrist;


// Re-exports
pub use bitboard::Bitboard;
pub use board::Board;
pub use line::{LineCode, LineId, DIRECTIONS};
pub use zobrist::ZobristTable;

/// Largest supported board (19x19)
pub const MAX_BOARD_SIZE: usize = 19;
/// Smallest board that can still hold a five
pub const MIN_BOARD_SIZE: usize = 5;
pub const TOTAL_CELLS: usize = MAX_BOARD_SIZE * MAX_BOARD_SIZE; // 361

/// Stone colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stone {
    Empty,
    Black,
    White,
}

impl Stone {
    /// Get opponent color
    #[inline]
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
            Stone::Empty => Stone::Empty,
        }
    }
}

impl std::fmt::Display for Stone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stone::Empty => write!(f, "empty"),
            Stone::Black => write!(f, "black"),
            Stone::White => write!(f, "white"),
        }
    }
}

/// Position on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    #[inline]
    pub fn new(row: u8, col: u8) -> Self {
        debug_assert!(row < MAX_BOARD_SIZE as u8 && col < MAX_BOARD_SIZE as u8);
        Self { row, col }
    }

    /// `None` outside the largest supported board.
    pub fn new_checked(row: u8, col: u8) -> Option<Self> {
        let max = MAX_BOARD_SIZE as u8;
        (row < max && col < max).then_some(Self { row, col })
    }

    #[inline]
    pub fn to_index(self) -> usize {
        self.row as usize * MAX_BOARD_SIZE + self.col as usize
    }

    #[inline]
    pub fn from_index(idx: usize) -> Self {
        Self {
            row: (idx / MAX_BOARD_SIZE) as u8,
            col: (idx % MAX_BOARD_SIZE) as u8,
        }
    }
}

impl std::fmt::Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.to_index().cmp(&other.to_index())
    }
}
