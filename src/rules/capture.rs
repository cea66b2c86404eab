//! Capture rules for Ninuki-renju (Pente-style pair capture)
//!
//! Capture pattern: X-O-O-X where X is the capturing player's stone
//! and O is the opponent's stone. Only exactly 2 stones can be captured.

use crate::board::{Board, Pos, Stone, DIRECTIONS};

/// One move can capture at most one pair in each of the 8 directions.
pub const MAX_CAPTURED_STONES: usize = 16;

/// Stones removed by one move, stored inline (no allocation).
///
/// Stones are kept in pair order: `[a0, a1, b0, b1, ...]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaptureList {
    stones: [Pos; MAX_CAPTURED_STONES],
    len: u8,
}

impl CaptureList {
    pub const fn new() -> Self {
        Self {
            stones: [Pos { row: 0, col: 0 }; MAX_CAPTURED_STONES],
            len: 0,
        }
    }

    #[inline]
    fn push_pair(&mut self, a: Pos, b: Pos) {
        let n = self.len as usize;
        self.stones[n] = a;
        self.stones[n + 1] = b;
        self.len += 2;
    }

    #[inline]
    pub fn as_slice(&self) -> &[Pos] {
        &self.stones[..self.len as usize]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of captured stones (always even).
    #[inline]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Number of captured pairs.
    #[inline]
    pub fn pairs(&self) -> u8 {
        self.len / 2
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        self.as_slice().contains(&pos)
    }
}

impl Default for CaptureList {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the stones that would be captured if `stone` is placed at `pos`.
///
/// The board is not modified; `pos` is treated as holding `stone`.
pub fn find_captures(board: &Board, pos: Pos, stone: Stone) -> CaptureList {
    let mut captured = CaptureList::new();
    let opponent = stone.opponent();

    for &(dr, dc) in &DIRECTIONS {
        for sign in [-1i32, 1i32] {
            let (dr, dc) = (dr * sign, dc * sign);

            // Pattern: placed(pos) - opp(+1) - opp(+2) - ours(+3)
            let Some(p3) = board.step(pos, dr, dc, 3) else {
                continue;
            };
            let Some(p1) = board.step(pos, dr, dc, 1) else {
                continue;
            };
            let Some(p2) = board.step(pos, dr, dc, 2) else {
                continue;
            };

            if board.get(p1) == opponent && board.get(p2) == opponent && board.get(p3) == stone {
                captured.push_pair(p1, p2);
            }
        }
    }

    captured
}
