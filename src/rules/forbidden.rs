//! Double-three forbidden move rules
//!
//! A double-three is a move that creates two or more free-threes at once.
//! A free-three is three stones that become an open four if left alone:
//! `_OOO_`, `_OO_O_` or `_O_OO_`, with the new stone part of the shape.
//!
//! The move's captures are resolved first; a capture does not excuse a
//! double-three that survives it.

use crate::board::line::{CELL_EMPTY, CELL_OWN};
use crate::board::{Board, LineCode, LineId, Pos, Stone};

use super::capture::find_captures;

/// Free-three shapes: `E` empty, `P` own stone.
const FREE_THREES: [&[u8]; 3] = [b"EPPPE", b"EPPEPE", b"EPEPPE"];

/// Whether `shape` matches `code` at `start` with `idx` on one of its stones.
fn shape_at(code: LineCode, shape: &[u8], start: usize, idx: usize) -> bool {
    if start + shape.len() > code.len() || idx < start || idx >= start + shape.len() {
        return false;
    }
    if shape[idx - start] != b'P' {
        return false;
    }
    shape.iter().enumerate().all(|(k, &s)| {
        let cell = code.cell(start + k);
        match s {
            b'P' => cell == CELL_OWN,
            _ => cell == CELL_EMPTY,
        }
    })
}

/// Whether the line holds a free-three that uses cell `idx`.
fn line_has_free_three(code: LineCode, idx: usize) -> bool {
    FREE_THREES.iter().any(|shape| {
        let first = idx.saturating_sub(shape.len() - 1);
        (first..=idx).any(|start| shape_at(code, shape, start, idx))
    })
}

/// Count directions through `pos` in which `stone` has a free-three
/// containing `pos`. The stone must already be on the board.
pub fn count_free_threes(board: &Board, pos: Pos, stone: Stone) -> u8 {
    let size = board.size();
    (0..4)
        .filter(|&dir| {
            let (line, offset) = LineId::through(pos, dir, size);
            line_has_free_three(LineCode::read(board, line, stone), offset + 1)
        })
        .count() as u8
}

/// Double-three check on a board where `stone` already sits at `pos` and
/// the move's captures (if any) are already resolved.
#[inline]
pub fn creates_double_three(board: &Board, pos: Pos, stone: Stone) -> bool {
    count_free_threes(board, pos, stone) >= 2
}

/// Check if placing `stone` at `pos` is a forbidden double-three.
///
/// Works on a scratch copy of the board: the stone is placed and its captures
/// applied before counting.
pub fn is_double_three(board: &Board, pos: Pos, stone: Stone) -> bool {
    let mut scratch = *board;
    let captured = find_captures(&scratch, pos, stone);
    scratch.place_stone(pos, stone);
    for &p in captured.as_slice() {
        scratch.remove_stone(p);
    }
    creates_double_three(&scratch, pos, stone)
}
