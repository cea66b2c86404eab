//! Win condition checking for Ninuki-renju (Pente-style Gomoku)
//!
//! Win conditions:
//! 1. Five or more stones in a row, confirmed after the opponent's reply
//! 2. Reaching the capture threshold (5 pairs by default)
//!
//! A fresh five only becomes a win if the opponent's next move does not
//! capture a stone out of it.

use crate::board::{Board, Pos, Stone, DIRECTIONS};

use super::capture::find_captures;

/// A maximal run of five or more same-colored stones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiveLine {
    /// First stone of the run
    pub start: Pos,
    /// Index into [`DIRECTIONS`]
    pub dir: u8,
    /// Run length (>= 5)
    pub len: u8,
}

impl FiveLine {
    /// Stones of the run, from `start`.
    pub fn cells(self) -> impl Iterator<Item = Pos> {
        let (dr, dc) = DIRECTIONS[self.dir as usize];
        (0..self.len as i32).map(move |k| {
            Pos::new(
                (self.start.row as i32 + dr * k) as u8,
                (self.start.col as i32 + dc * k) as u8,
            )
        })
    }

    pub fn contains(self, pos: Pos) -> bool {
        self.cells().any(|p| p == pos)
    }
}

/// Five-or-more line through `pos` for `color`, if any.
///
/// Only the 4 lines through `pos` are scanned. No allocation.
pub fn five_line_at(board: &Board, pos: Pos, color: Stone) -> Option<FiveLine> {
    if board.get(pos) != color {
        return None;
    }
    for (dir, &(dr, dc)) in DIRECTIONS.iter().enumerate() {
        let mut back = 0;
        while let Some(p) = board.step(pos, -dr, -dc, back + 1) {
            if board.get(p) != color {
                break;
            }
            back += 1;
        }
        let mut fwd = 0;
        while let Some(p) = board.step(pos, dr, dc, fwd + 1) {
            if board.get(p) != color {
                break;
            }
            fwd += 1;
        }
        let len = back + fwd + 1;
        if len >= 5 {
            let start = Pos::new(
                (pos.row as i32 - dr * back) as u8,
                (pos.col as i32 - dc * back) as u8,
            );
            return Some(FiveLine {
                start,
                dir: dir as u8,
                len: len as u8,
            });
        }
    }
    None
}

/// Whether `breaker` has a reply that cancels `line`.
///
/// A reply cancels the line when it captures a pair containing one of the
/// line's stones, or when its captures reach `capture_win_pairs`.
pub fn can_break_line(board: &Board, line: FiveLine, breaker: Stone, capture_win_pairs: u8) -> bool {
    find_break_moves(board, line, breaker, capture_win_pairs)
        .next()
        .is_some()
}

/// All replies by `breaker` that cancel `line`.
pub fn find_break_moves(
    board: &Board,
    line: FiveLine,
    breaker: Stone,
    capture_win_pairs: u8,
) -> impl Iterator<Item = Pos> + '_ {
    let size = board.size() as u8;
    let have = board.captures(breaker);
    (0..size)
        .flat_map(move |r| (0..size).map(move |c| Pos::new(r, c)))
        .filter(move |&pos| {
            if !board.is_empty(pos) {
                return false;
            }
            let captured = find_captures(board, pos, breaker);
            !captured.is_empty()
                && (have + captured.pairs() >= capture_win_pairs
                    || captured.as_slice().iter().any(|&p| line.contains(p)))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_five_horizontal() {
        let mut board = Board::new();
        for i in 0..5 {
            board.place_stone(Pos::new(9, i), Stone::Black);
        }
        let line = five_line_at(&board, Pos::new(9, 2), Stone::Black);
        assert_eq!(
            line,
            Some(FiveLine {
                start: Pos::new(9, 0),
                dir: 0,
                len: 5
            })
        );
        assert!(five_line_at(&board, Pos::new(9, 2), Stone::White).is_none());
        board.remove_stone(Pos::new(9, 4));
        assert!(five_line_at(&board, Pos::new(9, 2), Stone::Black).is_none());
    }

    #[test]
    fn test_five_anti_diagonal() {
        let mut board = Board::new();
        for i in 0..5u8 {
            board.place_stone(Pos::new(4 + i, 10 - i), Stone::White);
        }
        let line = five_line_at(&board, Pos::new(6, 8), Stone::White).expect("five expected");
        assert_eq!(line.start, Pos::new(4, 10));
        assert_eq!(line.cells().count(), 5);
        assert!(line.contains(Pos::new(8, 6)));
    }

    #[test]
    fn test_four_is_not_five() {
        let mut board = Board::new();
        for i in 0..4 {
            board.place_stone(Pos::new(9, i), Stone::Black);
        }
        assert!(five_line_at(&board, Pos::new(9, 0), Stone::Black).is_none());
    }

    #[test]
    fn test_overline_counts() {
        let mut board = Board::new();
        for i in 3..9 {
            board.place_stone(Pos::new(2, i), Stone::Black);
        }
        let line = five_line_at(&board, Pos::new(2, 8), Stone::Black).expect("overline");
        assert_eq!(line.len, 6);
    }

    #[test]
    fn test_can_break_five_by_capture() {
        let mut board = Board::new();
        // Black five on row 9, cols 5..=9
        for i in 5..10 {
            board.place_stone(Pos::new(9, i), Stone::Black);
        }
        // Vertical W(8,7) B(9,7) B(10,7) _(11,7): White captures at (11,7)
        board.place_stone(Pos::new(8, 7), Stone::White);
        board.place_stone(Pos::new(10, 7), Stone::Black);

        let line = five_line_at(&board, Pos::new(9, 5), Stone::Black).expect("five");
        assert!(can_break_line(&board, line, Stone::White, 5));
        let moves: Vec<Pos> = find_break_moves(&board, line, Stone::White, 5).collect();
        assert_eq!(moves, vec![Pos::new(11, 7)]);
    }

    #[test]
    fn test_cannot_break_solid_five() {
        let mut board = Board::new();
        for i in 5..10 {
            board.place_stone(Pos::new(9, i), Stone::Black);
        }
        board.place_stone(Pos::new(0, 0), Stone::White);
        let line = five_line_at(&board, Pos::new(9, 5), Stone::Black).expect("five");
        assert!(!can_break_line(&board, line, Stone::White, 5));
    }

    #[test]
    fn test_capture_win_breaks_any_five() {
        let mut board = Board::new();
        for i in 5..10 {
            board.place_stone(Pos::new(9, i), Stone::Black);
        }
        // Unrelated capturable pair far from the five
        board.place_stone(Pos::new(2, 2), Stone::White);
        board.place_stone(Pos::new(2, 3), Stone::Black);
        board.place_stone(Pos::new(2, 4), Stone::Black);
        board.white_captures = 4;

        let line = five_line_at(&board, Pos::new(9, 5), Stone::Black).expect("five");
        assert!(can_break_line(&board, line, Stone::White, 5));
        assert!(!can_break_line(&board, line, Stone::White, 6));
    }
}
