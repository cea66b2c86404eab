//! Game position: board, incremental hash and game status
//!
//! [`Position`] is the single mutable state shared by the host and the search.
//! Every change goes through [`Position::apply_move`] and is reverted by the
//! matching [`Position::undo_move`]; [`MoveGuard`] pairs the two so that an
//! applied move is undone on every exit path.

use std::ops::{Deref, DerefMut};

use crate::board::{Board, Pos, Stone, ZobristTable};
use crate::error::IllegalMove;

use super::capture::{find_captures, CaptureList};
use super::forbidden::is_double_three;
use super::win::{five_line_at, FiveLine};

/// How a finished game was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WinKind {
    /// Five in a row that survived the opponent's reply
    Line,
    /// Capture threshold reached
    Captures,
}

/// A five that the opponent may still break on their next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingWin {
    pub player: Stone,
    pub line: FiveLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameStatus {
    Ongoing,
    PendingWin(PendingWin),
    Won { winner: Stone, by: WinKind },
}

impl GameStatus {
    #[inline]
    pub fn is_over(&self) -> bool {
        matches!(self, GameStatus::Won { .. })
    }

    #[inline]
    pub fn winner(&self) -> Option<Stone> {
        match *self {
            GameStatus::Won { winner, .. } => Some(winner),
            _ => None,
        }
    }

    #[inline]
    pub fn pending(&self) -> Option<PendingWin> {
        match *self {
            GameStatus::PendingWin(pw) => Some(pw),
            _ => None,
        }
    }
}

/// Everything needed to revert one move exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRecord {
    pub pos: Pos,
    pub player: Stone,
    /// Opponent stones removed by the move
    pub captured: CaptureList,
    hash_before: u64,
    status_before: GameStatus,
}

#[derive(Clone)]
pub struct Position {
    board: Board,
    hash: u64,
    status: GameStatus,
    capture_win_pairs: u8,
    zobrist: &'static ZobristTable,
}

impl Position {
    /// Empty board of `size`, won by reaching `capture_win_pairs` captures.
    pub fn new(size: usize, capture_win_pairs: u8) -> Self {
        Self::from_board(Board::with_size(size), capture_win_pairs)
    }

    /// Wrap an existing board (e.g. a set-up position). Status starts as ongoing.
    pub fn from_board(board: Board, capture_win_pairs: u8) -> Self {
        let zobrist = ZobristTable::shared();
        Self {
            hash: zobrist.hash(&board),
            board,
            status: GameStatus::Ongoing,
            capture_win_pairs,
            zobrist,
        }
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn capture_win_pairs(&self) -> u8 {
        self.capture_win_pairs
    }

    #[inline]
    pub fn captures(&self, stone: Stone) -> u8 {
        self.board.captures(stone)
    }

    /// Check a move without touching this position.
    ///
    /// The double-three test runs on a scratch copy of the board.
    pub fn is_legal(&self, pos: Pos, player: Stone) -> Result<(), IllegalMove> {
        if !self.board.contains_pos(pos) {
            return Err(IllegalMove::OutOfBounds(pos));
        }
        if !self.board.is_empty(pos) {
            return Err(IllegalMove::Occupied(pos));
        }
        if is_double_three(&self.board, pos, player) {
            return Err(IllegalMove::DoubleThree(pos));
        }
        Ok(())
    }

    /// Validate and apply a host move.
    pub fn play(&mut self, pos: Pos, player: Stone) -> Result<MoveRecord, IllegalMove> {
        if self.status.is_over() {
            return Err(IllegalMove::GameOver);
        }
        self.is_legal(pos, player)?;
        Ok(self.apply_move(pos, player))
    }

    /// Place `player` at `pos`, resolve captures and advance the game status.
    ///
    /// The move must be in bounds and on an empty cell.
    pub fn apply_move(&mut self, pos: Pos, player: Stone) -> MoveRecord {
        debug_assert!(self.board.contains_pos(pos) && self.board.is_empty(pos));
        let hash_before = self.hash;
        let status_before = self.status;
        let opponent = player.opponent();

        let captured = find_captures(&self.board, pos, player);
        self.board.place_stone(pos, player);
        self.hash = self.zobrist.toggle(self.hash, pos, player);
        for &p in captured.as_slice() {
            self.board.remove_stone(p);
            self.hash = self.zobrist.toggle(self.hash, p, opponent);
        }
        self.board.add_captures(player, captured.pairs());

        if !status_before.is_over() {
            self.status = self.next_status(status_before, pos, player, &captured);
        }

        MoveRecord {
            pos,
            player,
            captured,
            hash_before,
            status_before,
        }
    }

    fn next_status(
        &self,
        before: GameStatus,
        pos: Pos,
        player: Stone,
        captured: &CaptureList,
    ) -> GameStatus {
        if self.board.captures(player) >= self.capture_win_pairs {
            return GameStatus::Won {
                winner: player,
                by: WinKind::Captures,
            };
        }
        if let GameStatus::PendingWin(pw) = before {
            if pw.player != player && !captured.as_slice().iter().any(|&p| pw.line.contains(p)) {
                return GameStatus::Won {
                    winner: pw.player,
                    by: WinKind::Line,
                };
            }
        }
        if let Some(line) = five_line_at(&self.board, pos, player) {
            return GameStatus::PendingWin(PendingWin { player, line });
        }
        match before {
            GameStatus::PendingWin(pw) if pw.player == player => before,
            _ => GameStatus::Ongoing,
        }
    }

    /// Exact inverse of [`Position::apply_move`].
    pub fn undo_move(&mut self, record: MoveRecord) {
        let MoveRecord {
            pos,
            player,
            captured,
            hash_before,
            status_before,
        } = record;
        let opponent = player.opponent();
        debug_assert_eq!(self.board.get(pos), player, "undo of a move not on the board");

        self.board.remove_stone(pos);
        self.hash = self.zobrist.toggle(self.hash, pos, player);
        for &p in captured.as_slice() {
            self.board.place_stone(p, opponent);
            self.hash = self.zobrist.toggle(self.hash, p, opponent);
        }

        let pairs = captured.pairs();
        if self.board.captures(player) < pairs {
            debug_assert!(false, "capture count of {} would go negative", player);
            log::error!("capture count of {} would go negative undoing {}", player, pos);
        }
        self.board.sub_captures(player, pairs);
        self.status = status_before;

        if self.hash != hash_before {
            debug_assert_eq!(self.hash, hash_before, "hash mismatch after undo at {}", pos);
            log::error!("hash mismatch after undo at {}, recomputing", pos);
            self.hash = self.zobrist.hash(&self.board);
        }
    }

    /// Whether the move just applied at `pos` ends or threatens to end the game:
    /// a capture win, a confirmed line win, or a fresh five still awaiting the
    /// opponent's reply.
    pub fn check_terminal(&self, pos: Pos, player: Stone) -> bool {
        match self.status {
            GameStatus::Won { .. } => true,
            GameStatus::PendingWin(pw) => pw.player == player && pw.line.contains(pos),
            GameStatus::Ongoing => false,
        }
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Position")
            .field("board", &self.board)
            .field("hash", &format_args!("{:#018x}", self.hash))
            .field("status", &self.status)
            .field("capture_win_pairs", &self.capture_win_pairs)
            .finish()
    }
}

/// A move applied for the lifetime of the guard.
///
/// The guard dereferences to the [`Position`] and undoes the move when dropped,
/// whether the scope ends normally, by an early return or through `?`.
pub struct MoveGuard<'a> {
    position: &'a mut Position,
    record: MoveRecord,
}

impl<'a> MoveGuard<'a> {
    pub fn apply(position: &'a mut Position, pos: Pos, player: Stone) -> Self {
        let record = position.apply_move(pos, player);
        Self { position, record }
    }

    #[inline]
    pub fn record(&self) -> &MoveRecord {
        &self.record
    }
}

impl Deref for MoveGuard<'_> {
    type Target = Position;

    fn deref(&self) -> &Position {
        self.position
    }
}

impl DerefMut for MoveGuard<'_> {
    fn deref_mut(&mut self) -> &mut Position {
        self.position
    }
}

impl Drop for MoveGuard<'_> {
    fn drop(&mut self) {
        self.position.undo_move(self.record);
    }
}
