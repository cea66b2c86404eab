//! Candidate generation and move ordering
//!
//! Every candidate is tried twice on the live position: once as the mover's
//! stone and once as the opponent's, each a separate apply/undo. The first
//! says what the move builds (including any captures it makes), the second
//! what it takes away from the opponent. Moves are then bucketed:
//!
//! 1. Winning: completes a five or reaches the capture threshold
//! 2. Blocking: the opponent would win here, or the move breaks their
//!    pending five
//! 3. High / Medium / Low by combined strength
//!
//! Winning and Blocking moves are never cut by the per-node cap.

use crate::board::{Bitboard, Board, Pos, Stone};
use crate::config::SearchConfig;
use crate::eval::{Evaluator, SCALE};
use crate::rules::{creates_double_three, five_line_at, MoveGuard, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MoveBucket {
    Winning,
    Blocking,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderedMove {
    pub pos: Pos,
    pub bucket: MoveBucket,
    /// Own gain plus weighted opponent gain, in score units
    pub strength: i64,
}

/// Moves to try first within their bucket, and how many moves to keep.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderHints {
    /// Best move from the transposition table or the previous iteration
    pub tt_move: Option<Pos>,
    pub killers: [Option<Pos>; 2],
    /// Maximum moves outside the Winning and Blocking buckets
    pub cap: usize,
}

impl OrderHints {
    fn rank(&self, pos: Pos) -> u8 {
        if self.tt_move == Some(pos) {
            0
        } else if self.killers[0] == Some(pos) {
            1
        } else if self.killers[1] == Some(pos) {
            2
        } else {
            3
        }
    }
}

/// Empty cells within `range` of any stone, in board order.
///
/// An empty board yields only the centre.
pub fn relevant_candidates(board: &Board, range: u8) -> Vec<Pos> {
    if board.is_board_empty() {
        return vec![board.center()];
    }
    let range = range as i32;
    let mut near = Bitboard::new();
    for stone in board.occupied() {
        for dr in -range..=range {
            for dc in -range..=range {
                if let Some(p) = board.step(stone, dr, dc, 1) {
                    if board.is_empty(p) {
                        near.set(p);
                    }
                }
            }
        }
    }
    near.iter_ones().collect()
}

/// Outcome of one speculative placement.
#[derive(Debug, Clone, Copy, Default)]
struct Trial {
    gain: i64,
    five: bool,
    capture_win: bool,
}

pub struct MoveOrderer<'a> {
    evaluator: &'a Evaluator,
    config: &'a SearchConfig,
}

impl<'a> MoveOrderer<'a> {
    pub fn new(evaluator: &'a Evaluator, config: &'a SearchConfig) -> Self {
        Self { evaluator, config }
    }

    /// Legal candidates for `player`, best first.
    ///
    /// The position is restored before returning.
    pub fn order_moves(
        &self,
        position: &mut Position,
        player: Stone,
        hints: &OrderHints,
    ) -> Vec<OrderedMove> {
        let candidates = relevant_candidates(position.board(), self.config.relevance_range);
        let mut moves: Vec<OrderedMove> = candidates
            .into_iter()
            .filter_map(|pos| self.classify(position, pos, player))
            .collect();

        moves.sort_by_key(|m| (m.bucket, hints.rank(m.pos), std::cmp::Reverse(m.strength)));

        let forced = moves
            .iter()
            .take_while(|m| m.bucket <= MoveBucket::Blocking)
            .count();
        moves.truncate(hints.cap.max(forced));
        moves
    }

    /// Bucket and strength of `pos` for `player`, or `None` if the move is a
    /// forbidden double-three.
    pub fn classify(&self, position: &mut Position, pos: Pos, player: Stone) -> Option<OrderedMove> {
        let ev = self.evaluator;
        let opponent = player.opponent();
        let pending = position
            .status()
            .pending()
            .filter(|pw| pw.player == opponent);

        let (own, breaks_pending) = {
            let probe = ev.probe(position.board(), pos, player, player);
            let guard = MoveGuard::apply(position, pos, player);
            let captured = guard.record().captured;
            if creates_double_three(guard.board(), pos, player) {
                return None;
            }
            let breaks = pending.is_some_and(|pw| captured.as_slice().iter().any(|&p| pw.line.contains(p)));
            (self.trial(&guard, pos, player, probe.finish(guard.board()).total()), breaks)
        };

        let opp = {
            let probe = ev.probe(position.board(), pos, opponent, opponent);
            let guard = MoveGuard::apply(position, pos, opponent);
            if creates_double_three(guard.board(), pos, opponent) {
                Trial::default()
            } else {
                self.trial(&guard, pos, opponent, probe.finish(guard.board()).total())
            }
        };

        let mut strength = own.gain + ev.opponent_weight() * opp.gain / SCALE;
        if own.capture_win {
            strength += ev.win_score();
        } else if own.five {
            strength += ev.pending_win_score();
        }
        let blocking = opp.five || opp.capture_win || breaks_pending;
        if blocking {
            strength += ev.pending_win_score();
        }

        let bucket = if own.capture_win || own.five {
            MoveBucket::Winning
        } else if blocking {
            MoveBucket::Blocking
        } else if strength >= self.config.high_threshold * SCALE {
            MoveBucket::High
        } else if strength >= self.config.medium_threshold * SCALE {
            MoveBucket::Medium
        } else {
            MoveBucket::Low
        };

        Some(OrderedMove {
            pos,
            bucket,
            strength,
        })
    }

    fn trial(&self, position: &Position, pos: Pos, player: Stone, gain: i64) -> Trial {
        Trial {
            gain,
            five: five_line_at(position.board(), pos, player).is_some(),
            capture_win: position.captures(player) >= position.capture_win_pairs(),
        }
    }
}
