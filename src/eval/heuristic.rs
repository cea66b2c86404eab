//! Heuristic evaluation of board positions
//!
//! The evaluation from `player`'s point of view is, in integer score units:
//!
//! ```text
//! SCALE * (own patterns + capture_score * own pairs)
//!   - opponent_weight * (opponent patterns + capture_score * opponent pairs)
//!   - SCALE * tier(opponent pairs) * own capturable pairs
//! ```
//!
//! `SCALE` is 1000 and `opponent_weight` is in thousandths, so the default
//! weight of 1100 reads as "opponent counts 1.1x". Every term is a sum over
//! full board lines, which is what makes [`DeltaProbe`] exact: a move only
//! changes the lines through the placed stone and through captured stones.

use std::ops::{Add, AddAssign, Sub};

use crate::board::{Board, LineCode, LineId, Pos, Stone};
use crate::config::HeuristicConfig;
use crate::rules::capture::MAX_CAPTURED_STONES;
use crate::rules::{find_captures, MoveGuard, Position};

use super::patterns::{count_vulnerable_pairs, match_line, PatternKind};

/// Points to score units.
pub const SCALE: i64 = 1_000;

/// Lines a single move can touch: 4 through the stone, 3 more per capture.
const MAX_PROBE_LINES: usize = 4 + 3 * MAX_CAPTURED_STONES;

/// Raw terms of one line, before weighting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineTerms {
    /// Own pattern points
    pub own: i64,
    /// Opponent pattern points
    pub opp: i64,
    /// Own capturable pairs
    pub vulnerable: i64,
}

impl Add for LineTerms {
    type Output = LineTerms;

    fn add(self, rhs: LineTerms) -> LineTerms {
        LineTerms {
            own: self.own + rhs.own,
            opp: self.opp + rhs.opp,
            vulnerable: self.vulnerable + rhs.vulnerable,
        }
    }
}

impl AddAssign for LineTerms {
    fn add_assign(&mut self, rhs: LineTerms) {
        *self = *self + rhs;
    }
}

impl Sub for LineTerms {
    type Output = LineTerms;

    fn sub(self, rhs: LineTerms) -> LineTerms {
        LineTerms {
            own: self.own - rhs.own,
            opp: self.opp - rhs.opp,
            vulnerable: self.vulnerable - rhs.vulnerable,
        }
    }
}

/// Change in evaluation caused by one move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreDelta {
    /// Lines through the placed stone
    pub placement: i64,
    /// Everything a capture adds: lines through removed stones, pair
    /// counts, and the vulnerability tier change
    pub captures: i64,
}

impl ScoreDelta {
    #[inline]
    pub fn total(&self) -> i64 {
        self.placement + self.captures
    }
}

/// Pattern-based evaluator built from [`HeuristicConfig`].
#[derive(Debug, Clone)]
pub struct Evaluator {
    weights: [i64; PatternKind::COUNT],
    capture_score: i64,
    opponent_weight: i64,
    tiers: Vec<i64>,
    win_score: i64,
    pending_win_score: i64,
}

impl Evaluator {
    pub fn new(config: &HeuristicConfig) -> Self {
        let scores = &config.scores;
        Self {
            weights: PatternKind::ALL.map(|k| k.weight(scores)),
            capture_score: scores.capture_score,
            opponent_weight: config.opponent_weight_permille,
            tiers: config.capture_defense.vulnerability_tiers.clone(),
            win_score: scores.win_score * SCALE,
            pending_win_score: scores.pending_win_score * SCALE,
        }
    }

    /// Capture win or confirmed five, in score units.
    #[inline]
    pub fn win_score(&self) -> i64 {
        self.win_score
    }

    /// A five still open to a breaking capture, in score units.
    #[inline]
    pub fn pending_win_score(&self) -> i64 {
        self.pending_win_score
    }

    /// Opponent weight, in thousandths.
    #[inline]
    pub fn opponent_weight(&self) -> i64 {
        self.opponent_weight
    }

    /// Pattern points of one line, seen from `perspective`.
    pub fn line_terms(&self, board: &Board, line: LineId, perspective: Stone) -> LineTerms {
        let code = LineCode::read(board, line, perspective);
        if !code.has_stones() {
            return LineTerms::default();
        }
        LineTerms {
            own: match_line(code).score(&self.weights),
            opp: match_line(code.swapped()).score(&self.weights),
            vulnerable: count_vulnerable_pairs(code) as i64,
        }
    }

    /// Penalty per capturable pair when the opponent holds `opp_pairs`.
    #[inline]
    pub fn tier(&self, opp_pairs: u8) -> i64 {
        let last = self.tiers.len().saturating_sub(1);
        self.tiers
            .get((opp_pairs as usize).min(last))
            .copied()
            .unwrap_or(0)
    }

    #[inline]
    fn combine(&self, t: LineTerms, tier: i64) -> i64 {
        SCALE * t.own - self.opponent_weight * t.opp - SCALE * tier * t.vulnerable
    }

    #[inline]
    fn capture_terms(&self, board: &Board, perspective: Stone) -> i64 {
        let own = board.captures(perspective) as i64;
        let opp = board.captures(perspective.opponent()) as i64;
        self.capture_score * (SCALE * own - self.opponent_weight * opp)
    }

    /// Weighted score of the 4 lines through `pos`, seen from `player`.
    pub fn score_lines_at(&self, board: &Board, pos: Pos, player: Stone) -> i64 {
        let tier = self.tier(board.captures(player.opponent()));
        LineId::all_through(pos, board.size())
            .into_iter()
            .map(|line| self.combine(self.line_terms(board, line, player), tier))
            .sum()
    }

    /// Whole-board evaluation from `player`'s point of view.
    ///
    /// Purely heuristic: a five or a capture win on the board is scored by
    /// its patterns and pair counts, not as a terminal state.
    #[must_use]
    pub fn evaluate_board(&self, board: &Board, player: Stone) -> i64 {
        let tier = self.tier(board.captures(player.opponent()));
        let lines: i64 = LineId::all(board.size())
            .map(|line| self.combine(self.line_terms(board, line, player), tier))
            .sum();
        lines + self.capture_terms(board, player)
    }

    /// Own pairs the opponent could capture next move.
    pub fn vulnerable_pairs(&self, board: &Board, player: Stone) -> i64 {
        LineId::all(board.size())
            .map(|line| count_vulnerable_pairs(LineCode::read(board, line, player)) as i64)
            .sum()
    }

    /// Current vulnerability penalty of `player`, in score units.
    pub fn vulnerability_penalty(&self, board: &Board, player: Stone) -> i64 {
        SCALE * self.tier(board.captures(player.opponent())) * self.vulnerable_pairs(board, player)
    }

    /// Start measuring the effect of `mover` playing `pos`. Call before the
    /// move is applied, then [`DeltaProbe::finish`] after.
    pub fn probe(&self, board: &Board, pos: Pos, mover: Stone, perspective: Stone) -> DeltaProbe<'_> {
        let size = board.size();
        let captured = find_captures(board, pos, mover);
        let mut lines = [LineId { dir: 0, index: 0 }; MAX_PROBE_LINES];
        let mut len = 0;
        for line in LineId::all_through(pos, size) {
            lines[len] = line;
            len += 1;
        }
        for &p in captured.as_slice() {
            for line in LineId::all_through(p, size) {
                if !lines[..len].contains(&line) {
                    lines[len] = line;
                    len += 1;
                }
            }
        }

        let mut before = [LineTerms::default(); MAX_PROBE_LINES];
        for (slot, &line) in before.iter_mut().zip(&lines[..len]) {
            *slot = self.line_terms(board, line, perspective);
        }

        DeltaProbe {
            evaluator: self,
            perspective,
            mover,
            lines,
            before,
            len: len as u8,
            captured_pairs: captured.pairs(),
            tier_before: self.tier(board.captures(perspective.opponent())),
        }
    }

    /// Evaluation change of `mover` playing `pos`, seen from `perspective`.
    /// The position is left unchanged.
    pub fn delta_score_at(
        &self,
        position: &mut Position,
        pos: Pos,
        mover: Stone,
        perspective: Stone,
    ) -> ScoreDelta {
        let probe = self.probe(position.board(), pos, mover, perspective);
        let guard = MoveGuard::apply(position, pos, mover);
        probe.finish(guard.board())
    }
}

/// Line scores captured before a move, to be completed after it.
pub struct DeltaProbe<'e> {
    evaluator: &'e Evaluator,
    perspective: Stone,
    mover: Stone,
    lines: [LineId; MAX_PROBE_LINES],
    before: [LineTerms; MAX_PROBE_LINES],
    len: u8,
    captured_pairs: u8,
    tier_before: i64,
}

impl DeltaProbe<'_> {
    /// Pairs the move captures.
    #[inline]
    pub fn captured_pairs(&self) -> u8 {
        self.captured_pairs
    }

    /// Change in pattern points on the lines through the placed stone, as
    /// (own, opponent) from the probe's perspective.
    pub fn pattern_gain(&self, board: &Board) -> (i64, i64) {
        let ev = self.evaluator;
        self.lines[..4]
            .iter()
            .zip(&self.before[..4])
            .map(|(&line, &before)| ev.line_terms(board, line, self.perspective) - before)
            .fold((0, 0), |(own, opp), d| (own + d.own, opp + d.opp))
    }

    /// Complete the measurement on the board after the move.
    pub fn finish(&self, board: &Board) -> ScoreDelta {
        let ev = self.evaluator;
        let len = self.len as usize;
        let diff = |i: usize| ev.line_terms(board, self.lines[i], self.perspective) - self.before[i];

        let mut placed = LineTerms::default();
        for i in 0..4 {
            placed += diff(i);
        }
        let mut removed = LineTerms::default();
        for i in 4..len {
            removed += diff(i);
        }

        let mut captures = ev.combine(removed, self.tier_before);
        if self.captured_pairs > 0 {
            let pairs = self.captured_pairs as i64;
            captures += if self.mover == self.perspective {
                SCALE * ev.capture_score * pairs
            } else {
                -ev.opponent_weight * ev.capture_score * pairs
            };
            let tier_after = ev.tier(board.captures(self.perspective.opponent()));
            if tier_after != self.tier_before {
                let vulnerable = ev.vulnerable_pairs(board, self.perspective);
                captures -= SCALE * (tier_after - self.tier_before) * vulnerable;
            }
        }

        ScoreDelta {
            placement: ev.combine(placed, self.tier_before),
            captures,
        }
    }
}
