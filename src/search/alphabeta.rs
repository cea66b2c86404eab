//! Alpha-Beta search with iterative deepening and transposition table
//!
//! Plain minimax over a single mutable [`Position`]: every child is entered
//! through a [`MoveGuard`], so the position is restored on every exit path,
//! including a deadline abort unwinding through `?`.
//!
//! Scores are always from the root player's point of view. A leaf returns the
//! running evaluation, kept up to date by adding each move's delta instead of
//! re-evaluating the board.
//!
//! # Features
//!
//! - Iterative deepening; only fully completed depths count
//! - Transposition table keyed by (hash, captures, side to move)
//! - Killer moves and late-move reductions (both configurable)
//! - Capture wins scored above confirmed fives, and fives the opponent can
//!   still break treated as ordinary positions
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use gomoku::board::{Pos, Stone};
//! use gomoku::config::EngineConfig;
//! use gomoku::eval::Evaluator;
//! use gomoku::rules::Position;
//! use gomoku::search::{NullObserver, Searcher};
//!
//! let mut config = EngineConfig::default();
//! config.search.max_depth = 2;
//! let evaluator = Evaluator::new(&config.heuristic);
//! let mut searcher = Searcher::new(&evaluator, &config.search);
//!
//! let mut position = Position::new(15, 5);
//! position.apply_move(Pos::new(7, 7), Stone::Black);
//! let result = searcher.iterative_deepening(
//!     &mut position,
//!     Stone::White,
//!     Duration::from_millis(200),
//!     &mut NullObserver,
//! );
//! assert!(result.best_move.is_some());
//! ```

use std::time::{Duration, Instant};

use crate::board::{Pos, Stone};
use crate::config::{SearchConfig, MAX_SEARCH_DEPTH};
use crate::eval::Evaluator;
use crate::rules::{can_break_line, GameStatus, MoveGuard, Position, WinKind};

use super::movegen::{MoveBucket, MoveOrderer, OrderHints, OrderedMove};
use super::observer::{DepthReport, SearchObserver};
use super::tt::{Bound, TranspositionTable, TtKey};

/// Bound for the alpha-beta window
const INF: i64 = i64::MAX / 4;

/// Leaves between deadline checks. Interior nodes check before ordering.
const TIME_CHECK_MASK: u64 = 1023;

/// Deepest ply a search can reach
const MAX_PLY: i64 = MAX_SEARCH_DEPTH as i64 + 1;

const KILLER_PLIES: usize = MAX_SEARCH_DEPTH as usize + 1;

/// The deadline expired mid-depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SearchAborted;

/// Search statistics for diagnostics and tuning.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    /// Total beta cutoffs
    pub beta_cutoffs: u64,
    /// Cutoffs on the first move tried (measures move ordering quality)
    pub first_move_cutoffs: u64,
    pub tt_probes: u64,
    /// Probes that returned a usable score
    pub tt_score_hits: u64,
    pub lmr_researches: u64,
    /// Transposition table fill at the end of the search
    pub tt_usage_percent: u8,
}

impl SearchStats {
    /// First-move cutoff rate, in percent
    pub fn first_move_rate(&self) -> f64 {
        if self.beta_cutoffs == 0 {
            0.0
        } else {
            self.first_move_cutoffs as f64 / self.beta_cutoffs as f64 * 100.0
        }
    }

    /// TT score hit rate, in percent
    pub fn tt_score_rate(&self) -> f64 {
        if self.tt_probes == 0 {
            0.0
        } else {
            self.tt_score_hits as f64 / self.tt_probes as f64 * 100.0
        }
    }
}

/// Best move of the deepest completed depth.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub best_move: Option<Pos>,
    /// Root player's score for `best_move`
    pub score: i64,
    /// Deepest fully completed depth
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
    pub stats: SearchStats,
}

/// Per-call search state. Create one per move decision: the transposition
/// table lives exactly as long as the searcher.
pub struct Searcher<'a> {
    evaluator: &'a Evaluator,
    config: &'a SearchConfig,
    tt: TranspositionTable,
    killers: [[Option<Pos>; 2]; KILLER_PLIES],
    root_player: Stone,
    nodes: u64,
    deadline: Instant,
    /// Depth 1 always runs to completion
    abortable: bool,
    stats: SearchStats,
}

impl<'a> Searcher<'a> {
    pub fn new(evaluator: &'a Evaluator, config: &'a SearchConfig) -> Self {
        Self {
            evaluator,
            config,
            tt: TranspositionTable::new(config.tt_size_mb),
            killers: [[None; 2]; KILLER_PLIES],
            root_player: Stone::Black,
            nodes: 0,
            deadline: Instant::now(),
            abortable: false,
            stats: SearchStats::default(),
        }
    }

    /// Search depths 1, 2, ... until the budget runs out, `max_depth` is
    /// reached, or a win or loss is proven.
    ///
    /// The position is left exactly as it was given.
    pub fn iterative_deepening(
        &mut self,
        position: &mut Position,
        player: Stone,
        budget: Duration,
        observer: &mut dyn SearchObserver,
    ) -> SearchResult {
        let start = Instant::now();
        self.deadline = start + budget;
        self.root_player = player;
        self.nodes = 0;

        let mut result = SearchResult {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
            stats: SearchStats::default(),
        };

        let max_depth = self.config.max_depth.clamp(1, MAX_SEARCH_DEPTH);
        for depth in 1..=max_depth {
            self.abortable = depth > 1;
            match self.search_root(position, depth, result.best_move, observer) {
                Ok((best_move, score)) => {
                    result.best_move = best_move;
                    result.score = score;
                    result.depth = depth;
                }
                Err(SearchAborted) => {
                    observer.depth_aborted(depth, self.nodes);
                    break;
                }
            }

            let report = DepthReport {
                depth,
                best_move: result.best_move,
                score: result.score,
                nodes: self.nodes,
                elapsed: start.elapsed(),
            };
            observer.depth_completed(&report);

            if result.best_move.is_none() {
                break;
            }
            if self.is_proven(result.score) {
                observer.proven_result(&report);
                break;
            }
            if Instant::now() >= self.deadline {
                break;
            }
        }

        result.nodes = self.nodes;
        result.elapsed = start.elapsed();
        self.stats.tt_usage_percent = self.tt.stats().usage_percent;
        result.stats = self.stats.clone();
        observer.search_finished(&DepthReport {
            depth: result.depth,
            best_move: result.best_move,
            score: result.score,
            nodes: result.nodes,
            elapsed: result.elapsed,
        });
        result
    }

    /// Lowest magnitude of a terminal score.
    #[inline]
    fn win_threshold(&self) -> i64 {
        let ev = self.evaluator;
        ev.win_score() - ev.pending_win_score() - MAX_PLY
    }

    /// Forced win or loss within the search horizon.
    fn is_proven(&self, score: i64) -> bool {
        score.abs() >= self.win_threshold()
    }

    /// Terminal scores count plies from the root; the table stores them
    /// counted from the node so they stay valid at any ply.
    #[inline]
    fn to_tt_score(&self, score: i64, ply: usize) -> i64 {
        let threshold = self.win_threshold();
        if score >= threshold {
            score + ply as i64
        } else if score <= -threshold {
            score - ply as i64
        } else {
            score
        }
    }

    #[inline]
    fn from_tt_score(&self, score: i64, ply: usize) -> i64 {
        let threshold = self.win_threshold();
        if score >= threshold {
            score - ply as i64
        } else if score <= -threshold {
            score + ply as i64
        } else {
            score
        }
    }

    #[inline]
    fn side(&self, maximizing: bool) -> Stone {
        if maximizing {
            self.root_player
        } else {
            self.root_player.opponent()
        }
    }

    #[inline]
    fn killers_at(&self, ply: usize) -> [Option<Pos>; 2] {
        self.killers.get(ply).copied().unwrap_or([None; 2])
    }

    fn store_killer(&mut self, ply: usize, pos: Pos) {
        if let Some(slot) = self.killers.get_mut(ply) {
            if slot[0] != Some(pos) {
                slot[1] = slot[0];
                slot[0] = Some(pos);
            }
        }
    }

    /// Root search with a full window. The previous depth's best move is
    /// tried first.
    fn search_root(
        &mut self,
        position: &mut Position,
        depth: u8,
        prev_best: Option<Pos>,
        observer: &mut dyn SearchObserver,
    ) -> Result<(Option<Pos>, i64), SearchAborted> {
        let player = self.root_player;
        let hints = OrderHints {
            tt_move: prev_best,
            killers: self.killers_at(0),
            cap: self.config.move_caps.root,
        };
        let moves = MoveOrderer::new(self.evaluator, self.config).order_moves(position, player, &hints);
        observer.root_ordered(depth, &moves);

        let running = self.evaluator.evaluate_board(position.board(), player);
        let mut alpha = -INF;
        let mut best_move = None;
        let mut best_score = -INF;

        for m in &moves {
            let score = self.search_child(position, m, player, depth, 0, alpha, INF, running, false)?;
            if score > best_score {
                best_score = score;
                best_move = Some(m.pos);
            }
            alpha = alpha.max(score);
        }

        if let Some(pos) = best_move {
            let key = self.key(position, player);
            self.tt.store(key, depth, best_score, Bound::Exact, Some(pos));
        }
        Ok((best_move, best_score))
    }

    #[inline]
    fn key(&self, position: &Position, side: Stone) -> TtKey {
        TtKey::new(position.hash(), position.board().capture_counts(), side)
    }

    /// Apply `m` for `side`, score the child, undo.
    #[allow(clippy::too_many_arguments)]
    fn search_child(
        &mut self,
        position: &mut Position,
        m: &OrderedMove,
        side: Stone,
        depth: u8,
        ply: usize,
        alpha: i64,
        beta: i64,
        running: i64,
        reduce: bool,
    ) -> Result<i64, SearchAborted> {
        let maximizing = side == self.root_player;
        let evaluator = self.evaluator;
        let probe = evaluator.probe(position.board(), m.pos, side, self.root_player);
        let mut child = MoveGuard::apply(position, m.pos, side);
        let running = running + probe.finish(child.board()).total();

        if let Some(score) = self.terminal_score(&child, m.pos, side, ply + 1) {
            return Ok(score);
        }

        if reduce {
            let score = self.minimax(&mut child, depth.saturating_sub(2), ply + 1, alpha, beta, !maximizing, running)?;
            let improves = if maximizing { score > alpha } else { score < beta };
            if !improves {
                return Ok(score);
            }
            self.stats.lmr_researches += 1;
        }
        self.minimax(&mut child, depth - 1, ply + 1, alpha, beta, !maximizing, running)
    }

    /// Score of a position that ends the game, from the root player's side.
    ///
    /// A capture win outranks a five the opponent can no longer break; a five
    /// that can still be broken is not terminal.
    fn terminal_score(&self, position: &Position, pos: Pos, mover: Stone, ply: usize) -> Option<i64> {
        if !position.check_terminal(pos, mover) {
            return None;
        }
        let ev = self.evaluator;
        let (winner, value) = match position.status() {
            GameStatus::Won { winner, by: WinKind::Captures } => (winner, ev.win_score()),
            GameStatus::Won { winner, by: WinKind::Line } => {
                (winner, ev.win_score() - ev.pending_win_score())
            }
            GameStatus::PendingWin(pw) => {
                let breaker = pw.player.opponent();
                if can_break_line(position.board(), pw.line, breaker, position.capture_win_pairs()) {
                    return None;
                }
                (pw.player, ev.win_score() - ev.pending_win_score())
            }
            GameStatus::Ongoing => return None,
        };
        let value = value - ply as i64;
        Some(if winner == self.root_player { value } else { -value })
    }

    #[allow(clippy::too_many_arguments)]
    fn minimax(
        &mut self,
        position: &mut Position,
        depth: u8,
        ply: usize,
        mut alpha: i64,
        mut beta: i64,
        maximizing: bool,
        running: i64,
    ) -> Result<i64, SearchAborted> {
        self.nodes += 1;
        if self.abortable && self.nodes & TIME_CHECK_MASK == 0 && Instant::now() >= self.deadline {
            return Err(SearchAborted);
        }
        if depth == 0 {
            return Ok(running);
        }

        let side = self.side(maximizing);
        let key = self.key(position, side);
        self.stats.tt_probes += 1;
        let window = (self.to_tt_score(alpha, ply), self.to_tt_score(beta, ply));
        if let Some(score) = self.tt.probe(key, depth, window.0, window.1) {
            self.stats.tt_score_hits += 1;
            return Ok(self.from_tt_score(score, ply));
        }
        if self.abortable && Instant::now() >= self.deadline {
            return Err(SearchAborted);
        }

        let (alpha_orig, beta_orig) = (alpha, beta);
        let hints = OrderHints {
            tt_move: self.tt.best_move(key),
            killers: if self.config.killer_moves {
                self.killers_at(ply)
            } else {
                [None; 2]
            },
            cap: self
                .config
                .move_caps
                .for_stones(position.board().stone_count()),
        };
        let moves = MoveOrderer::new(self.evaluator, self.config).order_moves(position, side, &hints);
        if moves.is_empty() {
            return Ok(running);
        }

        let mut best = if maximizing { -INF } else { INF };
        let mut best_move = None;
        for (i, m) in moves.iter().enumerate() {
            let reduce = self.config.late_move_reductions
                && depth >= self.config.lmr_min_depth
                && i >= self.config.lmr_after_moves
                && m.bucket >= MoveBucket::Medium;
            let score = self.search_child(position, m, side, depth, ply, alpha, beta, running, reduce)?;

            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(m.pos);
                }
                alpha = alpha.max(score);
            } else {
                if score < best {
                    best = score;
                    best_move = Some(m.pos);
                }
                beta = beta.min(score);
            }

            if beta <= alpha {
                self.stats.beta_cutoffs += 1;
                if i == 0 {
                    self.stats.first_move_cutoffs += 1;
                }
                if self.config.killer_moves && m.bucket > MoveBucket::Blocking {
                    self.store_killer(ply, m.pos);
                }
                break;
            }
        }

        let bound = if best <= alpha_orig {
            Bound::UpperBound
        } else if best >= beta_orig {
            Bound::LowerBound
        } else {
            Bound::Exact
        };
        let stored = self.to_tt_score(best, ply);
        self.tt.store(key, depth, stored, bound, best_move);
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Board;
    use crate::config::EngineConfig;
    use crate::search::NullObserver;

    fn config(depth: u8) -> EngineConfig {
        let mut config = EngineConfig::default();
        config.search.max_depth = depth;
        config.search.tt_size_mb = 1;
        config
    }

    fn position_with(size: usize, black: &[(u8, u8)], white: &[(u8, u8)]) -> Position {
        let mut board = Board::with_size(size);
        for &(r, c) in black {
            board.place_stone(Pos::new(r, c), Stone::Black);
        }
        for &(r, c) in white {
            board.place_stone(Pos::new(r, c), Stone::White);
        }
        Position::from_board(board, 5)
    }

    fn search(position: &mut Position, player: Stone, depth: u8) -> SearchResult {
        let config = config(depth);
        let evaluator = Evaluator::new(&config.heuristic);
        let mut searcher = Searcher::new(&evaluator, &config.search);
        searcher.iterative_deepening(position, player, Duration::from_secs(30), &mut NullObserver)
    }

    #[test]
    fn test_takes_immediate_five() {
        let mut pos = position_with(15, &[(7, 3), (7, 4), (7, 5), (7, 6)], &[(8, 4), (8, 5), (6, 6)]);
        let result = search(&mut pos, Stone::Black, 3);
        let m = result.best_move.expect("move");
        assert!(m == Pos::new(7, 2) || m == Pos::new(7, 7), "got {}", m);
        assert!(result.score > 0);
    }

    #[test]
    fn test_blocks_open_four() {
        let mut pos = position_with(15, &[(7, 5), (7, 6), (7, 7), (7, 8)], &[(8, 6), (6, 7)]);
        let result = search(&mut pos, Stone::White, 2);
        let m = result.best_move.expect("move");
        assert!(m == Pos::new(7, 4) || m == Pos::new(7, 9), "got {}", m);
    }

    #[test]
    fn test_position_restored() {
        let mut pos = position_with(15, &[(7, 7), (8, 8), (6, 8)], &[(7, 8), (8, 7)]);
        let before = (*pos.board(), pos.hash(), pos.status());
        search(&mut pos, Stone::Black, 3);
        assert_eq!((*pos.board(), pos.hash(), pos.status()), before);
    }

    #[test]
    fn test_depth_one_completes_with_zero_budget() {
        let config = config(6);
        let evaluator = Evaluator::new(&config.heuristic);
        let mut searcher = Searcher::new(&evaluator, &config.search);
        let mut pos = position_with(19, &[(9, 9)], &[(9, 10)]);
        let before = *pos.board();

        let result = searcher.iterative_deepening(&mut pos, Stone::Black, Duration::ZERO, &mut NullObserver);
        assert!(result.best_move.is_some());
        assert_eq!(result.depth, 1);
        assert_eq!(*pos.board(), before);
    }

    #[test]
    fn test_capture_win_is_terminal_and_preferred() {
        let mut pos = position_with(19, &[(3, 3), (3, 4), (3, 5), (3, 6), (9, 5)], &[(9, 6), (9, 7)]);
        let mut board = *pos.board();
        board.black_captures = 4;
        pos = Position::from_board(board, 5);

        let result = search(&mut pos, Stone::Black, 2);
        assert_eq!(result.best_move, Some(Pos::new(9, 8)));
        let evaluator = Evaluator::new(&EngineConfig::default().heuristic);
        assert_eq!(result.score, evaluator.win_score() - 1);
    }

    #[test]
    fn test_win_distance_relative_to_node_in_table() {
        let config = config(4);
        let evaluator = Evaluator::new(&config.heuristic);
        let searcher = Searcher::new(&evaluator, &config.search);
        let line_win = evaluator.win_score() - evaluator.pending_win_score();

        // Win two plies below a node at ply 3, reused at ply 5
        let stored = searcher.to_tt_score(line_win - 5, 3);
        assert_eq!(stored, line_win - 2);
        assert_eq!(searcher.from_tt_score(stored, 5), line_win - 7);
        assert_eq!(searcher.from_tt_score(searcher.to_tt_score(-(line_win - 5), 3), 5), -(line_win - 7));

        // Heuristic scores pass through unchanged
        assert_eq!(searcher.to_tt_score(12_345, 4), 12_345);
        assert_eq!(searcher.from_tt_score(-12_345, 4), -12_345);
    }

    #[test]
    fn test_midgame_search_respects_budget() {
        let mut config = config(10);
        config.search.tt_size_mb = 4;
        let evaluator = Evaluator::new(&config.heuristic);
        let mut searcher = Searcher::new(&evaluator, &config.search);
        let mut pos = position_with(
            19,
            &[(9, 9), (10, 10), (10, 9), (11, 9), (12, 9), (11, 11)],
            &[(9, 10), (8, 8), (10, 8), (8, 9), (13, 9), (12, 12)],
        );

        let budget = Duration::from_millis(400);
        let result = searcher.iterative_deepening(&mut pos, Stone::Black, budget, &mut NullObserver);
        assert!(result.best_move.is_some());
        assert!(
            result.elapsed < budget * 3 / 2,
            "elapsed {:?} at depth {}",
            result.elapsed,
            result.depth
        );
    }

    #[test]
    fn test_stats_first_move_rate() {
        let stats = SearchStats {
            beta_cutoffs: 10,
            first_move_cutoffs: 9,
            ..SearchStats::default()
        };
        assert!((stats.first_move_rate() - 90.0).abs() < 1e-9);
        assert_eq!(SearchStats::default().tt_score_rate(), 0.0);
    }
}
