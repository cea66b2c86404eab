//! Main AI engine integrating all search components
//!
//! [`AiEngine`] holds the validated configuration and the evaluator built
//! from it. Each move decision runs a fresh [`Searcher`], so nothing but the
//! host's [`Position`] survives between calls.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use gomoku::{AiEngine, EngineConfig, Pos, Stone};
//!
//! let mut config = EngineConfig::default();
//! config.game.board_size = 15;
//! config.search.max_depth = 3;
//! let engine = AiEngine::new(config).expect("valid config");
//!
//! let mut position = engine.new_game();
//! position.play(Pos::new(7, 7), Stone::Black).expect("legal");
//!
//! let decision = engine.get_best_move(&mut position, Stone::White, Duration::from_millis(300));
//! let reply = decision.best_move.expect("a move");
//! assert!(engine.is_legal_move(&position, reply, Stone::White).is_ok());
//! ```

use std::time::Duration;

use crate::board::{Pos, Stone};
use crate::config::EngineConfig;
use crate::error::{ConfigError, IllegalMove};
use crate::eval::Evaluator;
use crate::rules::Position;
use crate::search::{LogObserver, SearchObserver, Searcher};

/// Outcome of one move decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveDecision {
    /// `None` only when the game is over or no legal move exists
    pub best_move: Option<Pos>,
    /// Score for the deciding player, in evaluator units
    pub score: i64,
    /// Deepest fully completed search depth
    pub depth: u8,
    pub nodes: u64,
    pub elapsed: Duration,
}

impl MoveDecision {
    fn none() -> Self {
        Self {
            best_move: None,
            score: 0,
            depth: 0,
            nodes: 0,
            elapsed: Duration::ZERO,
        }
    }
}

pub struct AiEngine {
    config: EngineConfig,
    evaluator: Evaluator,
}

impl AiEngine {
    /// Build an engine from a configuration, rejecting invalid values.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let evaluator = Evaluator::new(&config.heuristic);
        Self { config, evaluator }
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[inline]
    pub fn evaluator(&self) -> &Evaluator {
        &self.evaluator
    }

    /// Configured time per move.
    pub fn time_budget(&self) -> Duration {
        Duration::from_millis(self.config.search.time_limit_ms)
    }

    /// Empty position with the configured board size and capture threshold.
    pub fn new_game(&self) -> Position {
        Position::new(self.config.game.board_size, self.config.game.capture_win_pairs)
    }

    /// Rules check for a host move.
    pub fn is_legal_move(&self, position: &Position, pos: Pos, player: Stone) -> Result<(), IllegalMove> {
        position.is_legal(pos, player)
    }

    /// Static evaluation of the position for `player`.
    #[must_use]
    pub fn evaluate(&self, position: &Position, player: Stone) -> i64 {
        self.evaluator.evaluate_board(position.board(), player)
    }

    /// Best move for `player` within `time_budget`, reporting through the
    /// `log` facade.
    pub fn get_best_move(&self, position: &mut Position, player: Stone, time_budget: Duration) -> MoveDecision {
        let mut observer = LogObserver::new(self.config.diagnostics.clone());
        self.get_best_move_with(position, player, time_budget, &mut observer)
    }

    /// Best move for `player` within `time_budget`.
    ///
    /// The position is searched in place and handed back unchanged.
    pub fn get_best_move_with(
        &self,
        position: &mut Position,
        player: Stone,
        time_budget: Duration,
        observer: &mut dyn SearchObserver,
    ) -> MoveDecision {
        if position.status().is_over() {
            log::warn!("get_best_move called on a finished game");
            return MoveDecision::none();
        }

        let mut searcher = Searcher::new(&self.evaluator, &self.config.search);
        let result = searcher.iterative_deepening(position, player, time_budget, observer);
        log::debug!(
            "{} nodes, first-move cutoffs {:.1}%, tt hits {:.1}%, tt {}% full",
            result.nodes,
            result.stats.first_move_rate(),
            result.stats.tt_score_rate(),
            result.stats.tt_usage_percent
        );

        MoveDecision {
            best_move: result.best_move,
            score: result.score,
            depth: result.depth,
            nodes: result.nodes,
            elapsed: result.elapsed,
        }
    }
}

impl Default for AiEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::GameStatus;
    use crate::search::NullObserver;

    fn engine(size: usize, depth: u8) -> AiEngine {
        let mut config = EngineConfig::default();
        config.game.board_size = size;
        config.search.max_depth = depth;
        config.search.tt_size_mb = 1;
        AiEngine::new(config).expect("valid config")
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = EngineConfig::default();
        config.search.max_depth = 0;
        assert!(matches!(AiEngine::new(config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_new_game_uses_config() {
        let engine = engine(15, 2);
        let position = engine.new_game();
        assert_eq!(position.board().size(), 15);
        assert_eq!(position.capture_win_pairs(), 5);
        assert_eq!(position.status(), GameStatus::Ongoing);
    }

    #[test]
    fn test_first_move_is_center() {
        let engine = engine(15, 3);
        let mut position = engine.new_game();
        let decision = engine.get_best_move_with(
            &mut position,
            Stone::Black,
            Duration::from_millis(500),
            &mut NullObserver,
        );
        assert_eq!(decision.best_move, Some(Pos::new(7, 7)));
        assert!(position.board().is_board_empty());
    }

    #[test]
    fn test_no_move_on_finished_game() {
        let engine = engine(19, 2);
        let mut position = engine.new_game();
        for c in 0..5 {
            position.apply_move(Pos::new(0, c), Stone::Black);
        }
        position.apply_move(Pos::new(18, 18), Stone::White);
        assert!(position.status().is_over());

        let decision = engine.get_best_move(&mut position, Stone::White, Duration::from_millis(50));
        assert_eq!(decision, MoveDecision::none());
    }

    #[test]
    fn test_is_legal_move_delegates() {
        let engine = AiEngine::default();
        let mut position = engine.new_game();
        position.apply_move(Pos::new(9, 9), Stone::Black);
        assert_eq!(
            engine.is_legal_move(&position, Pos::new(9, 9), Stone::White),
            Err(IllegalMove::Occupied(Pos::new(9, 9)))
        );
        assert_eq!(engine.is_legal_move(&position, Pos::new(9, 10), Stone::White), Ok(()));
    }
}
