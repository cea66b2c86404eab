//! Engine tunables, loadable from JSON
//!
//! Every section uses `#[serde(default)]`, so a file only needs the keys it
//! changes. Pattern weights are in points; the evaluator scales them to
//! integer score units.

use std::path::Path;

use crate::board::{MAX_BOARD_SIZE, MIN_BOARD_SIZE};
use crate::error::ConfigError;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub game: GameConfig,
    pub heuristic: HeuristicConfig,
    pub search: SearchConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_size: usize,
    /// Captured pairs needed to win
    pub capture_win_pairs: u8,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: 19,
            capture_win_pairs: 5,
        }
    }
}

/// Score of each pattern, in points.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PatternWeights {
    /// Capture win, or a five the opponent can no longer break
    pub win_score: i64,
    /// A five still exposed to a breaking capture
    pub pending_win_score: i64,
    pub open_four: i64,
    pub broken_four: i64,
    pub closed_four: i64,
    pub open_three: i64,
    pub broken_three: i64,
    pub closed_three: i64,
    pub open_two: i64,
    pub closed_two: i64,
    /// Own stone flanking an opponent pair with the far end empty
    pub capture_threat: i64,
    /// Opponent pair with both ends empty
    pub capture_setup: i64,
    /// Per captured pair
    pub capture_score: i64,
}

impl Default for PatternWeights {
    fn default() -> Self {
        PatternWeights {
            win_score: 1_000_000_000,
            pending_win_score: 10_000_000,
            open_four: 1_000_000,
            broken_four: 400_000,
            closed_four: 300_000,
            open_three: 50_000,
            broken_three: 20_000,
            closed_three: 5_000,
            open_two: 1_000,
            closed_two: 200,
            capture_threat: 30_000,
            capture_setup: 2_000,
            capture_score: 60_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CaptureDefense {
    /// Penalty per own capturable pair, indexed by the opponent's captured
    /// pairs. The last entry applies to every higher count.
    pub vulnerability_tiers: Vec<i64>,
}

impl Default for CaptureDefense {
    fn default() -> Self {
        CaptureDefense {
            vulnerability_tiers: vec![2_000, 5_000, 15_000, 60_000, 2_000_000],
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct HeuristicConfig {
    pub scores: PatternWeights,
    /// Weight of the opponent's total, in thousandths (1100 = 1.1)
    pub opponent_weight_permille: i64,
    pub capture_defense: CaptureDefense,
}

impl Default for HeuristicConfig {
    fn default() -> Self {
        HeuristicConfig {
            scores: PatternWeights::default(),
            opponent_weight_permille: 1_100,
            capture_defense: CaptureDefense::default(),
        }
    }
}

/// Per-node move caps by game phase, keyed on stones on the board.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MoveCaps {
    /// At most this many stones: opening
    pub opening_stones: u32,
    /// At most this many stones: midgame, beyond: endgame
    pub midgame_stones: u32,
    pub root: usize,
    pub opening: usize,
    pub midgame: usize,
    pub endgame: usize,
}

impl Default for MoveCaps {
    fn default() -> Self {
        MoveCaps {
            opening_stones: 8,
            midgame_stones: 40,
            root: 20,
            opening: 12,
            midgame: 10,
            endgame: 8,
        }
    }
}

impl MoveCaps {
    /// Cap for an interior node with `stones` on the board.
    pub fn for_stones(&self, stones: u32) -> usize {
        if stones <= self.opening_stones {
            self.opening
        } else if stones <= self.midgame_stones {
            self.midgame
        } else {
            self.endgame
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub max_depth: u8,
    pub time_limit_ms: u64,
    /// Candidate radius around existing stones
    pub relevance_range: u8,
    pub move_caps: MoveCaps,
    /// Ordering strength (points) for the high bucket
    pub high_threshold: i64,
    /// Ordering strength (points) for the medium bucket
    pub medium_threshold: i64,
    pub late_move_reductions: bool,
    /// Remaining depth needed before a move may be reduced
    pub lmr_min_depth: u8,
    /// Moves searched at full depth before reductions start
    pub lmr_after_moves: usize,
    pub killer_moves: bool,
    pub tt_size_mb: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 10,
            time_limit_ms: 500,
            relevance_range: 2,
            move_caps: MoveCaps::default(),
            high_threshold: 40_000,
            medium_threshold: 3_000,
            late_move_reductions: true,
            lmr_min_depth: 3,
            lmr_after_moves: 4,
            killer_moves: true,
            tt_size_mb: 16,
        }
    }
}

/// Read-only switches for search diagnostics.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    pub log_depth_progress: bool,
    pub log_move_ordering: bool,
    pub log_terminal_states: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        DiagnosticsConfig {
            log_depth_progress: true,
            log_move_ordering: false,
            log_terminal_states: false,
        }
    }
}

/// Deepest search the killer table supports.
pub const MAX_SEARCH_DEPTH: u8 = 32;

impl EngineConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_json(&content)
    }

    /// Load configuration from a JSON file, falling back to defaults if the
    /// file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::warn!("config file '{}' not found, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let game = &self.game;
        if !(MIN_BOARD_SIZE..=MAX_BOARD_SIZE).contains(&game.board_size) {
            return Err(ConfigError::Validation(format!(
                "game.board_size must be in [{}, {}]",
                MIN_BOARD_SIZE, MAX_BOARD_SIZE
            )));
        }
        if game.capture_win_pairs == 0 {
            return Err(ConfigError::Validation(
                "game.capture_win_pairs must be > 0".into(),
            ));
        }

        let s = &self.heuristic.scores;
        let patterns = [
            s.open_four,
            s.broken_four,
            s.closed_four,
            s.open_three,
            s.broken_three,
            s.closed_three,
            s.open_two,
            s.closed_two,
            s.capture_threat,
            s.capture_setup,
            s.capture_score,
        ];
        if patterns.iter().any(|&w| w < 0) {
            return Err(ConfigError::Validation(
                "heuristic.scores must be >= 0".into(),
            ));
        }
        let strongest = patterns.iter().copied().max().unwrap_or(0);
        if s.pending_win_score <= strongest {
            return Err(ConfigError::Validation(
                "heuristic.scores.pending_win_score must exceed every pattern score".into(),
            ));
        }
        if s.win_score <= s.pending_win_score.saturating_mul(2) {
            return Err(ConfigError::Validation(
                "heuristic.scores.win_score must exceed 2 * pending_win_score".into(),
            ));
        }
        if s.win_score > 1_000_000_000_000 {
            return Err(ConfigError::Validation(
                "heuristic.scores.win_score must be <= 1e12".into(),
            ));
        }
        if self.heuristic.opponent_weight_permille <= 0 {
            return Err(ConfigError::Validation(
                "heuristic.opponent_weight_permille must be > 0".into(),
            ));
        }
        let tiers = &self.heuristic.capture_defense.vulnerability_tiers;
        if tiers.is_empty() || tiers.iter().any(|&t| t < 0) {
            return Err(ConfigError::Validation(
                "heuristic.capture_defense.vulnerability_tiers must be non-empty and >= 0".into(),
            ));
        }

        let search = &self.search;
        if search.max_depth == 0 || search.max_depth > MAX_SEARCH_DEPTH {
            return Err(ConfigError::Validation(format!(
                "search.max_depth must be in [1, {}]",
                MAX_SEARCH_DEPTH
            )));
        }
        if search.time_limit_ms == 0 {
            return Err(ConfigError::Validation(
                "search.time_limit_ms must be > 0".into(),
            ));
        }
        if search.relevance_range == 0 || search.relevance_range > 4 {
            return Err(ConfigError::Validation(
                "search.relevance_range must be in [1, 4]".into(),
            ));
        }
        let caps = &search.move_caps;
        if caps.root == 0 || caps.opening == 0 || caps.midgame == 0 || caps.endgame == 0 {
            return Err(ConfigError::Validation(
                "search.move_caps must all be > 0".into(),
            ));
        }
        if caps.opening_stones > caps.midgame_stones {
            return Err(ConfigError::Validation(
                "search.move_caps.opening_stones must be <= midgame_stones".into(),
            ));
        }
        if search.medium_threshold > search.high_threshold {
            return Err(ConfigError::Validation(
                "search.medium_threshold must be <= high_threshold".into(),
            ));
        }
        if search.tt_size_mb == 0 {
            return Err(ConfigError::Validation(
                "search.tt_size_mb must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_json_round_trip() {
        let config = EngineConfig::default();
        let text = config.to_json_pretty().expect("serialize");
        let parsed = EngineConfig::from_json(&text).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = EngineConfig::from_json(
            r#"{ "game": { "board_size": 15 }, "search": { "max_depth": 4 } }"#,
        )
        .expect("partial config");
        assert_eq!(config.game.board_size, 15);
        assert_eq!(config.game.capture_win_pairs, 5);
        assert_eq!(config.search.max_depth, 4);
        assert_eq!(config.search.time_limit_ms, 500);
    }

    #[test]
    fn test_invalid_board_size() {
        let err = EngineConfig::from_json(r#"{ "game": { "board_size": 25 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "got {:?}", err);
    }

    #[test]
    fn test_win_score_gap_enforced() {
        let mut config = EngineConfig::default();
        config.heuristic.scores.win_score = config.heuristic.scores.pending_win_score;
        assert!(config.validate().is_err());

        let mut config = EngineConfig::default();
        config.heuristic.scores.pending_win_score = config.heuristic.scores.open_four;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json() {
        let err = EngineConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = EngineConfig::load(Path::new("/nonexistent/gomoku.json")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
        let config = EngineConfig::load_or_default(Path::new("/nonexistent/gomoku.json"))
            .expect("defaults");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_phase_caps() {
        let caps = MoveCaps::default();
        assert_eq!(caps.for_stones(0), caps.opening);
        assert_eq!(caps.for_stones(20), caps.midgame);
        assert_eq!(caps.for_stones(100), caps.endgame);
    }
}
