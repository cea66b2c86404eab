//! Gomoku AI Engine with Ninuki-renju rules
//!
//! A game-tree search engine for Ninuki-renju:
//! - Square board from 5x5 up to 19x19 (19x19 by default)
//! - Five or more in a row wins, unless the opponent breaks it by capture on
//!   the very next move
//! - Pair capture rule: X-O-O-X removes the O-O pair
//! - Capture win: 5 captured pairs by default
//! - Double free-three is forbidden for both colors, captures included
//!
//! # Architecture
//!
//! - [`board`]: Board representation with bitboards, lines and hashing
//! - [`rules`]: Captures, wins, forbidden moves and the mutable [`Position`]
//! - [`eval`]: Pattern evaluation and incremental scoring
//! - [`search`]: Move ordering, transposition table and alpha-beta search
//! - [`engine`]: Main AI engine integrating all components
//! - [`config`]: JSON-loadable tunables
//!
//! # Quick Start
//!
//! ```
//! use std::time::Duration;
//! use gomoku::{AiEngine, EngineConfig, Pos, Stone};
//!
//! let mut config = EngineConfig::default();
//! config.search.max_depth = 3;
//! let engine = AiEngine::new(config).expect("valid config");
//! let mut position = engine.new_game();
//!
//! position.play(Pos::new(9, 9), Stone::Black).expect("legal");
//!
//! // AI responds as White
//! let decision = engine.get_best_move(&mut position, Stone::White, Duration::from_millis(300));
//! if let Some(pos) = decision.best_move {
//!     position.play(pos, Stone::White).expect("engine moves are legal");
//!     println!("AI plays at {} (depth {})", pos, decision.depth);
//! }
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod eval;
pub mod rules;
pub mod search;

// Re-export commonly used types for convenience
pub use board::{Board, Pos, Stone};
pub use config::EngineConfig;
pub use engine::{AiEngine, MoveDecision};
pub use error::{ConfigError, IllegalMove};
pub use rules::{GameStatus, MoveGuard, Position};
