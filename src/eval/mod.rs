//! Position evaluation
//!
//! - [`patterns`]: compiled line patterns and the matcher
//! - [`heuristic`]: whole-board and incremental evaluation

pub mod heuristic;
pub mod patterns;

pub use heuristic::{DeltaProbe, Evaluator, LineTerms, ScoreDelta, SCALE};
pub use patterns::{match_line, PatternCounts, PatternKind};
