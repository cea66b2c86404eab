//! Search module for Gomoku AI
//!
//! Contains:
//! - Candidate generation and tiered move ordering
//! - Transposition table for caching search results
//! - Minimax with alpha-beta pruning and iterative deepening
//! - Observer hooks for search diagnostics

pub mod alphabeta;
pub mod movegen;
pub mod observer;
pub mod tt;

pub use alphabeta::{SearchResult, SearchStats, Searcher};
pub use movegen::{relevant_candidates, MoveBucket, MoveOrderer, OrderHints, OrderedMove};
pub use observer::{DepthReport, LogObserver, NullObserver, SearchObserver};
pub use tt::{Bound, TranspositionTable, TtEntry, TtKey, TtStats};
