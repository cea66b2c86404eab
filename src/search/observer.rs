//! Search progress events
//!
//! The searcher reports at depth boundaries only; nothing is emitted from
//! inside the recursion.

use std::time::Duration;

use crate::board::Pos;
use crate::config::DiagnosticsConfig;

use super::movegen::OrderedMove;

/// One completed iterative-deepening depth.
#[derive(Debug, Clone, Copy)]
pub struct DepthReport {
    pub depth: u8,
    pub best_move: Option<Pos>,
    pub score: i64,
    /// Nodes visited so far in this search
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Receives search events. Every method has an empty default.
pub trait SearchObserver {
    fn root_ordered(&mut self, _depth: u8, _moves: &[OrderedMove]) {}

    fn depth_completed(&mut self, _report: &DepthReport) {}

    /// The deadline expired while searching `depth`; its result is dropped.
    fn depth_aborted(&mut self, _depth: u8, _nodes: u64) {}

    /// A terminal result ended the search early.
    fn proven_result(&mut self, _report: &DepthReport) {}

    fn search_finished(&mut self, _report: &DepthReport) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl SearchObserver for NullObserver {}

/// Forwards events to the `log` facade, filtered by [`DiagnosticsConfig`].
#[derive(Debug, Clone, Default)]
pub struct LogObserver {
    config: DiagnosticsConfig,
}

impl LogObserver {
    pub fn new(config: DiagnosticsConfig) -> Self {
        Self { config }
    }
}

fn fmt_move(pos: Option<Pos>) -> String {
    pos.map_or_else(|| "none".to_string(), |p| p.to_string())
}

impl SearchObserver for LogObserver {
    fn root_ordered(&mut self, depth: u8, moves: &[OrderedMove]) {
        if !self.config.log_move_ordering {
            return;
        }
        for (i, m) in moves.iter().take(8).enumerate() {
            log::debug!(
                "depth {} #{}: {} {:?} strength={}",
                depth,
                i,
                m.pos,
                m.bucket,
                m.strength
            );
        }
    }

    fn depth_completed(&mut self, r: &DepthReport) {
        if self.config.log_depth_progress {
            log::debug!(
                "depth {} done: best={} score={} nodes={} time={}ms",
                r.depth,
                fmt_move(r.best_move),
                r.score,
                r.nodes,
                r.elapsed.as_millis()
            );
        }
    }

    fn depth_aborted(&mut self, depth: u8, nodes: u64) {
        if self.config.log_depth_progress {
            log::debug!("depth {} aborted after {} nodes", depth, nodes);
        }
    }

    fn proven_result(&mut self, r: &DepthReport) {
        if self.config.log_terminal_states {
            log::info!(
                "proven result at depth {}: {} score={}",
                r.depth,
                fmt_move(r.best_move),
                r.score
            );
        }
    }

    fn search_finished(&mut self, r: &DepthReport) {
        log::info!(
            "search done: move={} score={} depth={} nodes={} time={}ms",
            fmt_move(r.best_move),
            r.score,
            r.depth,
            r.nodes,
            r.elapsed.as_millis()
        );
    }
}
