//! Game rules for Gomoku with Ninuki-renju variant
//!
//! This module implements the rule set for Gomoku including:
//! - Capture rules (pair capture)
//! - Win conditions (5-in-a-row with a one-move grace period, capture win)
//! - Forbidden moves (double-three)
//! - The mutable [`Position`] driven by apply/undo

pub mod capture;
pub mod forbidden;
pub mod position;
pub mod win;

// Re-exports for convenient access
pub use capture::{find_captures, CaptureList};
pub use forbidden::{count_free_threes, creates_double_three, is_double_three};
pub use position::{GameStatus, MoveGuard, MoveRecord, PendingWin, Position, WinKind};
pub use win::{can_break_line, find_break_moves, five_line_at, FiveLine};
