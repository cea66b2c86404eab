use std::path::PathBuf;

use crate::board::Pos;

/// Reasons a move is rejected. These are normal results, not faults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IllegalMove {
    #[error("{0} is outside the board")]
    OutOfBounds(Pos),

    #[error("{0} is already occupied")]
    Occupied(Pos),

    #[error("{0} would create a double free-three")]
    DoubleThree(Pos),

    #[error("the game is already over")]
    GameOver,
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
