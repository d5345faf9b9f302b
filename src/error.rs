//! Error types for configuration loading and the leaderboard
//!
//! Nothing in the simulation itself fails: degenerate geometry has a fallback
//! and a missing render surface just skips the frame. Errors only come from
//! the boundaries (config files, score submissions, score storage).

use thiserror::Error;

/// Failure to load or validate a [`crate::Config`]
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// A constant is outside the range the simulation is written for
    #[error("config value {name} = {value} is out of range (expected {range})")]
    OutOfRange {
        name: &'static str,
        value: f64,
        range: &'static str,
    },
}

/// Failure to fetch or submit leaderboard scores
#[derive(Debug, Error)]
pub enum LeaderboardError {
    /// Client error: the submission is missing a required field
    #[error("missing {field} in score submission")]
    InvalidSubmission { field: &'static str },

    #[error("leaderboard storage failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("leaderboard data is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// Browser storage could not be reached (private mode, blocked, ...)
    #[cfg(target_arch = "wasm32")]
    #[error("local storage is unavailable")]
    StorageUnavailable,
}

impl LeaderboardError {
    /// True when the caller sent a bad request rather than storage failing
    pub fn is_client_error(&self) -> bool {
        matches!(self, LeaderboardError::InvalidSubmission { .. })
    }
}
