//! Error types for the arena core.

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// The match record cannot be simulated (wrong sides, missing teams...).
    #[error("invalid match: {0}")]
    InvalidMatch(String),
    #[error("malformed bracket JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The live-debate task is gone; the handle can no longer reach it.
    #[error("live debate has stopped")]
    Stopped,
}
