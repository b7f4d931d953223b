//! Error types for level loading and persistence

use thiserror::Error;

/// Errors that can occur while looking up or parsing level data.
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level {0} does not exist")]
    NotFound(u32),

    #[error("level data is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors that can occur while saving or loading persisted data.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("storage unavailable: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A timeline year outside 1994/2026/2048.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("unknown timeline year {0}")]
pub struct UnknownEra(pub u16);
