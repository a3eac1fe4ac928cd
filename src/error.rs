//! Error type shared by the fallible parts of the arcade

use std::fmt;

/// Errors surfaced by maze generation and settings handling
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArcadeError {
    /// Maze dimension must be odd and at least 5
    InvalidMazeDimension(usize),
    /// Settings could not be parsed or serialized
    Settings(String),
    /// Settings file I/O (native only)
    Io(String),
}

impl fmt::Display for ArcadeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArcadeError::InvalidMazeDimension(dim) => {
                write!(f, "invalid maze dimension {} (must be odd and >= 5)", dim)
            }
            ArcadeError::Settings(msg) => write!(f, "settings error: {}", msg),
            ArcadeError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ArcadeError {}

impl From<serde_json::Error> for ArcadeError {
    fn from(e: serde_json::Error) -> Self {
        ArcadeError::Settings(e.to_string())
    }
}

impl From<std::io::Error> for ArcadeError {
    fn from(e: std::io::Error) -> Self {
        ArcadeError::Io(e.to_string())
    }
}
