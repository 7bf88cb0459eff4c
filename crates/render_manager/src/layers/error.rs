//! Error types for render layer collection

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a name failed classification.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenRejection {
    /// Fewer than two `_`-separated segments.
    #[error("expected at least two segments")]
    TooFewSegments,

    #[error("unknown prefix '{0}'")]
    UnknownPrefix(String),

    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("unknown pass '{0}'")]
    UnknownPass(String),

    #[error("unknown version prefix in '{0}'")]
    UnknownVersionPrefix(String),
}

/// Render layer error type.
///
/// Collectors log these and fall back to empty results; they only surface as
/// values from the lower-level helpers.
#[derive(Error, Debug)]
pub enum LayerError {
    #[error("Path not found: {0}")]
    InvalidPath(PathBuf),

    #[error("Invalid render layer name '{name}': {reason}")]
    InvalidToken { name: String, reason: TokenRejection },

    #[error("Version folder has no payload files: {0}")]
    EmptyVersion(PathBuf),

    #[error("No valid version found in {0}")]
    NoVersionFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid scene state: {0}")]
    Scene(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, LayerError>;
