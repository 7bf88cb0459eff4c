//! Error types for render farm queries and snapshots

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FarmError {
    /// The farm command could not be spawned or exited unsuccessfully.
    #[error("Farm command '{command}' failed: {reason}")]
    ExternalToolFailure { command: String, reason: String },

    #[error("Invalid job snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, FarmError>;
