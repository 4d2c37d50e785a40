//! Error types for whodunnitlib

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::Phase;

/// Errors that can occur while inventorying a source tree
#[derive(Error, Debug)]
pub enum WhodunnitError {
    /// Path does not exist
    #[error("path does not exist: {0}")]
    PathNotFound(PathBuf),

    /// Walk root is a file, not a directory
    #[error("{0} is not a directory")]
    NotADirectory(PathBuf),

    /// Failed to list a directory during the walk
    #[error("failed to read directory '{path}': {source}")]
    DirRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to read a file during the walk
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An ignore file exists but could not be read
    #[error("failed to read ignore file '{path}': {source}")]
    IgnoreFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Git operation error
    #[error("git error: {0}")]
    GitError(String),

    /// A pipeline step was requested out of order
    #[error("cannot {action} while the inventory is {phase:?}")]
    InvalidPhase { action: &'static str, phase: Phase },

    /// A blame worker panicked
    #[error("a blame worker panicked")]
    WorkerPanic,

    /// Snapshot serialization failed
    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
}
