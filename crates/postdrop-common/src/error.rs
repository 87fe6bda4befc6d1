//! Common error types used throughout postdrop.
//!
//! Each variant corresponds to one failure class of the post-download
//! pipeline. Configuration and readiness errors abort a run before any file is
//! touched; chain exhaustion aborts after every strategy has been tried.

use std::path::PathBuf;

/// Common error type for postdrop.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Required settings are missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The source contains no video files.
    #[error("No media files found in {}", path.display())]
    EmptyBatch {
        /// The source directory or file that was scanned.
        path: PathBuf,
    },

    /// A file in the batch is still being written.
    #[error("Not ready: {} ({reason})", path.display())]
    NotReady {
        /// The first file that failed a readiness check.
        path: PathBuf,
        /// Human-readable reason, e.g. "open by writer".
        reason: String,
    },

    /// Every rename strategy failed.
    #[error("All {attempts} rename strategies failed for {}", path.display())]
    ChainExhausted {
        /// The source that could not be organized.
        path: PathBuf,
        /// How many strategies were attempted.
        attempts: usize,
    },

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new Config error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a NotReady error for `path`.
    pub fn not_ready(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::NotReady {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Whether re-invoking the pipeline later could succeed without operator
    /// intervention.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
