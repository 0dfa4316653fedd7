//! Error types for stores and listing runs

use std::io;

use thiserror::Error;

/// Failures raised by a [`Store`](crate::store::Store) while resolving or
/// listing a path.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no such file or directory: {0}")]
    NotFound(String),

    #[error("not a directory: {0}")]
    NotADirectory(String),

    #[error("store has no root; use an identifier-rooted path")]
    NoRoot,

    #[error("entry feed closed by the consumer")]
    FeedClosed,

    #[error("invalid snapshot: {0}")]
    Snapshot(String),

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Terminal error of a listing run.
#[derive(Debug, Error)]
pub enum ListError {
    /// A requested path could not be traversed.
    #[error("{path}: {source}")]
    Resolve {
        path: String,
        #[source]
        source: StoreError,
    },

    /// The run's cancellation scope was triggered.
    #[error("listing cancelled")]
    Cancelled,

    /// The traversal task panicked or was aborted.
    #[error("traversal task failed: {0}")]
    Task(String),

    #[error("error writing output: {0}")]
    Output(#[from] io::Error),

    #[error("error encoding output: {0}")]
    Json(#[from] serde_json::Error),
}

impl ListError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ListError::Cancelled)
    }
}
