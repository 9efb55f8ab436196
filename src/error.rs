//! Structured error types for gridcore.
//!
//! Every fallible grid operation reports one of these. None of them is fatal:
//! callers are expected to recover and carry on.

use crate::events::EventKind;

/// All errors that can occur while manipulating a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// Coordinate outside the current grid dimensions.
    #[error("invalid coordinate ({row}, {col})")]
    InvalidCoordinate { row: i32, col: i32 },

    /// No table is attached to the grid yet.
    #[error("no table attached to the grid")]
    NotReady,

    /// A subscriber rejected a cancelable notification.
    #[error("{0:?} was vetoed by a subscriber")]
    Vetoed(EventKind),

    /// The request conflicts with the selection mode or grid editability.
    #[error("mode conflict: {0}")]
    ModeConflict(String),

    /// The target cell is read-only.
    #[error("cell ({row}, {col}) is read-only")]
    ReadOnly { row: i32, col: i32 },

    /// A merged-cell request overlaps existing spans in an unsupported way.
    #[error("span conflict: {0}")]
    SpanConflict(String),

    /// No renderer/editor is registered for the data type name.
    #[error("unknown data type: {0}")]
    TypeNotFound(String),

    /// Malformed clipboard payload or clipboard backend failure.
    #[error("clipboard: {0}")]
    Clipboard(String),

    /// Configuration could not be parsed.
    #[error("config: {0}")]
    Config(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl GridError {
    pub(crate) fn invalid(row: i32, col: i32) -> Self {
        Self::InvalidCoordinate { row, col }
    }
}
