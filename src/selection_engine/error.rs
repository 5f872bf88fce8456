//! Error types for puzzle selection.

use thiserror::Error;

/// Errors raised by the selection engine.
///
/// Running out of puzzles is not an error: selection functions return
/// `Ok(None)` for that case.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SelectionError {
    /// The caller broke an input contract (empty ratings, bad weights).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// A puzzle record failed boundary validation.
    #[error("invalid puzzle '{id}': {reason}")]
    InvalidPuzzle { id: String, reason: String },

    /// Selector configuration could not be loaded or is out of range.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl SelectionError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    pub fn invalid_puzzle(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPuzzle {
            id: id.into(),
            reason: reason.into(),
        }
    }
}
