//! Error types for the edit buffer

use thiserror::Error;

/// Failures reported by a [`Model`](crate::Model) collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Unknown path: {0}")]
    UnknownPath(String),

    #[error("Value rejected for {path}: {reason}")]
    Rejected { path: String, reason: String },

    #[error("Recompute failed: {0}")]
    Recompute(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    #[error("Failed to write {path}: {source}")]
    MutationFailed {
        path: String,
        #[source]
        source: ModelError,
    },

    #[error("Recompute failed: {source}")]
    RecomputeFailed {
        #[source]
        source: ModelError,
    },

    #[error("Edit session \"{label}\" is already active")]
    SessionActive { label: String },
}

impl EditError {
    /// Path of the field whose write failed, if the error came from a write
    pub fn path(&self) -> Option<&str> {
        match self {
            EditError::MutationFailed { path, .. } => Some(path),
            _ => None,
        }
    }
}

pub type EditResult<T> = Result<T, EditError>;
