//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::EntryError;
use storage::repository::StorageError;

use crate::sessions::QuizPhase;

/// Errors emitted by the quiz session engine and its workflows.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// The operation is not allowed in the session's current phase.
    ///
    /// This is a caller contract violation; the presentation layer is
    /// expected to gate operations on the exposed phase.
    #[error("{operation} is not valid while the session is {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: QuizPhase,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while appending a new entry to the bank.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppendError {
    #[error(transparent)]
    Validation(#[from] EntryError),

    /// The exact triple already exists in the persisted bank or in the live
    /// session pool.
    #[error("duplicate entry detected")]
    Duplicate,

    #[error(transparent)]
    Storage(StorageError),
}

impl From<StorageError> for AppendError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Duplicate => AppendError::Duplicate,
            other => AppendError::Storage(other),
        }
    }
}
