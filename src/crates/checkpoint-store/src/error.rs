//! Error types for checkpoint operations

use thiserror::Error;

/// Result type for checkpoint operations
pub type Result<T> = std::result::Result<T, CheckpointError>;

/// Errors that can occur during checkpoint operations
#[derive(Error, Debug)]
pub enum CheckpointError {
    /// Checkpoint not found
    #[error("Checkpoint not found: {0}")]
    NotFound(String),

    /// The checkpoint failed schema validation before it was accepted.
    ///
    /// Save validates `workflow_id` is non-empty, `layer >= 0`, and that the
    /// `state` object carries array-typed `messages`/`tasks`/`decisions`
    /// fields. A malformed checkpoint is never written.
    #[error("Checkpoint failed validation: {0}")]
    Validation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage-backend error (non-in-memory implementations)
    #[error("Storage error: {0}")]
    Storage(String),

    /// Custom error
    #[error("{0}")]
    Custom(String),
}
