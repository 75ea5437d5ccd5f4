//! Error types for DAG graph storage, scheduling, and decision handling.
//!
//! Mirrors the shape used throughout this workspace: one `thiserror` enum per
//! crate, `#[from]` wrapping of lower-level errors, and a `Result` alias.
//! Variant names follow the abstract error kinds used everywhere else in this
//! system so that logs and RPC error codes stay consistent across crates.

use thiserror::Error;

/// Result type for `dag-engine` operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors surfaced by the graph store, scheduler, and decision machinery.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Bad request: missing workflow id, empty intent, malformed DAG.
    #[error("validation failed: {0}")]
    ValidationError(String),

    /// Unknown workflow, checkpoint, node, or edge.
    #[error("not found: {0}")]
    NotFoundError(String),

    /// A task requested broader sandbox permissions than it was granted.
    ///
    /// Never fatal — handled by [`crate::escalation`]'s deferred protocol.
    #[error("permission escalation needed: {current_set} -> {requested_set} ({detected_op})")]
    PermissionEscalationNeeded {
        current_set: String,
        requested_set: String,
        detected_op: String,
    },

    /// A task exceeded its execution budget.
    #[error("task {task_id} timed out after {duration_ms}ms")]
    TaskTimeout { task_id: String, duration_ms: u64 },

    /// An AIL/HIL wait exceeded its configured timeout.
    #[error("workflow {workflow_id} timed out awaiting a decision")]
    WorkflowTimeout { workflow_id: String },

    /// Checkpoint save/load failure.
    #[error("checkpoint error: {0}")]
    CheckpointError(#[from] checkpoint_store::CheckpointError),

    /// Self-loop edge rejected.
    #[error("self-loop edge rejected for node {0}")]
    SelfLoop(String),

    /// Serialization failure.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Everything else; logged with full context upstream.
    #[error("internal error: {0}")]
    InternalError(String),
}

impl EngineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFoundError(msg.into())
    }
}
