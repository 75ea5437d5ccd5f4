//! Extensible checkpoint storage trait for custom backend implementations
//!
//! [`CheckpointSaver`] is the abstraction that lets the scheduler persist and
//! resume workflow state without caring whether the backend is an in-memory
//! map, a database, or an object store.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐
//! │  LayerScheduler               │
//! │  • save(workflow_id, layer,   │
//! │         state) -> id          │
//! │  • load(id) -> Checkpoint      │
//! └───────────────┬───────────────┘
//!                 │ CheckpointSaver trait
//!                 ▼
//! ┌──────────────────────────────┐
//! │  Storage backend              │
//! │  • InMemoryCheckpointSaver    │
//! │    (reference implementation) │
//! │  • database-backed (custom)   │
//! └──────────────────────────────┘
//! ```
//!
//! Save is fire-and-forget from the scheduler's perspective: it is async but
//! never blocks the execution path, and its errors are logged rather than
//! propagated into workflow failure. Load is synchronous with respect to the
//! caller (an `.await`, but no further suspension once started) since it
//! only runs on the resume path, which already expects to wait.

use crate::{checkpoint::Checkpoint, error::Result};
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

/// Core trait for implementing checkpoint storage backends.
#[async_trait]
pub trait CheckpointSaver: Send + Sync {
    /// Persist a new checkpoint for `workflow_id` at `layer`, returning its id.
    async fn save(&self, workflow_id: &str, layer: i64, state: Value) -> Result<Uuid>;

    /// Load a checkpoint by id.
    async fn load(&self, checkpoint_id: Uuid) -> Result<Option<Checkpoint>>;

    /// Return the most recently saved checkpoint for a workflow, if any.
    async fn latest(&self, workflow_id: &str) -> Result<Option<Checkpoint>>;

    /// List all checkpoints for a workflow, newest first.
    async fn list(&self, workflow_id: &str) -> Result<Vec<Checkpoint>>;

    /// Delete all but the newest `keep` checkpoints for a workflow.
    ///
    /// Returns the number of checkpoints deleted. Idempotent: pruning an
    /// already-pruned workflow deletes nothing. Must never delete the
    /// checkpoint identified by `protect`, even if it would otherwise fall
    /// outside the retained set (this is how the scheduler protects the
    /// checkpoint referenced by `latest_checkpoint_id` in the active state).
    async fn prune(&self, workflow_id: &str, keep: usize, protect: Option<Uuid>) -> Result<usize>;
}
