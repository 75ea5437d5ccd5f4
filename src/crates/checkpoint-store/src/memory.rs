//! In-memory checkpoint storage for development and testing
//!
//! [`InMemoryCheckpointSaver`] is a reference implementation of
//! [`CheckpointSaver`] that keeps every checkpoint in a
//! `Arc<RwLock<HashMap<workflow_id, Vec<Checkpoint>>>>`. It is the default
//! store wired up by the scheduler in tests and single-process deployments.
//!
//! # When to Use
//!
//! **Use In-Memory For:**
//! - Development and prototyping
//! - Unit and integration tests
//! - Short-lived workflows
//! - Single-process deployments
//!
//! **Avoid In-Memory For:**
//! - Persistence across process restarts
//! - Multi-process or distributed deployments
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │  Arc<RwLock<HashMap<workflow_id, Vec<_>>>>  │
//! │    "wf-1" -> [Checkpoint(layer=0), ...]     │
//! │    "wf-2" -> [Checkpoint(layer=0), ...]     │
//! └────────────────────────────────────────────┘
//! ```

use crate::{
    checkpoint::Checkpoint,
    error::{CheckpointError, Result},
    traits::CheckpointSaver,
};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Thread-safe, process-local [`CheckpointSaver`] implementation.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCheckpointSaver {
    checkpoints: Arc<RwLock<HashMap<String, Vec<Checkpoint>>>>,
}

impl InMemoryCheckpointSaver {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove all stored checkpoints. Useful for test isolation.
    pub async fn clear(&self) {
        self.checkpoints.write().await.clear();
    }
}

#[async_trait]
impl CheckpointSaver for InMemoryCheckpointSaver {
    async fn save(&self, workflow_id: &str, layer: i64, state: Value) -> Result<Uuid> {
        let checkpoint = Checkpoint::new(workflow_id, layer, state);
        checkpoint
            .validate()
            .map_err(CheckpointError::Validation)?;
        let id = checkpoint.id;
        let mut checkpoints = self.checkpoints.write().await;
        checkpoints
            .entry(workflow_id.to_string())
            .or_default()
            .push(checkpoint);
        Ok(id)
    }

    async fn load(&self, checkpoint_id: Uuid) -> Result<Option<Checkpoint>> {
        let checkpoints = self.checkpoints.read().await;
        Ok(checkpoints
            .values()
            .flatten()
            .find(|c| c.id == checkpoint_id)
            .cloned())
    }

    async fn latest(&self, workflow_id: &str) -> Result<Option<Checkpoint>> {
        let checkpoints = self.checkpoints.read().await;
        Ok(checkpoints
            .get(workflow_id)
            .and_then(|entries| entries.iter().max_by_key(|c| c.timestamp))
            .cloned())
    }

    async fn list(&self, workflow_id: &str) -> Result<Vec<Checkpoint>> {
        let checkpoints = self.checkpoints.read().await;
        let mut entries: Vec<Checkpoint> = checkpoints
            .get(workflow_id)
            .cloned()
            .unwrap_or_default();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    async fn prune(&self, workflow_id: &str, keep: usize, protect: Option<Uuid>) -> Result<usize> {
        let mut checkpoints = self.checkpoints.write().await;
        let Some(entries) = checkpoints.get_mut(workflow_id) else {
            return Ok(0);
        };
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let mut retained = Vec::with_capacity(entries.len());
        let mut deleted = 0usize;
        for (index, checkpoint) in entries.drain(..).enumerate() {
            let protected = protect == Some(checkpoint.id);
            if index < keep || protected {
                retained.push(checkpoint);
            } else {
                deleted += 1;
            }
        }
        *entries = retained;
        Ok(deleted)
    }
}
