//! Core checkpoint data structures for workflow state persistence
//!
//! This module defines [`Checkpoint`], the durable snapshot of a running
//! workflow's state. A checkpoint is deliberately flat: `{id, workflow_id,
//! timestamp, layer, state}`, where `state` is an opaque JSON object owned
//! by the caller (the scheduler). The store never interprets `state` beyond
//! the handful of fields validated on save.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │  Checkpoint                                            │
//! │  • id: Uuid              (assigned on save)             │
//! │  • workflow_id: String                                  │
//! │  • timestamp: DateTime<Utc>                             │
//! │  • layer: i64            (current_layer at save time)   │
//! │  • state: Value          (WorkflowState, opaque here)   │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use checkpoint_store::Checkpoint;
//! use serde_json::json;
//!
//! let checkpoint = Checkpoint::new(
//!     "wf-123",
//!     0,
//!     json!({
//!         "messages": [],
//!         "tasks": [],
//!         "decisions": [],
//!         "context": {},
//!     }),
//! );
//! assert_eq!(checkpoint.workflow_id, "wf-123");
//! assert_eq!(checkpoint.layer, 0);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A durable snapshot of workflow state sufficient to resume execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Checkpoint {
    /// Unique checkpoint identifier, assigned on save
    pub id: Uuid,
    /// Workflow this checkpoint belongs to
    pub workflow_id: String,
    /// When the checkpoint was taken
    pub timestamp: DateTime<Utc>,
    /// `current_layer` at the time this checkpoint was taken
    pub layer: i64,
    /// Opaque workflow state (messages, tasks, decisions, context, ...)
    pub state: Value,
}

impl Checkpoint {
    /// Create a new checkpoint with a freshly assigned id and current timestamp.
    pub fn new(workflow_id: impl Into<String>, layer: i64, state: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            workflow_id: workflow_id.into(),
            timestamp: Utc::now(),
            layer,
            state,
        }
    }

    /// Validate the checkpoint's shape before it is accepted by a store.
    ///
    /// Checks: `workflow_id` non-empty, `layer >= 0`, and (when present)
    /// `messages`/`tasks`/`decisions` are arrays and `context` is an object.
    pub fn validate(&self) -> Result<(), String> {
        if self.workflow_id.is_empty() {
            return Err("workflow_id must not be empty".to_string());
        }
        if self.layer < 0 {
            return Err("layer must be >= 0".to_string());
        }
        let obj = self
            .state
            .as_object()
            .ok_or_else(|| "state must be a JSON object".to_string())?;
        for field in ["messages", "tasks", "decisions"] {
            if let Some(value) = obj.get(field) {
                if !value.is_array() {
                    return Err(format!("state.{field} must be an array"));
                }
            }
        }
        if let Some(context) = obj.get("context") {
            if !context.is_object() {
                return Err("state.context must be an object".to_string());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validates_required_shape() {
        let ok = Checkpoint::new("wf-1", 0, json!({"messages": [], "tasks": []}));
        assert!(ok.validate().is_ok());

        let bad_layer = Checkpoint::new("wf-1", -1, json!({}));
        assert!(bad_layer.validate().is_err());

        let bad_id = Checkpoint::new("", 0, json!({}));
        assert!(bad_id.validate().is_err());

        let bad_shape = Checkpoint::new("wf-1", 0, json!({"tasks": "not-an-array"}));
        assert!(bad_shape.validate().is_err());
    }
}
