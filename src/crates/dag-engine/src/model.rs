//! Workflow data model: tasks, DAGs, results, and workflow state.
//!
//! Kept deliberately flat and serde-friendly — these types cross the
//! checkpoint boundary as `serde_json::Value` and the RPC boundary as
//! wire events, so there is no benefit to richer in-memory structure here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Whether a task is a direct tool invocation or an expanded capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Tool,
    Capability,
}

/// What happens to the workflow when this task fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole workflow (default).
    FailStop,
    /// Mark `failed_safe` and continue if no downstream task needs the output.
    FailSafe,
}

impl Default for FailurePolicy {
    fn default() -> Self {
        Self::FailStop
    }
}

/// One node in a workflow DAG.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub call_name: String,
    #[serde(rename = "type")]
    pub kind: TaskKind,
    pub input_schema: Option<Value>,
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    /// Sandbox permission set required for execution; escalated via C10
    /// when the executor reports it is insufficient.
    #[serde(default = "default_permission_set")]
    pub permission_set: String,
    /// Requires explicit HIL confirmation before the layer containing it runs.
    #[serde(default)]
    pub requires_approval: bool,
}

fn default_permission_set() -> String {
    "minimal".to_string()
}

/// A DAG of tasks, acyclic by construction; layering is computed once by
/// the scheduler via Kahn's algorithm.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Dag {
    pub tasks: Vec<Task>,
}

impl Dag {
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// Per-task, per-execution result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Success,
    Error,
    FailedSafe,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResult {
    pub task_id: String,
    pub status: TaskStatus,
    pub output: Option<Value>,
    pub execution_time_ms: u64,
    pub layer_index: u32,
}

/// Workflow lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStatus {
    Created,
    Running,
    Paused,
    AwaitingApproval,
    Completed,
    Failed,
    Aborted,
}

/// The full resumable state of one workflow. `current_layer` is monotonic
/// non-decreasing across event emissions except on explicit resume from an
/// earlier checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowState {
    pub workflow_id: String,
    pub status: WorkflowStatus,
    pub current_layer: u32,
    pub total_layers: u32,
    pub results: Vec<TaskResult>,
    pub latest_checkpoint_id: Option<Uuid>,
    pub intent: Option<String>,
    pub dag: Dag,
    pub learning_context: Option<Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkflowState {
    pub fn new(workflow_id: impl Into<String>, dag: Dag, intent: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            workflow_id: workflow_id.into(),
            status: WorkflowStatus::Created,
            current_layer: 0,
            total_layers: 0,
            results: Vec::new(),
            latest_checkpoint_id: None,
            intent,
            dag,
            learning_context: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_checkpoint_state(&self) -> Value {
        serde_json::json!({
            "workflow_id": self.workflow_id,
            "status": self.status,
            "current_layer": self.current_layer,
            "total_layers": self.total_layers,
            "results": self.results,
            "messages": Vec::<Value>::new(),
            "tasks": self.dag.tasks,
            "decisions": Vec::<Value>::new(),
            "context": self.learning_context.clone().unwrap_or_else(|| serde_json::json!({})),
        })
    }
}
