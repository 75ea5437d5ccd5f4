//! Data model shared by the hypergraph, scorer, pathfinder, suggester, and
//! learner: tools, capabilities, execution traces, and replay examples.
//!
//! Embeddings are opaque fixed-length `Vec<f32>` with dimension `D` fixed
//! at startup; a dimension mismatch on load is a fatal error for that
//! record only (`HypergraphError::DimensionMismatch`), never for the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered tool vertex. `tool_id` is `"<server>:<name>"`; the
/// embedding is immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub tool_id: String,
    pub embedding: Vec<f32>,
    pub pagerank: Option<f64>,
    pub community: Option<u32>,
}

/// Whether a capability member is a tool or another capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Tool,
    Capability,
}

/// One ordered member reference of a capability's hyperedge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub kind: MemberKind,
}

/// A capability: a hyperedge whose vertex set is the transitive closure
/// over tool members of itself and all descendant capabilities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capability {
    pub pattern_id: String,
    pub embedding: Vec<f32>,
    pub members: Vec<Member>,
    pub success_rate: f64,
    pub usage_count: u64,
    pub last_used: Option<DateTime<Utc>>,
    pub call_name: Option<String>,
    pub input_schema: Option<serde_json::Value>,
}

impl Capability {
    pub fn new(pattern_id: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            pattern_id: pattern_id.into(),
            embedding,
            members: Vec::new(),
            success_rate: 0.0,
            usage_count: 0,
            last_used: None,
            call_name: None,
            input_schema: None,
        }
    }

    pub fn with_members(mut self, members: Vec<Member>) -> Self {
        self.members = members;
        self
    }

    pub fn with_success_rate(mut self, success_rate: f64) -> Self {
        self.success_rate = success_rate;
        self
    }
}

/// Per-task outcome inside an execution trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceTaskResult {
    pub tool: String,
    pub layer_index: u32,
    pub success: bool,
}

/// One recorded branch decision inside an execution trace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceDecision {
    pub node: String,
    pub branch: String,
    pub confidence: f64,
}

/// A completed (or replanned) workflow's execution trace; the Learner's
/// input for both edge derivation and replay-buffer ingestion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionTrace {
    pub id: String,
    pub capability_id: Option<String>,
    pub intent_text: Option<String>,
    pub intent_embedding: Option<Vec<f32>>,
    pub success: bool,
    pub execution_time_ms: u64,
    pub task_results: Vec<TraceTaskResult>,
    pub parent_trace_id: Option<String>,
    pub decisions: Vec<TraceDecision>,
}

/// A prioritized-replay training example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingExample {
    pub intent_embedding: Vec<f32>,
    pub context_tools: Vec<String>,
    pub candidate_capability_id: String,
    pub outcome: f64,
    pub td_priority: f64,
}
