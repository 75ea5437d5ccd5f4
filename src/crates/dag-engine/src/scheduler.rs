//! LayerScheduler: topological partitioning of a DAG into parallel layers
//! and per-layer execution with a configurable failure-mode policy.
//!
//! ```text
//!   created --first layer starts--> running --> (paused | awaiting_approval)*
//!                                       |
//!                                       +--> completed | failed | aborted
//! ```
//!
//! The scheduler is the only suspension point in this crate that spans
//! multiple `.await`s in sequence: per-task timeouts inside a layer join,
//! then an optional checkpoint save, then an optional AIL/HIL gate, then an
//! optional permission-escalation round, before the next layer starts.

use crate::channels::{
    CommandReceiver, Command, DecisionType, EventSender, ExecutionEvent,
};
use crate::decision::{DecisionOutcome, DecisionStrategy};
use crate::error::{EngineError, Result};
use crate::escalation::{self, PendingEscalation, Reexecutor};
use crate::model::{Dag, FailurePolicy, Task, TaskResult, TaskStatus, WorkflowState, WorkflowStatus};
use async_trait::async_trait;
use checkpoint_store::CheckpointSaver;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Sandbox execution contract. The sandbox itself is out of scope; this is
/// the narrow trait the scheduler depends on.
#[async_trait]
pub trait ICodeExecutor: Send + Sync {
    async fn execute(&self, task: &Task) -> std::result::Result<serde_json::Value, ExecutorError>;
}

/// Narrow hook back into the Suggester (owned by the `hypergraph` crate) so
/// an AIL `replan` response can extend the DAG without this crate depending
/// on the scorer/pathfinder stack.
#[async_trait]
pub trait Replanner: Send + Sync {
    async fn replan(&self, new_requirement: &str) -> Result<Vec<Task>>;
}

/// Replanner that never proposes new work; used where no Suggester is wired
/// up (tests, or deployments that treat `replan` as a no-op continue).
pub struct NullReplanner;

#[async_trait]
impl Replanner for NullReplanner {
    async fn replan(&self, _new_requirement: &str) -> Result<Vec<Task>> {
        Ok(Vec::new())
    }
}

/// Outcome of running one task, including the permission-escalation signal
/// that must be handled by the deferred pattern rather than a blocking wait.
#[derive(Debug, Clone)]
pub enum ExecutorError {
    PermissionEscalationNeeded {
        current_set: String,
        requested_set: String,
        detected_op: String,
    },
    Failed(String),
}

/// Scheduler tuning knobs; mirrors the configuration options in the
/// external-interfaces section (`task_timeout_ms`, `per_layer_validation`,
/// `hil_timeout_ms`, `ail_timeout_ms`, `checkpoint_retention`).
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub task_timeout: Duration,
    pub per_layer_validation: bool,
    pub hil_timeout: Option<Duration>,
    pub ail_timeout: Option<Duration>,
    pub checkpoint_retention: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            task_timeout: Duration::from_millis(30_000),
            per_layer_validation: false,
            hil_timeout: None,
            ail_timeout: Some(Duration::from_millis(300_000)),
            checkpoint_retention: 5,
        }
    }
}

/// Partition a DAG into layers by Kahn's algorithm. A task is in layer `L`
/// iff its longest dependency path length is `L`. Deterministic for a
/// given DAG: ties within a layer are ordered by task declaration order.
pub fn layer_dag(dag: &Dag) -> Result<Vec<Vec<Task>>> {
    let mut indegree: HashMap<&str, usize> = HashMap::new();
    let mut dependents: HashMap<&str, Vec<&str>> = HashMap::new();
    for task in &dag.tasks {
        indegree.entry(&task.id).or_insert(0);
        for dep in &task.depends_on {
            if dag.task(dep).is_none() {
                return Err(EngineError::validation(format!(
                    "task {} depends on unknown task {}",
                    task.id, dep
                )));
            }
            *indegree.entry(task.id.as_str()).or_insert(0) += 1;
            dependents.entry(dep.as_str()).or_default().push(&task.id);
        }
    }

    let mut frontier: Vec<&str> = indegree
        .iter()
        .filter(|(_, &deg)| deg == 0)
        .map(|(id, _)| *id)
        .collect();
    frontier.sort_by_key(|id| dag.tasks.iter().position(|t| &t.id == id).unwrap_or(usize::MAX));

    let mut layers: Vec<Vec<Task>> = Vec::new();
    let mut remaining = indegree.clone();
    let mut current = frontier;
    let mut visited = 0usize;

    while !current.is_empty() {
        let mut layer = Vec::new();
        let mut next_ids: Vec<&str> = Vec::new();
        for id in &current {
            let task = dag.task(id).expect("task existed in indegree map").clone();
            layer.push(task);
            visited += 1;
            if let Some(deps) = dependents.get(id) {
                for &dependent in deps {
                    let entry = remaining.get_mut(dependent).expect("dependent tracked");
                    *entry -= 1;
                    if *entry == 0 {
                        next_ids.push(dependent);
                    }
                }
            }
        }
        layer.sort_by_key(|t| dag.tasks.iter().position(|x| x.id == t.id).unwrap_or(usize::MAX));
        layers.push(layer);
        next_ids.sort_by_key(|id| dag.tasks.iter().position(|t| &t.id == id).unwrap_or(usize::MAX));
        next_ids.dedup();
        current = next_ids;
    }

    if visited != dag.tasks.len() {
        return Err(EngineError::validation("DAG contains a cycle"));
    }
    Ok(layers)
}

/// Runs one workflow's layers to completion, emitting events and consuming
/// commands along the way.
pub struct LayerScheduler<C: CheckpointSaver> {
    pub config: SchedulerConfig,
    pub executor: Arc<dyn ICodeExecutor>,
    pub checkpoints: Arc<C>,
    pub decision_strategy: Arc<dyn DecisionStrategy>,
    pub replanner: Arc<dyn Replanner>,
}

impl<C: CheckpointSaver + 'static> LayerScheduler<C> {
    pub fn new(
        config: SchedulerConfig,
        executor: Arc<dyn ICodeExecutor>,
        checkpoints: Arc<C>,
        decision_strategy: Arc<dyn DecisionStrategy>,
        replanner: Arc<dyn Replanner>,
    ) -> Self {
        Self {
            config,
            executor,
            checkpoints,
            decision_strategy,
            replanner,
        }
    }

    #[tracing::instrument(skip(self, events, commands, state), fields(workflow_id = %state.workflow_id))]
    pub async fn run(
        &self,
        state: &mut WorkflowState,
        events: &EventSender,
        commands: &mut CommandReceiver,
    ) -> Result<()> {
        let mut layers = layer_dag(&state.dag)?;
        state.total_layers = layers.len() as u32;

        events
            .send(ExecutionEvent::DagStarted {
                timestamp: Utc::now(),
                workflow_id: state.workflow_id.clone(),
                total_layers: state.total_layers,
            })
            .await
            .ok();
        state.status = WorkflowStatus::Running;

        let mut layer_index = state.current_layer;
        let mut aborted_reason: Option<String> = None;

        while (layer_index as usize) < layers.len() {
            let layer = layers[layer_index as usize].clone();

            if layer.iter().any(|t| t.requires_approval) {
                state.status = WorkflowStatus::AwaitingApproval;
                let checkpoint_id = self
                    .decision_strategy
                    .prepare(
                        events,
                        &state.workflow_id,
                        DecisionType::Hil,
                        format!("layer {layer_index} requires approval"),
                        serde_json::json!({"layer": layer_index}),
                    )
                    .await?;
                let outcome = self
                    .decision_strategy
                    .wait(commands, &state.workflow_id, checkpoint_id, self.config.hil_timeout)
                    .await?;
                match outcome {
                    DecisionOutcome::Rejected { feedback } => {
                        aborted_reason =
                            Some(feedback.unwrap_or_else(|| "HIL rejected".to_string()));
                        break;
                    }
                    DecisionOutcome::Abort { reason } => {
                        aborted_reason = Some(reason);
                        break;
                    }
                    _ => {}
                }
                state.status = WorkflowStatus::Running;
            }

            let (results, escalations) = self.run_layer(&layer, layer_index).await;

            if !escalations.is_empty() {
                let prepared = escalation::prepare(
                    events,
                    &state.workflow_id,
                    self.decision_strategy.as_ref(),
                    &escalations,
                )
                .await?;
                let mut results = results;
                let reexecutor = SchedulerReexecutor {
                    executor: self.executor.clone(),
                    layer: layer.clone(),
                };
                escalation::process(
                    commands,
                    &state.workflow_id,
                    self.decision_strategy.as_ref(),
                    &reexecutor,
                    prepared,
                    &mut results,
                )
                .await?;
                self.finish_layer(state, events, layer_index, results).await?;
            } else {
                self.finish_layer(state, events, layer_index, results).await?;
            }

            if self.has_unrecoverable_failure(state, &layer) {
                state.status = WorkflowStatus::Failed;
                self.checkpoint(state).await;
                return Ok(());
            }

            // Optional checkpoint between layers.
            self.checkpoint(state).await;

            // AIL gate after the layer if configured or errors are present.
            let had_errors = state
                .results
                .iter()
                .any(|r| r.layer_index == layer_index && r.status == TaskStatus::Error);
            if self.config.per_layer_validation || had_errors {
                let checkpoint_id = self
                    .decision_strategy
                    .prepare(
                        events,
                        &state.workflow_id,
                        DecisionType::Ail,
                        format!("layer {layer_index} completed, inspection requested"),
                        serde_json::json!({"layer": layer_index, "had_errors": had_errors}),
                    )
                    .await?;
                let outcome = self
                    .decision_strategy
                    .wait(commands, &state.workflow_id, checkpoint_id, self.config.ail_timeout)
                    .await?;
                match outcome {
                    DecisionOutcome::Abort { reason } => {
                        aborted_reason = Some(reason);
                        break;
                    }
                    DecisionOutcome::Replan { new_requirement } => {
                        let new_tasks = self.replanner.replan(&new_requirement).await?;
                        if !new_tasks.is_empty() {
                            info!(
                                new_requirement,
                                appended = new_tasks.len(),
                                "replan appended tasks to a new trailing layer"
                            );
                            state.dag.tasks.extend(new_tasks.clone());
                            state.total_layers += 1;
                            layers.push(new_tasks);
                        }
                    }
                    _ => {}
                }
            }

            // Poll for an out-of-band abort even without a gate this layer.
            if let Ok(Some(Command::Abort { reason })) = try_recv_abort(commands) {
                aborted_reason = Some(reason);
                break;
            }

            layer_index += 1;
            state.current_layer = layer_index;
        }

        if let Some(reason) = aborted_reason {
            state.status = WorkflowStatus::Aborted;
            self.checkpoint(state).await;
            events
                .send(ExecutionEvent::WorkflowAborted {
                    timestamp: Utc::now(),
                    workflow_id: state.workflow_id.clone(),
                    completed_layers: state.current_layer,
                    reason,
                })
                .await
                .ok();
            return Ok(());
        }

        state.status = WorkflowStatus::Completed;
        let successful = state
            .results
            .iter()
            .filter(|r| r.status == TaskStatus::Success)
            .count() as u32;
        let failed = state
            .results
            .iter()
            .filter(|r| matches!(r.status, TaskStatus::Error))
            .count() as u32;
        self.checkpoint(state).await;
        events
            .send(ExecutionEvent::WorkflowCompleted {
                timestamp: Utc::now(),
                workflow_id: state.workflow_id.clone(),
                successful_tasks: successful,
                failed_tasks: failed,
            })
            .await
            .ok();
        Ok(())
    }

    async fn run_layer(
        &self,
        layer: &[Task],
        layer_index: u32,
    ) -> (Vec<TaskResult>, Vec<PendingEscalation>) {
        let mut handles = Vec::with_capacity(layer.len());
        for task in layer {
            let executor = self.executor.clone();
            let task = task.clone();
            let timeout = self.config.task_timeout;
            handles.push(tokio::spawn(async move {
                let started = std::time::Instant::now();
                let outcome = tokio::time::timeout(timeout, executor.execute(&task)).await;
                (task, outcome, started.elapsed())
            }));
        }

        let mut results = Vec::with_capacity(layer.len());
        let mut escalations = Vec::new();
        for (index, handle) in handles.into_iter().enumerate() {
            let (task, outcome, elapsed) = match handle.await {
                Ok(v) => v,
                Err(join_err) => {
                    warn!(error = %join_err, "task join panicked");
                    results.push(TaskResult {
                        task_id: layer[index].id.clone(),
                        status: TaskStatus::Error,
                        output: None,
                        execution_time_ms: 0,
                        layer_index,
                    });
                    continue;
                }
            };
            match outcome {
                Err(_elapsed) => results.push(TaskResult {
                    task_id: task.id.clone(),
                    status: TaskStatus::Error,
                    output: Some(serde_json::json!({"error": "timeout"})),
                    execution_time_ms: elapsed.as_millis() as u64,
                    layer_index,
                }),
                Ok(Err(ExecutorError::PermissionEscalationNeeded {
                    current_set,
                    requested_set,
                    detected_op,
                })) => {
                    escalations.push(PendingEscalation {
                        task_index: index,
                        task_id: task.id.clone(),
                        current_set,
                        requested_set,
                        detected_op,
                    });
                    results.push(TaskResult {
                        task_id: task.id.clone(),
                        status: TaskStatus::Pending,
                        output: None,
                        execution_time_ms: elapsed.as_millis() as u64,
                        layer_index,
                    });
                }
                Ok(Err(ExecutorError::Failed(message))) => {
                    let status = if task.failure_policy == FailurePolicy::FailSafe {
                        TaskStatus::FailedSafe
                    } else {
                        TaskStatus::Error
                    };
                    results.push(TaskResult {
                        task_id: task.id.clone(),
                        status,
                        output: Some(serde_json::json!({"error": message})),
                        execution_time_ms: elapsed.as_millis() as u64,
                        layer_index,
                    });
                }
                Ok(Ok(output)) => results.push(TaskResult {
                    task_id: task.id.clone(),
                    status: TaskStatus::Success,
                    output: Some(output),
                    execution_time_ms: elapsed.as_millis() as u64,
                    layer_index,
                }),
            }
        }
        (results, escalations)
    }

    async fn finish_layer(
        &self,
        state: &mut WorkflowState,
        events: &EventSender,
        layer_index: u32,
        results: Vec<TaskResult>,
    ) -> Result<()> {
        for result in &results {
            let event = match result.status {
                TaskStatus::Success | TaskStatus::FailedSafe => ExecutionEvent::TaskCompleted {
                    timestamp: Utc::now(),
                    workflow_id: state.workflow_id.clone(),
                    task_id: result.task_id.clone(),
                },
                TaskStatus::Error => ExecutionEvent::TaskFailed {
                    timestamp: Utc::now(),
                    workflow_id: state.workflow_id.clone(),
                    task_id: result.task_id.clone(),
                    error: result
                        .output
                        .as_ref()
                        .and_then(|v| v.get("error"))
                        .map(|v| v.to_string())
                        .unwrap_or_default(),
                },
                TaskStatus::Pending => continue,
            };
            events.send(event).await.ok();
        }
        state.results.extend(results);
        events
            .send(ExecutionEvent::LayerCompleted {
                timestamp: Utc::now(),
                workflow_id: state.workflow_id.clone(),
                layer: layer_index,
            })
            .await
            .ok();
        Ok(())
    }

    fn has_unrecoverable_failure(&self, state: &WorkflowState, layer: &[Task]) -> bool {
        layer.iter().any(|task| {
            task.failure_policy == FailurePolicy::FailStop
                && state
                    .results
                    .iter()
                    .any(|r| r.task_id == task.id && r.status == TaskStatus::Error)
        })
    }

    async fn checkpoint(&self, state: &mut WorkflowState) {
        let workflow_id = state.workflow_id.clone();
        let layer = state.current_layer as i64;
        let snapshot = state.to_checkpoint_state();
        let save_result = tooling::logging::timed(
            "checkpoint.save",
            self.checkpoints.save(&workflow_id, layer, snapshot),
        )
        .await;
        match save_result {
            Ok(id) => {
                state.latest_checkpoint_id = Some(id);
                let _ = self
                    .checkpoints
                    .prune(&workflow_id, self.config.checkpoint_retention, Some(id))
                    .await;
            }
            Err(err) => {
                // Save is fire-and-forget from the execution path's point of
                // view: log and keep going, durability sacrificed for progress.
                warn!(%err, workflow_id, "checkpoint save failed");
            }
        }
    }
}

struct SchedulerReexecutor {
    executor: Arc<dyn ICodeExecutor>,
    layer: Vec<Task>,
}

#[async_trait]
impl Reexecutor for SchedulerReexecutor {
    async fn reexecute(&self, task_id: &str, permission_set: &str) -> Result<TaskResult> {
        let mut task = self
            .layer
            .iter()
            .find(|t| t.id == task_id)
            .cloned()
            .ok_or_else(|| EngineError::not_found(format!("task {task_id}")))?;
        task.permission_set = permission_set.to_string();
        let started = std::time::Instant::now();
        let layer_index = 0; // overwritten by caller via splice; kept for shape
        match self.executor.execute(&task).await {
            Ok(output) => Ok(TaskResult {
                task_id: task.id,
                status: TaskStatus::Success,
                output: Some(output),
                execution_time_ms: started.elapsed().as_millis() as u64,
                layer_index,
            }),
            Err(ExecutorError::Failed(message)) => Ok(TaskResult {
                task_id: task.id,
                status: TaskStatus::Error,
                output: Some(serde_json::json!({"error": message})),
                execution_time_ms: started.elapsed().as_millis() as u64,
                layer_index,
            }),
            Err(ExecutorError::PermissionEscalationNeeded { requested_set, .. }) => {
                Err(EngineError::PermissionEscalationNeeded {
                    current_set: permission_set.to_string(),
                    requested_set,
                    detected_op: "unknown".to_string(),
                })
            }
        }
    }
}

fn try_recv_abort(commands: &mut CommandReceiver) -> Result<Option<Command>> {
    // Non-blocking poll so the scheduler can still react to an abort issued
    // between layers without a pending decision to wait on. `CommandReceiver`
    // wraps a Tokio mpsc receiver; a bounded single-step poll is implemented
    // by racing against an already-ready future.
    match commands.recv_now() {
        Some(command @ Command::Abort { .. }) => Ok(Some(command)),
        Some(_) | None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Dag, Task, TaskKind};

    fn tool_task(id: &str, depends_on: &[&str]) -> Task {
        Task {
            id: id.to_string(),
            call_name: id.to_string(),
            kind: TaskKind::Tool,
            input_schema: None,
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
            failure_policy: FailurePolicy::FailStop,
            permission_set: "minimal".to_string(),
            requires_approval: false,
        }
    }

    #[test]
    fn layers_form_valid_topological_partition() {
        let dag = Dag {
            tasks: vec![
                tool_task("a", &[]),
                tool_task("b", &[]),
                tool_task("c", &["a", "b"]),
            ],
        };
        let layers = layer_dag(&dag).unwrap();
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].len(), 2);
        assert_eq!(layers[1][0].id, "c");
    }

    #[test]
    fn cyclic_dag_is_rejected() {
        let dag = Dag {
            tasks: vec![tool_task("a", &["b"]), tool_task("b", &["a"])],
        };
        assert!(layer_dag(&dag).is_err());
    }
}
