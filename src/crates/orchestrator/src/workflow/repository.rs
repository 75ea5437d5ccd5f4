//! WorkflowRepository (C11): the runtime registry of in-flight workflows.
//!
//! Each entry owns a running workflow's command queue, a background task
//! draining its event stream, and the scheduler task itself. `create`
//! spawns both tasks immediately; `delete` sends an abort command and then
//! cancels both tasks outright, so a deleted workflow never leaks a
//! scheduler loop or a mirror task.
//!
//! The scheduler only ever mutates the `WorkflowState` it owns directly (it
//! takes `&mut WorkflowState`); external readers never see that copy. The
//! mirror task is what makes the workflow observable from outside: it
//! folds each [`ExecutionEvent`] onto a separate, shared `Arc<RwLock<WorkflowState>>`
//! that `get`/`list_active`/`list_awaiting_approval` read from.

use dag_engine::channels::{command_channel, event_channel, ChannelConfig};
use dag_engine::model::{Dag, WorkflowState, WorkflowStatus};
use dag_engine::scheduler::LayerScheduler;
use dag_engine::{Command, CommandSender, ExecutionEvent};
use checkpoint_store::CheckpointSaver;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// One registered workflow's runtime handles.
struct WorkflowEntry {
    state: Arc<RwLock<WorkflowState>>,
    commands: CommandSender,
    run_handle: JoinHandle<()>,
    mirror_handle: JoinHandle<()>,
}

/// Runtime registry owning every in-flight workflow's command queue, event
/// stream, and scheduler task, keyed by workflow id.
pub struct WorkflowRepository<C: CheckpointSaver + 'static> {
    scheduler: Arc<LayerScheduler<C>>,
    entries: Arc<RwLock<HashMap<Uuid, WorkflowEntry>>>,
}

impl<C: CheckpointSaver + 'static> WorkflowRepository<C> {
    pub fn new(scheduler: Arc<LayerScheduler<C>>) -> Self {
        Self {
            scheduler,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Registers a new workflow and starts it running, returning its id.
    pub async fn create(&self, dag: Dag, intent: Option<String>) -> Uuid {
        let id = Uuid::new_v4();
        let mut owned_state = WorkflowState::new(id.to_string(), dag, intent);
        let shared_state = Arc::new(RwLock::new(owned_state.clone()));

        let (event_tx, mut event_rx) = event_channel(ChannelConfig::default());
        let (command_tx, mut command_rx) = command_channel(ChannelConfig::default());

        let scheduler = self.scheduler.clone();
        let run_handle = tokio::spawn(async move {
            if let Err(err) = scheduler.run(&mut owned_state, &event_tx, &mut command_rx).await {
                tracing::warn!(workflow_id = %owned_state.workflow_id, error = %err, "workflow run ended with an error");
            }
        });

        let mirror_state = shared_state.clone();
        let mirror_handle = tokio::spawn(async move {
            while let Some(event) = event_rx.recv().await {
                apply_event(&mirror_state, event).await;
            }
        });

        let entry = WorkflowEntry {
            state: shared_state,
            commands: command_tx,
            run_handle,
            mirror_handle,
        };
        self.entries.write().await.insert(id, entry);
        id
    }

    /// A read-only snapshot of one workflow's current state.
    pub async fn get(&self, workflow_id: Uuid) -> Option<WorkflowState> {
        let entries = self.entries.read().await;
        let entry = entries.get(&workflow_id)?;
        Some(entry.state.read().await.clone())
    }

    /// Sends a command into a running workflow (approval response, replan,
    /// abort). No-op on an unknown id.
    pub async fn update(&self, workflow_id: Uuid, command: Command) -> bool {
        let entries = self.entries.read().await;
        let Some(entry) = entries.get(&workflow_id) else {
            return false;
        };
        entry.commands.send(command).await.is_ok()
    }

    /// Aborts and deregisters a workflow, cancelling its scheduler and
    /// mirror tasks outright.
    pub async fn delete(&self, workflow_id: Uuid) -> bool {
        let Some(entry) = self.entries.write().await.remove(&workflow_id) else {
            return false;
        };
        let _ = entry
            .commands
            .send(Command::Abort {
                reason: "deleted from the workflow registry".to_string(),
            })
            .await;
        entry.run_handle.abort();
        entry.mirror_handle.abort();
        true
    }

    pub async fn list_active(&self) -> Vec<WorkflowState> {
        self.list_by(|status| matches!(status, WorkflowStatus::Running | WorkflowStatus::Paused)).await
    }

    pub async fn list_awaiting_approval(&self) -> Vec<WorkflowState> {
        self.list_by(|status| matches!(status, WorkflowStatus::AwaitingApproval)).await
    }

    async fn list_by(&self, predicate: impl Fn(WorkflowStatus) -> bool) -> Vec<WorkflowState> {
        let entries = self.entries.read().await;
        let mut matched = Vec::new();
        for entry in entries.values() {
            let state = entry.state.read().await;
            if predicate(state.status) {
                matched.push(state.clone());
            }
        }
        matched
    }
}

/// Folds one execution event onto the externally-visible mirror state.
async fn apply_event(state: &Arc<RwLock<WorkflowState>>, event: ExecutionEvent) {
    let mut state = state.write().await;
    match event {
        ExecutionEvent::DagStarted { total_layers, .. } => {
            state.status = WorkflowStatus::Running;
            state.total_layers = total_layers;
        }
        ExecutionEvent::TaskStarted { .. } | ExecutionEvent::TaskCompleted { .. } | ExecutionEvent::TaskFailed { .. } => {
            // Per-task events don't change workflow-level status; the
            // scheduler's own results vector is authoritative and isn't
            // mirrored here to avoid duplicating its bookkeeping.
        }
        ExecutionEvent::LayerCompleted { layer, .. } => {
            state.current_layer = layer + 1;
        }
        ExecutionEvent::DecisionRequired { checkpoint_id, .. } => {
            state.status = WorkflowStatus::AwaitingApproval;
            state.latest_checkpoint_id = Some(checkpoint_id);
        }
        ExecutionEvent::WorkflowCompleted { .. } => {
            state.status = WorkflowStatus::Completed;
        }
        ExecutionEvent::WorkflowAborted { .. } => {
            state.status = WorkflowStatus::Aborted;
        }
        ExecutionEvent::CheckpointSaved { checkpoint_id, .. } => {
            state.latest_checkpoint_id = Some(checkpoint_id);
        }
    }
    state.updated_at = chrono::Utc::now();
}
