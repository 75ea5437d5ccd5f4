//! Bounded async channels carrying control commands in and execution events
//! out of a running workflow.
//!
//! Built on `tokio::sync::mpsc`, the same primitive the teacher's Pregel
//! loop used for its internal step channel. Both directions are bounded so
//! a slow consumer applies back-pressure to its producer rather than
//! unbounded memory growth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Default channel capacity; configurable per workflow via [`ChannelConfig`].
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy)]
pub struct ChannelConfig {
    pub capacity: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Decision gate kind attached to a `decision_required` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionType {
    Ail,
    Hil,
}

/// Events produced by the scheduler, consumed by an external transport
/// (RPC stream, dashboard, CLI). Event order within a workflow is strictly
/// the order emitted by its scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExecutionEvent {
    DagStarted {
        timestamp: DateTime<Utc>,
        workflow_id: String,
        total_layers: u32,
    },
    TaskStarted {
        timestamp: DateTime<Utc>,
        workflow_id: String,
        task_id: String,
    },
    TaskCompleted {
        timestamp: DateTime<Utc>,
        workflow_id: String,
        task_id: String,
    },
    TaskFailed {
        timestamp: DateTime<Utc>,
        workflow_id: String,
        task_id: String,
        error: String,
    },
    LayerCompleted {
        timestamp: DateTime<Utc>,
        workflow_id: String,
        layer: u32,
    },
    DecisionRequired {
        timestamp: DateTime<Utc>,
        workflow_id: String,
        checkpoint_id: Uuid,
        decision_type: DecisionType,
        description: String,
        context: Value,
    },
    WorkflowCompleted {
        timestamp: DateTime<Utc>,
        workflow_id: String,
        successful_tasks: u32,
        failed_tasks: u32,
    },
    WorkflowAborted {
        timestamp: DateTime<Utc>,
        workflow_id: String,
        completed_layers: u32,
        reason: String,
    },
    CheckpointSaved {
        timestamp: DateTime<Utc>,
        workflow_id: String,
        checkpoint_id: Uuid,
    },
}

/// Commands accepted from the external caller, matched to a pending
/// `decision_required` event by `checkpoint_id` where applicable.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    Continue,
    Abort {
        reason: String,
    },
    Replan {
        new_requirement: String,
        context: Option<Value>,
    },
    ApprovalResponse {
        checkpoint_id: Uuid,
        approved: bool,
        feedback: Option<String>,
    },
    PermissionEscalationResponse {
        checkpoint_id: Uuid,
        approved: bool,
    },
}

/// Producer handle for a workflow's event stream.
#[derive(Clone)]
pub struct EventSender(mpsc::Sender<ExecutionEvent>);

/// Consumer handle for a workflow's event stream.
pub struct EventReceiver(mpsc::Receiver<ExecutionEvent>);

impl EventSender {
    pub async fn send(&self, event: ExecutionEvent) -> Result<(), mpsc::error::SendError<ExecutionEvent>> {
        self.0.send(event).await
    }
}

impl EventReceiver {
    pub async fn recv(&mut self) -> Option<ExecutionEvent> {
        self.0.recv().await
    }
}

/// Producer handle for a workflow's command queue (the external caller).
#[derive(Clone)]
pub struct CommandSender(mpsc::Sender<Command>);

/// Consumer handle for a workflow's command queue (the scheduler).
pub struct CommandReceiver(mpsc::Receiver<Command>);

impl CommandSender {
    pub async fn send(&self, command: Command) -> Result<(), mpsc::error::SendError<Command>> {
        self.0.send(command).await
    }
}

impl CommandReceiver {
    pub async fn recv(&mut self) -> Option<Command> {
        self.0.recv().await
    }

    /// Non-blocking poll, used between layers to notice an out-of-band
    /// `abort` without waiting on a pending decision.
    pub fn recv_now(&mut self) -> Option<Command> {
        self.0.try_recv().ok()
    }
}

/// Construct a paired event stream for one workflow.
pub fn event_channel(config: ChannelConfig) -> (EventSender, EventReceiver) {
    let (tx, rx) = mpsc::channel(config.capacity);
    (EventSender(tx), EventReceiver(rx))
}

/// Construct a paired command queue for one workflow.
pub fn command_channel(config: ChannelConfig) -> (CommandSender, CommandReceiver) {
    let (tx, rx) = mpsc::channel(config.capacity);
    (CommandSender(tx), CommandReceiver(rx))
}
