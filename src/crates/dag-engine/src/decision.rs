//! AIL (agent-in-loop) and HIL (human-in-loop) approval protocols.
//!
//! Both are modeled as the same two-phase shape: a non-blocking `prepare`
//! that emits a `decision_required` event and returns immediately, followed
//! by a blocking `wait` that awaits the matching command. This mirrors the
//! interrupt/resume split the teacher's `interrupt` module uses for pausing
//! graph execution at named nodes, generalized here to layer boundaries.

use crate::channels::{Command, CommandReceiver, DecisionType, EventSender, ExecutionEvent};
use crate::error::{EngineError, Result};
use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;
use chrono::Utc;

/// Outcome of a decision wait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    Continue,
    Replan { new_requirement: String },
    Abort { reason: String },
    Approved { feedback: Option<String> },
    Rejected { feedback: Option<String> },
}

/// Encapsulates the AIL/HIL protocols. Implementations must not block
/// inside `prepare` — only `wait` may suspend.
#[async_trait]
pub trait DecisionStrategy: Send + Sync {
    /// Emit a `decision_required` event describing the gate; return its
    /// checkpoint id so the caller can match the eventual command.
    async fn prepare(
        &self,
        events: &EventSender,
        workflow_id: &str,
        decision_type: DecisionType,
        description: String,
        context: Value,
    ) -> Result<Uuid>;

    /// Block until a command matching `checkpoint_id` arrives (or the
    /// configured timeout elapses).
    async fn wait(
        &self,
        commands: &mut CommandReceiver,
        workflow_id: &str,
        checkpoint_id: Uuid,
        timeout: Option<std::time::Duration>,
    ) -> Result<DecisionOutcome>;
}

/// Production implementation: emits real events, waits on the real command
/// queue, and enforces the configured timeout.
pub struct ChannelDecisionStrategy;

#[async_trait]
impl DecisionStrategy for ChannelDecisionStrategy {
    async fn prepare(
        &self,
        events: &EventSender,
        workflow_id: &str,
        decision_type: DecisionType,
        description: String,
        context: Value,
    ) -> Result<Uuid> {
        let checkpoint_id = Uuid::new_v4();
        events
            .send(ExecutionEvent::DecisionRequired {
                timestamp: Utc::now(),
                workflow_id: workflow_id.to_string(),
                checkpoint_id,
                decision_type,
                description,
                context,
            })
            .await
            .map_err(|e| EngineError::InternalError(format!("event stream closed: {e}")))?;
        Ok(checkpoint_id)
    }

    async fn wait(
        &self,
        commands: &mut CommandReceiver,
        workflow_id: &str,
        checkpoint_id: Uuid,
        timeout: Option<std::time::Duration>,
    ) -> Result<DecisionOutcome> {
        let recv_loop = async {
            loop {
                match commands.recv().await {
                    None => return Ok(DecisionOutcome::Abort {
                        reason: "command queue closed".to_string(),
                    }),
                    Some(Command::Continue) => return Ok(DecisionOutcome::Continue),
                    Some(Command::Abort { reason }) => return Ok(DecisionOutcome::Abort { reason }),
                    Some(Command::Replan { new_requirement, .. }) => {
                        return Ok(DecisionOutcome::Replan { new_requirement })
                    }
                    Some(Command::ApprovalResponse {
                        checkpoint_id: cp,
                        approved,
                        feedback,
                    }) if cp == checkpoint_id => {
                        return Ok(if approved {
                            DecisionOutcome::Approved { feedback }
                        } else {
                            DecisionOutcome::Rejected { feedback }
                        });
                    }
                    Some(Command::PermissionEscalationResponse { checkpoint_id: cp, approved })
                        if cp == checkpoint_id =>
                    {
                        return Ok(if approved {
                            DecisionOutcome::Approved { feedback: None }
                        } else {
                            DecisionOutcome::Rejected { feedback: None }
                        });
                    }
                    // Command addressed to a different pending decision; ignore.
                    Some(_) => continue,
                }
            }
        };

        match timeout {
            Some(duration) => tokio::time::timeout(duration, recv_loop)
                .await
                .map_err(|_| EngineError::WorkflowTimeout {
                    workflow_id: workflow_id.to_string(),
                })?,
            None => recv_loop.await,
        }
    }
}

/// Always continues without emitting anything; used in scheduler tests that
/// don't exercise the AIL/HIL gates.
pub struct NullDecisionStrategy;

#[async_trait]
impl DecisionStrategy for NullDecisionStrategy {
    async fn prepare(
        &self,
        _events: &EventSender,
        _workflow_id: &str,
        _decision_type: DecisionType,
        _description: String,
        _context: Value,
    ) -> Result<Uuid> {
        Ok(Uuid::new_v4())
    }

    async fn wait(
        &self,
        _commands: &mut CommandReceiver,
        _workflow_id: &str,
        _checkpoint_id: Uuid,
        _timeout: Option<std::time::Duration>,
    ) -> Result<DecisionOutcome> {
        Ok(DecisionOutcome::Continue)
    }
}
