//! Deferred Escalation Pattern: handling `PermissionEscalationNeeded` without
//! deadlocking the layer join.
//!
//! A task executor that hits a permission wall cannot be awaited with a
//! blocking wait *inside* the join that collects layer results — the
//! scheduler cannot yield mid-join without stalling its siblings. Instead
//! escalations are collected after the join completes (**prepare phase**)
//! and resolved one at a time afterward (**process phase**), splicing any
//! re-executed result back into the original layer-results vector by index.

use crate::channels::{CommandReceiver, DecisionType, EventSender};
use crate::decision::{DecisionOutcome, DecisionStrategy};
use crate::error::Result;
use crate::model::{TaskResult, TaskStatus};
use serde_json::json;

/// A task that raised `PermissionEscalationNeeded` during a layer join.
#[derive(Debug, Clone)]
pub struct PendingEscalation {
    pub task_index: usize,
    pub task_id: String,
    pub current_set: String,
    pub requested_set: String,
    pub detected_op: String,
}

/// Fixed suggestion table: detected operation -> recommended authorized tool.
pub fn suggested_tool(detected_op: &str) -> &'static str {
    match detected_op {
        "net" => "primitives:http_get or primitives:http_post",
        "read" => "primitives:read_file",
        "write" => "primitives:write_file",
        "env" => "restricted",
        "run" => "disallowed",
        "ffi" => "disallowed",
        _ => "consider an authorized tool",
    }
}

/// A re-executable task, abstracted so this module has no dependency on the
/// concrete `ICodeExecutor` contract beyond "run it and get a result".
#[async_trait::async_trait]
pub trait Reexecutor: Send + Sync {
    async fn reexecute(&self, task_id: &str, permission_set: &str) -> Result<TaskResult>;
}

/// Prepare phase: scan settled layer results, emit one `decision_required`
/// per escalation, and return the list for the process phase.
pub async fn prepare(
    events: &EventSender,
    workflow_id: &str,
    strategy: &dyn DecisionStrategy,
    escalations: &[PendingEscalation],
) -> Result<Vec<(PendingEscalation, uuid::Uuid)>> {
    let mut prepared = Vec::with_capacity(escalations.len());
    for escalation in escalations {
        let description = format!(
            "task {} requested '{}' (currently '{}'); suggestion: use {}",
            escalation.task_id,
            escalation.requested_set,
            escalation.current_set,
            suggested_tool(&escalation.detected_op),
        );
        let checkpoint_id = strategy
            .prepare(
                events,
                workflow_id,
                DecisionType::Hil,
                description,
                json!({
                    "task_id": escalation.task_id,
                    "current_set": escalation.current_set,
                    "requested_set": escalation.requested_set,
                    "detected_op": escalation.detected_op,
                }),
            )
            .await?;
        prepared.push((escalation.clone(), checkpoint_id));
    }
    Ok(prepared)
}

/// Process phase: await each escalation's matching command, re-executing
/// approved tasks and splicing the result back at its original index.
pub async fn process(
    commands: &mut CommandReceiver,
    workflow_id: &str,
    strategy: &dyn DecisionStrategy,
    reexecutor: &dyn Reexecutor,
    prepared: Vec<(PendingEscalation, uuid::Uuid)>,
    results: &mut [TaskResult],
) -> Result<()> {
    for (escalation, checkpoint_id) in prepared {
        let outcome = strategy.wait(commands, workflow_id, checkpoint_id, None).await?;
        match outcome {
            DecisionOutcome::Approved { .. } => {
                let result = reexecutor
                    .reexecute(&escalation.task_id, &escalation.requested_set)
                    .await?;
                if let Some(slot) = results.get_mut(escalation.task_index) {
                    *slot = result;
                }
            }
            DecisionOutcome::Rejected { feedback } => {
                if let Some(slot) = results.get_mut(escalation.task_index) {
                    slot.status = TaskStatus::Error;
                    slot.output = Some(json!({
                        "rejected": true,
                        "feedback": feedback,
                    }));
                }
            }
            DecisionOutcome::Abort { .. } | DecisionOutcome::Continue | DecisionOutcome::Replan { .. } => {
                // Treated as a rejection for this escalation's purposes; the
                // scheduler handles the broader abort/replan transition.
                if let Some(slot) = results.get_mut(escalation.task_index) {
                    slot.status = TaskStatus::Error;
                }
            }
        }
    }
    Ok(())
}
