//! dag-engine — layered, resumable DAG execution engine
//!
//! Runs workflows expressed as directed acyclic graphs of tool/capability
//! invocations. A workflow is partitioned into topological layers
//! ([`scheduler::layer_dag`]); each layer's tasks run concurrently with a
//! per-task timeout; between layers the engine optionally checkpoints
//! ([`checkpoint-store`][checkpoint_store]), asks an AIL/HIL gate for
//! permission to continue ([`decision`]), and resolves any deferred
//! permission escalations ([`escalation`]).
//!
//! ## Modules
//!
//! - [`graph`] — `GraphStore`, the typed directed graph of tools/capabilities.
//! - [`model`] — `Dag`, `Task`, `TaskResult`, `WorkflowState`.
//! - [`channels`] — `CommandQueue`/`EventStream` primitives and wire types.
//! - [`scheduler`] — `LayerScheduler`, the state machine driving a workflow.
//! - [`decision`] — AIL/HIL `DecisionStrategy`.
//! - [`escalation`] — the Deferred Escalation Pattern for permission requests.
//! - [`error`] — `EngineError`.

pub mod channels;
pub mod decision;
pub mod error;
pub mod escalation;
pub mod graph;
pub mod model;
pub mod scheduler;

pub use channels::{Command, CommandReceiver, CommandSender, ExecutionEvent, EventReceiver, EventSender};
pub use error::{EngineError, Result};
pub use graph::GraphStore;
pub use model::{Dag, Task, TaskResult, WorkflowState};
pub use scheduler::{ICodeExecutor, LayerScheduler, NullReplanner, Replanner, SchedulerConfig};
