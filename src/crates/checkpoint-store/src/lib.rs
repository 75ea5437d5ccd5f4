//! checkpoint-store - Workflow state persistence
//!
//! Durable snapshots of workflow state sufficient to resume, replan, or
//! abort a DAG execution. A checkpoint is a flat `{id, workflow_id,
//! timestamp, layer, state}` record; the store never interprets `state`
//! beyond the handful of shape checks run on save.
//!
//! ## Core Types
//!
//! - [`checkpoint`] - [`Checkpoint`]
//! - [`traits`] - [`CheckpointSaver`] trait
//! - [`memory`] - [`InMemoryCheckpointSaver`] reference implementation
//! - [`error`] - [`CheckpointError`]
//!
//! ## Quick Start
//!
//! ```rust
//! use checkpoint_store::{CheckpointSaver, InMemoryCheckpointSaver};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> checkpoint_store::Result<()> {
//! let saver = InMemoryCheckpointSaver::new();
//! let id = saver.save("wf-1", 0, json!({"messages": []})).await?;
//! let checkpoint = saver.load(id).await?.unwrap();
//! assert_eq!(checkpoint.workflow_id, "wf-1");
//! # Ok(())
//! # }
//! ```

pub mod checkpoint;
pub mod error;
pub mod memory;
pub mod traits;

pub use checkpoint::Checkpoint;
pub use error::{CheckpointError, Result};
pub use memory::InMemoryCheckpointSaver;
pub use traits::CheckpointSaver;
