//! Workflow orchestration module
//!
//! Provides multi-step workflow execution with conditional transitions
//! and state management.

pub mod executor;
pub mod repository;

pub use executor::WorkflowExecutor;
pub use repository::WorkflowRepository;
