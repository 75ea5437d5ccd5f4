//! Error types for the hypergraph, scorer, pathfinder, suggester, and
//! learner components.

use thiserror::Error;

/// Result type for hypergraph operations.
pub type Result<T> = std::result::Result<T, HypergraphError>;

/// Errors surfaced by C2-C5 and C12. `ScorerError`/`PathfinderError` are
/// fatal only to the current suggestion call; the Suggester degrades to
/// `confidence: 0` rather than propagating them to its caller.
#[derive(Error, Debug)]
pub enum HypergraphError {
    /// A capability import would introduce a cycle in its transitive
    /// membership closure; refused at registration, not traversal time.
    #[error("registering capability {0} would introduce a membership cycle")]
    CyclicCapability(String),

    /// A referenced member id is neither a known tool nor a known capability.
    #[error("unknown member {0}")]
    UnknownMember(String),

    /// Embedding dimension mismatch; fatal to the record that carries it,
    /// not to the rest of the store.
    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Internal scorer failure (e.g. empty weight vector).
    #[error("scorer error: {0}")]
    ScorerError(String),

    /// Internal pathfinder failure (e.g. malformed supernode expansion).
    #[error("pathfinder error: {0}")]
    PathfinderError(String),

    /// Underlying graph-store error.
    #[error("graph error: {0}")]
    Graph(#[from] dag_engine::EngineError),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Everything else.
    #[error("internal error: {0}")]
    Internal(String),
}
