//! Tool/capability hypergraph, SHGAT scorer, DR-DSP pathfinder, suggester,
//! and learner.
//!
//! Tools are vertices; capabilities are hyperedges over the transitive
//! closure of their members. Five pieces build on that structure:
//!
//! - [`hypergraph`] — the incidence matrix and membership-cycle guard (C2).
//! - [`scorer`] — K-head attention scoring of capabilities against an
//!   intent embedding (C3).
//! - [`pathfinder`] — backward Dijkstra over a supernode-expanded graph for
//!   minimum-weight hyperpaths between two tools (C4).
//! - [`suggester`] — composes the above into one intent-to-DAG call (C5).
//! - [`learner`] — trace-derived edges, prioritized replay, and the
//!   adaptive suggestion threshold (C12).
//!
//! The ordinary node/edge graph ([`dag_engine::GraphStore`]) remains the
//! exclusive owner of tool/capability structure in the wider system; this
//! crate holds only ids into it plus the data these five pieces need that
//! `GraphStore` doesn't model (embeddings, incidence, replay, attention
//! weights).

pub mod error;
pub mod hypergraph;
pub mod learner;
pub mod model;
pub mod pathfinder;
pub mod scorer;
pub mod suggester;

pub use error::{HypergraphError, Result};
pub use hypergraph::{Hypergraph, IncidenceStats};
pub use learner::{AdaptiveThreshold, Learner, Outcome, ReplayBuffer, TrainReport};
pub use model::{Capability, ExecutionTrace, Member, MemberKind, Tool, TraceDecision, TraceTaskResult, TrainingExample};
pub use pathfinder::{PathResult, Pathfinder};
pub use scorer::{CapabilityMatch, FeatureContributions, Scorer, ScorerWeights};
pub use suggester::{Embedder, SuggestResult, Suggester};
