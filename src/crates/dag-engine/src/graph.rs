//! Typed directed graph of tools and capabilities.
//!
//! `GraphStore` is the single owner of every node and edge in the system
//! (see the ownership rules in the data model: the [`crate::graph`]
//! is the exclusive writer; the hypergraph crate holds only ids into it).
//!
//! # Quick Start
//!
//! ```rust
//! use dag_engine::graph::{GraphStore, EdgeType, EdgeSource};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> dag_engine::error::Result<()> {
//! let store = GraphStore::new();
//! store.add_node("tool:a", json!({})).await?;
//! store.add_node("tool:b", json!({})).await?;
//! store.add_edge("tool:a", "tool:b", EdgeType::Dependency, EdgeSource::Observed).await?;
//! assert!(store.has_edge("tool:a", "tool:b").await);
//! # Ok(())
//! # }
//! ```

use crate::error::{EngineError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Edge semantics. `Contains`/`sequence` are Learner-derived; `dependency` and
/// `alternative`/`provides` may additionally be declared directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeType {
    Dependency,
    Contains,
    Provides,
    Sequence,
    Alternative,
}

/// Where an edge's existence was learned from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeSource {
    Observed,
    Inferred,
    Template,
}

fn base_weight(edge_type: EdgeType) -> f64 {
    match edge_type {
        EdgeType::Dependency => 0.9,
        EdgeType::Contains => 0.8,
        EdgeType::Provides => 0.7,
        EdgeType::Sequence => 0.6,
        EdgeType::Alternative => 0.5,
    }
}

fn source_modifier(edge_source: EdgeSource) -> f64 {
    match edge_source {
        EdgeSource::Observed => 1.0,
        EdgeSource::Inferred => 0.8,
        EdgeSource::Template => 0.6,
    }
}

/// Default count at which an `inferred` edge is promoted to `observed`.
pub const DEFAULT_OBSERVED_EDGE_THRESHOLD: u32 = 3;

/// A directed edge between two node ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub src: String,
    pub dst: String,
    pub edge_type: EdgeType,
    pub edge_source: EdgeSource,
    pub count: u32,
    pub weight: f64,
}

impl Edge {
    fn new(src: &str, dst: &str, edge_type: EdgeType, edge_source: EdgeSource) -> Self {
        Self {
            src: src.to_string(),
            dst: dst.to_string(),
            edge_type,
            edge_source,
            count: 1,
            weight: base_weight(edge_type) * source_modifier(edge_source),
        }
    }

    fn recompute_weight(&mut self) {
        self.weight = base_weight(self.edge_type) * source_modifier(self.edge_source);
    }
}

/// Direction to search when listing neighbors of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    In,
    Out,
    Both,
}

/// Structural event emitted by the graph store on mutation.
///
/// Consumed by [`crate::channels::EventStream`] producers upstream; kept as
/// a plain enum here so the graph store has no dependency on the scheduler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GraphEvent {
    EdgeCreated { src: String, dst: String },
    EdgeUpdated { src: String, dst: String, count: u32 },
}

#[derive(Default)]
struct Inner {
    node_attrs: HashMap<String, Value>,
    edges: HashMap<(String, String), Edge>,
    out_adjacency: HashMap<String, Vec<String>>,
    in_adjacency: HashMap<String, Vec<String>>,
    edges_by_type: HashMap<EdgeType, Vec<(String, String)>>,
}

/// Thread-safe store of nodes and directed edges.
///
/// Single writer per the ownership rule in the data model: in this
/// workspace that writer is the Learner (trace ingestion) plus the
/// Suggester for template edges at suggestion time.
#[derive(Clone)]
pub struct GraphStore {
    inner: Arc<RwLock<Inner>>,
    observed_edge_threshold: u32,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
            observed_edge_threshold: DEFAULT_OBSERVED_EDGE_THRESHOLD,
        }
    }

    pub fn with_observed_edge_threshold(mut self, threshold: u32) -> Self {
        self.observed_edge_threshold = threshold;
        self
    }

    pub async fn add_node(&self, id: impl Into<String>, attrs: Value) -> Result<()> {
        let id = id.into();
        let mut inner = self.inner.write().await;
        inner.node_attrs.entry(id).or_insert(attrs);
        Ok(())
    }

    pub async fn has_node(&self, id: &str) -> bool {
        self.inner.read().await.node_attrs.contains_key(id)
    }

    pub async fn has_edge(&self, src: &str, dst: &str) -> bool {
        self.inner
            .read()
            .await
            .edges
            .contains_key(&(src.to_string(), dst.to_string()))
    }

    pub async fn get_node_attrs(&self, id: &str) -> Option<Value> {
        self.inner.read().await.node_attrs.get(id).cloned()
    }

    pub async fn get_edge_attrs(&self, src: &str, dst: &str) -> Option<Edge> {
        self.inner
            .read()
            .await
            .edges
            .get(&(src.to_string(), dst.to_string()))
            .cloned()
    }

    /// Auto-creates missing endpoints as bare `tool` nodes. Rejects
    /// self-loops. Re-adding an existing `(src, dst)` pair increments
    /// `count`, recomputes `weight`, and may promote `inferred` to
    /// `observed` once `count` crosses the observed-edge threshold.
    pub async fn add_edge(
        &self,
        src: &str,
        dst: &str,
        edge_type: EdgeType,
        edge_source: EdgeSource,
    ) -> Result<GraphEvent> {
        if src == dst {
            return Err(EngineError::SelfLoop(src.to_string()));
        }
        let mut inner = self.inner.write().await;
        inner
            .node_attrs
            .entry(src.to_string())
            .or_insert_with(|| serde_json::json!({"type": "tool"}));
        inner
            .node_attrs
            .entry(dst.to_string())
            .or_insert_with(|| serde_json::json!({"type": "tool"}));

        let key = (src.to_string(), dst.to_string());
        let threshold = self.observed_edge_threshold;
        let event = if let Some(edge) = inner.edges.get_mut(&key) {
            edge.count += 1;
            if edge.edge_source == EdgeSource::Inferred && edge.count >= threshold {
                edge.edge_source = EdgeSource::Observed;
            }
            edge.recompute_weight();
            GraphEvent::EdgeUpdated {
                src: src.to_string(),
                dst: dst.to_string(),
                count: edge.count,
            }
        } else {
            let edge = Edge::new(src, dst, edge_type, edge_source);
            inner.edges.insert(key.clone(), edge);
            inner
                .out_adjacency
                .entry(src.to_string())
                .or_default()
                .push(dst.to_string());
            inner
                .in_adjacency
                .entry(dst.to_string())
                .or_default()
                .push(src.to_string());
            inner
                .edges_by_type
                .entry(edge_type)
                .or_default()
                .push(key);
            GraphEvent::EdgeCreated {
                src: src.to_string(),
                dst: dst.to_string(),
            }
        };
        Ok(event)
    }

    pub async fn neighbors(&self, id: &str, direction: Direction) -> Vec<String> {
        let inner = self.inner.read().await;
        match direction {
            Direction::Out => inner.out_adjacency.get(id).cloned().unwrap_or_default(),
            Direction::In => inner.in_adjacency.get(id).cloned().unwrap_or_default(),
            Direction::Both => {
                let mut both = inner.out_adjacency.get(id).cloned().unwrap_or_default();
                both.extend(inner.in_adjacency.get(id).cloned().unwrap_or_default());
                both
            }
        }
    }

    pub async fn degree(&self, id: &str, direction: Direction) -> usize {
        self.neighbors(id, direction).await.len()
    }

    pub async fn edges_by_type(&self, edge_type: EdgeType) -> Vec<Edge> {
        let inner = self.inner.read().await;
        inner
            .edges_by_type
            .get(&edge_type)
            .into_iter()
            .flatten()
            .filter_map(|key| inner.edges.get(key).cloned())
            .collect()
    }

    pub async fn for_each_node<F: FnMut(&str, &Value)>(&self, mut f: F) {
        let inner = self.inner.read().await;
        for (id, attrs) in &inner.node_attrs {
            f(id, attrs);
        }
    }

    pub async fn for_each_edge<F: FnMut(&Edge)>(&self, mut f: F) {
        let inner = self.inner.read().await;
        for edge in inner.edges.values() {
            f(edge);
        }
    }

    /// A consistent, copy-on-read snapshot for the scorer/pathfinder/learner,
    /// which must not observe a torn write mid-iteration.
    pub async fn snapshot(&self) -> GraphSnapshot {
        let inner = self.inner.read().await;
        GraphSnapshot {
            node_attrs: inner.node_attrs.clone(),
            edges: inner.edges.values().cloned().collect(),
        }
    }
}

/// Read-only, owned copy of the graph state at a point in time.
#[derive(Debug, Clone, Default)]
pub struct GraphSnapshot {
    pub node_attrs: HashMap<String, Value>,
    pub edges: Vec<Edge>,
}
