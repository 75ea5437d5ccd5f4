//! Hypergraph (C2): tools as vertices, capabilities as hyperedges.
//!
//! Owns `tool_index`/`cap_index`, insertion-order maps from id to a dense
//! column/row position, plus the 0/1 incidence matrix `A[tools x caps]`.
//! `rebuild_indices` recomputes the whole matrix from scratch after any
//! structural change by walking, per capability, a transitive DFS over
//! `members` of type `capability` (visited-set cycle guard) to collect
//! every reachable tool member — this lets a meta-capability match an
//! intent even when its direct members are other capabilities.
//!
//! # Quick Start
//!
//! ```rust
//! # #[tokio::main]
//! # async fn main() -> hypergraph::error::Result<()> {
//! use hypergraph::hypergraph::Hypergraph;
//! use hypergraph::model::{Capability, Member, MemberKind, Tool};
//!
//! let graph = Hypergraph::new();
//! graph.register_tool(Tool { tool_id: "fs:read".into(), embedding: vec![0.1; 8], pagerank: None, community: None }).await?;
//! let cap = Capability::new("cap:read-and-summarize", vec![0.2; 8])
//!     .with_members(vec![Member { id: "fs:read".into(), kind: MemberKind::Tool }]);
//! graph.register_capability(cap).await?;
//! assert!(graph.incidence_stats().await.tools >= 1);
//! # Ok(())
//! # }
//! ```

use crate::error::{HypergraphError, Result};
use crate::model::{Capability, MemberKind, Tool};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Insertion-order id -> dense-index map, rebuilt alongside the matrix.
#[derive(Default, Clone)]
struct OrderedIndex {
    order: Vec<String>,
    position: HashMap<String, usize>,
}

impl OrderedIndex {
    fn insert(&mut self, id: &str) -> usize {
        if let Some(&pos) = self.position.get(id) {
            return pos;
        }
        let pos = self.order.len();
        self.order.push(id.to_string());
        self.position.insert(id.to_string(), pos);
        pos
    }

    fn get(&self, id: &str) -> Option<usize> {
        self.position.get(id).copied()
    }

    fn len(&self) -> usize {
        self.order.len()
    }
}

struct Inner {
    tools: HashMap<String, Tool>,
    capabilities: HashMap<String, Capability>,
    tool_index: OrderedIndex,
    cap_index: OrderedIndex,
    /// `incidence[tool_row][cap_col]`.
    incidence: Vec<Vec<u8>>,
}

impl Default for Inner {
    fn default() -> Self {
        Self {
            tools: HashMap::new(),
            capabilities: HashMap::new(),
            tool_index: OrderedIndex::default(),
            cap_index: OrderedIndex::default(),
            incidence: Vec::new(),
        }
    }
}

/// Summary counters over the current incidence matrix.
#[derive(Debug, Clone, Copy, serde::Serialize)]
pub struct IncidenceStats {
    pub tools: usize,
    pub capabilities: usize,
    pub ones: usize,
}

/// Thread-safe tool/capability hypergraph. The GraphStore (C1) remains the
/// exclusive owner of nodes and typed edges; this store holds only ids into
/// it plus the incidence matrix it owns outright.
#[derive(Clone)]
pub struct Hypergraph {
    inner: Arc<RwLock<Inner>>,
}

impl Default for Hypergraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Hypergraph {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(Inner::default())),
        }
    }

    pub async fn register_tool(&self, tool: Tool) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.tools.insert(tool.tool_id.clone(), tool);
        drop(inner);
        self.rebuild_indices().await
    }

    /// Registers a capability, refusing it outright if its member closure
    /// contains a cycle (forbidden by construction, never a runtime panic).
    pub async fn register_capability(&self, capability: Capability) -> Result<()> {
        {
            let inner = self.inner.read().await;
            let mut staged = inner.capabilities.clone();
            staged.insert(capability.pattern_id.clone(), capability.clone());
            let mut visited = HashSet::new();
            transitive_tools(&staged, &capability.pattern_id, &mut visited)
                .map_err(|_| HypergraphError::CyclicCapability(capability.pattern_id.clone()))?;
        }
        let mut inner = self.inner.write().await;
        inner
            .capabilities
            .insert(capability.pattern_id.clone(), capability);
        drop(inner);
        self.rebuild_indices().await
    }

    pub async fn get_tool(&self, tool_id: &str) -> Option<Tool> {
        self.inner.read().await.tools.get(tool_id).cloned()
    }

    pub async fn get_capability(&self, pattern_id: &str) -> Option<Capability> {
        self.inner.read().await.capabilities.get(pattern_id).cloned()
    }

    pub async fn capabilities(&self) -> Vec<Capability> {
        self.inner.read().await.capabilities.values().cloned().collect()
    }

    /// Recomputes `tool_index`, `cap_index`, and the incidence matrix from
    /// scratch. Called after every structural change (the matrix is small
    /// enough in practice that incremental maintenance isn't worth the
    /// bookkeeping).
    pub async fn rebuild_indices(&self) -> Result<()> {
        let mut inner = self.inner.write().await;

        let mut tool_index = OrderedIndex::default();
        for tool_id in inner.tools.keys() {
            tool_index.insert(tool_id);
        }
        let mut cap_ids: Vec<&String> = inner.capabilities.keys().collect();
        cap_ids.sort();
        let mut cap_index = OrderedIndex::default();
        for cap_id in &cap_ids {
            cap_index.insert(cap_id);
        }

        let mut incidence = vec![vec![0u8; cap_index.len()]; tool_index.len()];
        let capabilities = inner.capabilities.clone();
        for cap_id in &cap_ids {
            let cap_col = cap_index.get(cap_id).expect("just inserted");
            let mut visited = HashSet::new();
            let reachable = transitive_tools(&capabilities, cap_id, &mut visited)
                .map_err(|_| HypergraphError::CyclicCapability((*cap_id).clone()))?;
            for tool_id in reachable {
                if let Some(tool_row) = tool_index.get(&tool_id) {
                    incidence[tool_row][cap_col] = 1;
                }
            }
        }

        inner.tool_index = tool_index;
        inner.cap_index = cap_index;
        inner.incidence = incidence;
        Ok(())
    }

    /// Tool embeddings in `tool_index` order.
    pub async fn tool_embeddings(&self) -> Vec<(String, Vec<f32>)> {
        let inner = self.inner.read().await;
        inner
            .tool_index
            .order
            .iter()
            .map(|id| {
                let embedding = inner.tools.get(id).map(|t| t.embedding.clone()).unwrap_or_default();
                (id.clone(), embedding)
            })
            .collect()
    }

    /// Capability embeddings in `cap_index` order.
    pub async fn capability_embeddings(&self) -> Vec<(String, Vec<f32>)> {
        let inner = self.inner.read().await;
        inner
            .cap_index
            .order
            .iter()
            .map(|id| {
                let embedding = inner
                    .capabilities
                    .get(id)
                    .map(|c| c.embedding.clone())
                    .unwrap_or_default();
                (id.clone(), embedding)
            })
            .collect()
    }

    pub async fn incidence_stats(&self) -> IncidenceStats {
        let inner = self.inner.read().await;
        let ones = inner.incidence.iter().flatten().filter(|&&b| b == 1).count();
        IncidenceStats {
            tools: inner.tool_index.len(),
            capabilities: inner.cap_index.len(),
            ones,
        }
    }

    /// `true` iff `tool_id` is in the transitive closure of `cap_id` —
    /// the invariant `A[index(t)][index(c)] = 1`.
    pub async fn contains_tool(&self, cap_id: &str, tool_id: &str) -> bool {
        let inner = self.inner.read().await;
        match (inner.tool_index.get(tool_id), inner.cap_index.get(cap_id)) {
            (Some(row), Some(col)) => inner.incidence.get(row).and_then(|r| r.get(col)).copied() == Some(1),
            _ => false,
        }
    }

    /// Every tool reachable in the transitive closure of `cap_id`, by
    /// incidence row lookup (not a fresh DFS).
    pub async fn transitive_tools_of(&self, cap_id: &str) -> Vec<String> {
        let inner = self.inner.read().await;
        let Some(col) = inner.cap_index.get(cap_id) else {
            return Vec::new();
        };
        inner
            .tool_index
            .order
            .iter()
            .enumerate()
            .filter(|(row, _)| inner.incidence.get(*row).and_then(|r| r.get(col)).copied() == Some(1))
            .map(|(_, id)| id.clone())
            .collect()
    }
}

/// DFS over `members` of type `capability`, collecting every reachable
/// tool member. `Err(())` signals a cycle was detected via the visited set.
fn transitive_tools(
    capabilities: &HashMap<String, Capability>,
    cap_id: &str,
    visited: &mut HashSet<String>,
) -> std::result::Result<HashSet<String>, ()> {
    if !visited.insert(cap_id.to_string()) {
        return Err(());
    }
    let mut tools = HashSet::new();
    if let Some(cap) = capabilities.get(cap_id) {
        for member in &cap.members {
            match member.kind {
                MemberKind::Tool => {
                    tools.insert(member.id.clone());
                }
                MemberKind::Capability => {
                    let nested = transitive_tools(capabilities, &member.id, visited)?;
                    tools.extend(nested);
                }
            }
        }
    }
    Ok(tools)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Member, MemberKind};

    async fn tool(id: &str) -> Tool {
        Tool {
            tool_id: id.to_string(),
            embedding: vec![0.1, 0.2, 0.3],
            pagerank: None,
            community: None,
        }
    }

    #[tokio::test]
    async fn direct_member_sets_incidence_bit() {
        let graph = Hypergraph::new();
        graph.register_tool(tool("fs:read").await).await.unwrap();
        let cap = Capability::new("cap:a", vec![0.1; 3]).with_members(vec![Member {
            id: "fs:read".into(),
            kind: MemberKind::Tool,
        }]);
        graph.register_capability(cap).await.unwrap();
        assert!(graph.contains_tool("cap:a", "fs:read").await);
    }

    #[tokio::test]
    async fn meta_capability_inherits_transitive_tools() {
        let graph = Hypergraph::new();
        graph.register_tool(tool("fs:read").await).await.unwrap();
        graph.register_tool(tool("fs:write").await).await.unwrap();

        let leaf = Capability::new("cap:leaf", vec![0.1; 3]).with_members(vec![
            Member { id: "fs:read".into(), kind: MemberKind::Tool },
            Member { id: "fs:write".into(), kind: MemberKind::Tool },
        ]);
        graph.register_capability(leaf).await.unwrap();

        let meta = Capability::new("cap:meta", vec![0.2; 3]).with_members(vec![Member {
            id: "cap:leaf".into(),
            kind: MemberKind::Capability,
        }]);
        graph.register_capability(meta).await.unwrap();

        assert!(graph.contains_tool("cap:meta", "fs:read").await);
        assert!(graph.contains_tool("cap:meta", "fs:write").await);
    }

    #[tokio::test]
    async fn cyclic_capability_import_is_refused() {
        let graph = Hypergraph::new();
        let a = Capability::new("cap:a", vec![0.1; 3])
            .with_members(vec![Member { id: "cap:b".into(), kind: MemberKind::Capability }]);
        graph.register_capability(a).await.unwrap();

        let b = Capability::new("cap:b", vec![0.1; 3])
            .with_members(vec![Member { id: "cap:a".into(), kind: MemberKind::Capability }]);
        let err = graph.register_capability(b).await.unwrap_err();
        assert!(matches!(err, HypergraphError::CyclicCapability(_)));
    }

    #[tokio::test]
    async fn incidence_stats_counts_ones() {
        let graph = Hypergraph::new();
        graph.register_tool(tool("fs:read").await).await.unwrap();
        let cap = Capability::new("cap:a", vec![0.1; 3]).with_members(vec![Member {
            id: "fs:read".into(),
            kind: MemberKind::Tool,
        }]);
        graph.register_capability(cap).await.unwrap();
        let stats = graph.incidence_stats().await;
        assert_eq!(stats.tools, 1);
        assert_eq!(stats.capabilities, 1);
        assert_eq!(stats.ones, 1);
    }
}
