//! Pathfinder / DR-DSP (C4): minimum-weight hyperpath between two tools.
//!
//! The search graph is the ordinary tool/edge graph from [`GraphStore`]
//! expanded with one supernode per capability: every transitive tool member
//! gets a zero-cost edge into the supernode and a `1 - success_rate(c)`-cost
//! edge out of it, so entering a capability's supernode is the shortcut for
//! "traverse any of its members at the capability's own reliability cost."
//!
//! The search itself is a backward Dijkstra seeded at the target and walked
//! over the reversed graph, so a single run serves any source reachable from
//! it; the forward path is then reconstructed by following recorded
//! predecessors from source to target. A closed set (the visited map) is the
//! cycle guard — a node is relaxed at most once.

use crate::error::Result;
use crate::hypergraph::Hypergraph;
use dag_engine::GraphStore;
use std::collections::{HashMap, HashSet};

/// One DR-DSP result.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PathResult {
    pub found: bool,
    pub node_sequence: Vec<String>,
    pub hyperedges_taken: Vec<String>,
    pub total_weight: f64,
}

impl PathResult {
    fn not_found() -> Self {
        Self {
            found: false,
            node_sequence: Vec::new(),
            hyperedges_taken: Vec::new(),
            total_weight: 0.0,
        }
    }
}

/// DR-DSP pathfinder over a [`GraphStore`]/[`Hypergraph`] pair.
#[derive(Clone)]
pub struct Pathfinder {
    graph: GraphStore,
    hypergraph: Hypergraph,
}

impl Pathfinder {
    pub fn new(graph: GraphStore, hypergraph: Hypergraph) -> Self {
        Self { graph, hypergraph }
    }

    /// Finds the minimum-weight path from `source_tool` to `target_tool`.
    /// Returns `found: false` (never an error) when no path exists —
    /// pathfinder failure is a normal outcome the Suggester falls back on.
    pub async fn find_path(&self, source_tool: &str, target_tool: &str) -> Result<PathResult> {
        if source_tool == target_tool {
            return Ok(PathResult {
                found: true,
                node_sequence: vec![source_tool.to_string()],
                hyperedges_taken: Vec::new(),
                total_weight: 0.0,
            });
        }

        let snapshot = self.graph.snapshot().await;
        // reverse_adj[v] holds (u, cost) for every forward edge u -> v.
        let mut reverse_adj: HashMap<String, Vec<(String, f64)>> = HashMap::new();
        for edge in &snapshot.edges {
            reverse_adj
                .entry(edge.dst.clone())
                .or_default()
                .push((edge.src.clone(), edge.weight));
        }

        // hyperedge_of[(u, v)] = capability id, annotating the forward edge
        // u -> v when it is part of a capability's supernode expansion.
        let mut hyperedge_of: HashMap<(String, String), String> = HashMap::new();

        for capability in self.hypergraph.capabilities().await {
            let members = self.hypergraph.transitive_tools_of(&capability.pattern_id).await;
            if members.is_empty() {
                continue;
            }
            let supernode = format!("hyperedge:{}", capability.pattern_id);
            let cost = (1.0 - capability.success_rate).max(0.0);
            for tool_id in &members {
                // forward: tool -> supernode, cost 0; reverse edge added is supernode -> tool.
                reverse_adj
                    .entry(supernode.clone())
                    .or_default()
                    .push((tool_id.clone(), 0.0));
                // forward: supernode -> tool, cost; reverse edge added is tool -> supernode.
                reverse_adj
                    .entry(tool_id.clone())
                    .or_default()
                    .push((supernode.clone(), cost));
                hyperedge_of.insert((supernode.clone(), tool_id.clone()), capability.pattern_id.clone());
            }
        }

        let Some((dist, prev)) = backward_dijkstra(&reverse_adj, target_tool, source_tool) else {
            return Ok(PathResult::not_found());
        };

        let mut node_sequence = vec![source_tool.to_string()];
        let mut hyperedges_taken = Vec::new();
        let mut cursor = source_tool.to_string();
        while cursor != target_tool {
            let Some(next) = prev.get(&cursor).cloned() else {
                return Ok(PathResult::not_found());
            };
            if let Some(cap_id) = hyperedge_of.get(&(cursor.clone(), next.clone())) {
                hyperedges_taken.push(cap_id.clone());
            }
            node_sequence.push(next.clone());
            cursor = next;
        }

        Ok(PathResult {
            found: true,
            node_sequence,
            hyperedges_taken,
            total_weight: dist,
        })
    }
}

/// Backward Dijkstra over `reverse_adj`, seeded at `target`. Returns the
/// distance from `source` to `target` (over the forward graph) plus a
/// predecessor map usable to reconstruct the forward path, or `None` if
/// `source` is unreachable. O(V^2) extraction — the tool/capability graphs
/// this runs over are small enough that a binary heap isn't worth the extra
/// machinery.
fn backward_dijkstra(
    reverse_adj: &HashMap<String, Vec<(String, f64)>>,
    target: &str,
    source: &str,
) -> Option<(f64, HashMap<String, String>)> {
    let mut dist: HashMap<String, f64> = HashMap::new();
    let mut prev: HashMap<String, String> = HashMap::new();
    let mut settled: HashSet<String> = HashSet::new();
    dist.insert(target.to_string(), 0.0);

    loop {
        let next = dist
            .iter()
            .filter(|(node, _)| !settled.contains(*node))
            .min_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(node, d)| (node.clone(), *d));

        let Some((node, d)) = next else { break };
        settled.insert(node.clone());
        if node == source {
            return Some((d, prev));
        }

        for (neighbor, cost) in reverse_adj.get(&node).into_iter().flatten() {
            if settled.contains(neighbor) {
                continue;
            }
            let candidate = d + cost;
            let better = dist.get(neighbor).map(|&existing| candidate < existing).unwrap_or(true);
            if better {
                dist.insert(neighbor.clone(), candidate);
                // prev[neighbor] is a forward-direction predecessor: we
                // discovered neighbor by walking the reversed edge
                // node -> neighbor, i.e. the forward edge is neighbor -> node.
                prev.insert(neighbor.clone(), node.clone());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Capability, Member, MemberKind};
    use dag_engine::graph::{EdgeSource, EdgeType};

    #[tokio::test]
    async fn direct_edge_is_the_shortest_path() {
        let graph = GraphStore::new();
        graph
            .add_edge("a", "b", EdgeType::Sequence, EdgeSource::Observed)
            .await
            .unwrap();
        let hypergraph = Hypergraph::new();
        let pathfinder = Pathfinder::new(graph, hypergraph);
        let result = pathfinder.find_path("a", "b").await.unwrap();
        assert!(result.found);
        assert_eq!(result.node_sequence, vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn unreachable_target_reports_not_found() {
        let graph = GraphStore::new();
        graph.add_node("a", serde_json::json!({})).await.unwrap();
        graph.add_node("z", serde_json::json!({})).await.unwrap();
        let hypergraph = Hypergraph::new();
        let pathfinder = Pathfinder::new(graph, hypergraph);
        let result = pathfinder.find_path("a", "z").await.unwrap();
        assert!(!result.found);
    }

    #[tokio::test]
    async fn capability_shortcut_links_its_members() {
        let graph = GraphStore::new();
        let hypergraph = Hypergraph::new();
        let cap = Capability::new("cap:fs", vec![0.1; 3])
            .with_members(vec![
                Member { id: "fs:read".into(), kind: MemberKind::Tool },
                Member { id: "fs:write".into(), kind: MemberKind::Tool },
            ])
            .with_success_rate(0.9);
        hypergraph.register_capability(cap).await.unwrap();

        let pathfinder = Pathfinder::new(graph, hypergraph);
        let result = pathfinder.find_path("fs:read", "fs:write").await.unwrap();
        assert!(result.found);
        assert_eq!(result.hyperedges_taken, vec!["cap:fs".to_string()]);
        assert!((result.total_weight - 0.1).abs() < 1e-9);
    }

    #[tokio::test]
    async fn source_equals_target_is_trivially_found() {
        let graph = GraphStore::new();
        let hypergraph = Hypergraph::new();
        let pathfinder = Pathfinder::new(graph, hypergraph);
        let result = pathfinder.find_path("a", "a").await.unwrap();
        assert!(result.found);
        assert_eq!(result.total_weight, 0.0);
    }
}
