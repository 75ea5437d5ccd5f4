//! Suggester (C5): turns an intent string into a speculative DAG.
//!
//! Pipeline: embed the intent, score every capability, gate on the
//! Learner's adaptive threshold, expand the winning capability's members
//! into a task chain via the pathfinder (falling back to a flat linear
//! chain over its direct members if DR-DSP finds no path), and resolve
//! each task's `call_name`/`input_schema` from the graph store or the
//! capability registry. `can_speculate` additionally requires the winning
//! capability to clear a fixed reliability bar, independent of the
//! adaptive threshold.

use crate::error::Result;
use crate::hypergraph::Hypergraph;
use crate::learner::AdaptiveThreshold;
use crate::pathfinder::Pathfinder;
use crate::scorer::{CapabilityMatch, Scorer};
use async_trait::async_trait;
use chrono::Utc;
use dag_engine::model::{Dag, FailurePolicy, Task, TaskKind};
use std::sync::Arc;

/// Fixed reliability bar for speculative (non-approval-gated) execution,
/// independent of the Learner's adaptive suggestion threshold.
pub const SPECULATION_SCORE_BAR: f64 = 0.7;
pub const SPECULATION_SUCCESS_RATE_BAR: f64 = 0.8;

/// Narrow contract for turning intent text into an embedding. Implemented
/// by the embeddings crate; kept here as a trait so this crate never
/// depends on a concrete provider.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Outcome of a suggestion request.
#[derive(Debug, Clone, serde::Serialize)]
pub struct SuggestResult {
    pub confidence: f64,
    pub capability_id: Option<String>,
    pub dag: Option<Dag>,
    pub can_speculate: bool,
}

impl SuggestResult {
    fn below_threshold(confidence: f64) -> Self {
        Self {
            confidence,
            capability_id: None,
            dag: None,
            can_speculate: false,
        }
    }
}

/// Composes the scorer, pathfinder, and hypergraph into one suggestion call.
#[derive(Clone)]
pub struct Suggester {
    scorer: Scorer,
    pathfinder: Pathfinder,
    hypergraph: Hypergraph,
    threshold: Arc<AdaptiveThreshold>,
}

impl Suggester {
    pub fn new(
        scorer: Scorer,
        pathfinder: Pathfinder,
        hypergraph: Hypergraph,
        threshold: Arc<AdaptiveThreshold>,
    ) -> Self {
        Self {
            scorer,
            pathfinder,
            hypergraph,
            threshold,
        }
    }

    pub async fn suggest(&self, intent: &str, embedder: &dyn Embedder) -> Result<SuggestResult> {
        let q = embedder.embed(intent).await?;
        let matches = self.scorer.score(&q, Utc::now()).await?;

        let Some(best) = matches.first() else {
            return Ok(SuggestResult::below_threshold(0.0));
        };

        let current_threshold = self.threshold.current().await;
        if best.score < current_threshold {
            return Ok(SuggestResult::below_threshold(best.score));
        }

        let capability = self
            .hypergraph
            .get_capability(&best.id)
            .await
            .ok_or_else(|| crate::error::HypergraphError::UnknownMember(best.id.clone()))?;

        let dag = self.build_dag(&best.id, &capability.members).await?;
        let can_speculate = best.score >= SPECULATION_SCORE_BAR
            && capability.success_rate >= SPECULATION_SUCCESS_RATE_BAR;

        Ok(SuggestResult {
            confidence: best.score,
            capability_id: Some(best.id.clone()),
            dag: Some(dag),
            can_speculate,
        })
    }

    async fn build_dag(&self, capability_id: &str, members: &[crate::model::Member]) -> Result<Dag> {
        if members.is_empty() {
            let task = self.task_for("t0", capability_id, None).await;
            return Ok(Dag { tasks: vec![task] });
        }
        if members.len() == 1 {
            let task = self.task_for("t0", &members[0].id, None).await;
            return Ok(Dag { tasks: vec![task] });
        }

        let first = &members.first().expect("len >= 2").id;
        let last = &members.last().expect("len >= 2").id;
        let path = self.pathfinder.find_path(first, last).await?;

        if path.found && !path.node_sequence.is_empty() {
            let mut tasks = Vec::with_capacity(path.node_sequence.len());
            for (index, node_id) in path.node_sequence.iter().enumerate() {
                let depends_on = if index == 0 {
                    None
                } else {
                    Some(format!("t{}", index - 1))
                };
                tasks.push(self.task_for(&format!("t{index}"), node_id, depends_on).await);
            }
            return Ok(Dag { tasks });
        }

        // DR-DSP found no path: fall back to a flat linear chain over the
        // capability's declared members, in declaration order.
        let mut tasks = Vec::with_capacity(members.len());
        for (index, member) in members.iter().enumerate() {
            let depends_on = if index == 0 {
                None
            } else {
                Some(format!("t{}", index - 1))
            };
            tasks.push(self.task_for(&format!("t{index}"), &member.id, depends_on).await);
        }
        Ok(Dag { tasks })
    }

    async fn task_for(&self, task_id: &str, member_id: &str, depends_on: Option<String>) -> Task {
        let (call_name, kind) = if let Some(capability) = self.hypergraph.get_capability(member_id).await {
            (capability.call_name.unwrap_or_else(|| member_id.to_string()), TaskKind::Capability)
        } else {
            (member_id.to_string(), TaskKind::Tool)
        };

        Task {
            id: task_id.to_string(),
            call_name,
            kind,
            input_schema: None,
            depends_on: depends_on.into_iter().collect(),
            failure_policy: FailurePolicy::default(),
            permission_set: "minimal".to_string(),
            requires_approval: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Capability, Member, MemberKind};

    struct FixedEmbedder(Vec<f32>);

    #[async_trait]
    impl Embedder for FixedEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.0.clone())
        }
    }

    async fn build(success_rate: f64) -> (Suggester, Arc<AdaptiveThreshold>) {
        let graph = dag_engine::GraphStore::new();
        let hypergraph = Hypergraph::new();
        hypergraph
            .register_tool(crate::model::Tool {
                tool_id: "fs:read".into(),
                embedding: vec![1.0, 0.0, 0.0],
                pagerank: Some(0.5),
                community: None,
            })
            .await
            .unwrap();
        let capability = Capability::new("cap:read", vec![1.0, 0.0, 0.0])
            .with_members(vec![Member { id: "fs:read".into(), kind: MemberKind::Tool }])
            .with_success_rate(success_rate);
        hypergraph.register_capability(capability).await.unwrap();

        let scorer = Scorer::new(hypergraph.clone());
        let pathfinder = Pathfinder::new(graph, hypergraph.clone());
        let threshold = Arc::new(AdaptiveThreshold::new(0.3));
        (Suggester::new(scorer, pathfinder, hypergraph, threshold.clone()), threshold)
    }

    #[tokio::test]
    async fn high_confidence_capability_is_speculatable() {
        let (suggester, _threshold) = build(0.95).await;
        let embedder = FixedEmbedder(vec![1.0, 0.0, 0.0]);
        let result = suggester.suggest("read the file", &embedder).await.unwrap();
        assert!(result.dag.is_some());
        assert!(result.can_speculate);
    }

    #[tokio::test]
    async fn low_success_rate_blocks_speculation_even_with_high_score() {
        let (suggester, _threshold) = build(0.5).await;
        let embedder = FixedEmbedder(vec![1.0, 0.0, 0.0]);
        let result = suggester.suggest("read the file", &embedder).await.unwrap();
        assert!(!result.can_speculate);
    }

    #[tokio::test]
    async fn below_threshold_yields_no_dag() {
        let (suggester, threshold) = build(0.95).await;
        threshold.force(0.99).await;
        let embedder = FixedEmbedder(vec![0.0, 1.0, 0.0]);
        let result = suggester.suggest("something unrelated", &embedder).await.unwrap();
        assert!(result.dag.is_none());
        assert!(!result.can_speculate);
    }
}
