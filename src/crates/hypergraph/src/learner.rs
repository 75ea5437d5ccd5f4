//! Learner (C12): trace ingestion, prioritized replay, and the adaptive
//! suggestion threshold.
//!
//! Three independent pieces share this module because they all consume the
//! same [`ExecutionTrace`] stream: edge derivation writes `contains`/
//! `sequence` edges into the graph store as traces complete; the replay
//! buffer retains a priority-weighted sample of past `(intent, capability,
//! outcome)` examples for periodic SHGAT weight updates; the adaptive
//! threshold tracks a sliding window of suggestion outcomes and nudges the
//! Suggester's score gate up or down.

use crate::error::Result;
use crate::hypergraph::Hypergraph;
use crate::model::ExecutionTrace;
use crate::scorer::{forward, Scorer, NUM_FEATURES};
use chrono::Utc;
use dag_engine::graph::{EdgeSource, EdgeType};
use dag_engine::GraphStore;
use rand::Rng;
use std::collections::VecDeque;
use tokio::sync::{Mutex, RwLock};

/// Replay priority exponent: `td_priority = |target - score|^ALPHA`.
const REPLAY_ALPHA: f64 = 0.6;
/// Minimum buffered examples before a training pass runs at all.
const MIN_TRACE_THRESHOLD: usize = 32;
/// Examples drawn per training pass.
const BATCH_SIZE: usize = 64;
/// Step size for the truncated-gradient weight update.
const LEARNING_RATE: f64 = 0.05;

const THRESHOLD_WINDOW_SIZE: usize = 50;
const THRESHOLD_UPDATE_EVERY: usize = 10;
const THRESHOLD_MIN: f64 = 0.3;
const THRESHOLD_MAX: f64 = 0.9;
const THRESHOLD_STEP: f64 = 0.05;
const FALSE_POSITIVE_RATE_TRIGGER: f64 = 0.2;
const FALSE_NEGATIVE_RATE_TRIGGER: f64 = 0.3;

/// One labeled outcome of a suggestion, fed into the adaptive threshold's
/// sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    TruePositive,
    FalsePositive,
    TrueNegative,
    FalseNegative,
}

/// Sliding-window adaptive score gate for the Suggester.
///
/// Every `THRESHOLD_UPDATE_EVERY` recorded outcomes, the false-positive and
/// false-negative rates over the last `THRESHOLD_WINDOW_SIZE` outcomes are
/// recomputed; a false-positive rate above the trigger raises the
/// threshold, a false-negative rate above its trigger lowers it, both by a
/// fixed step and both clamped to `[THRESHOLD_MIN, THRESHOLD_MAX]`.
pub struct AdaptiveThreshold {
    value: RwLock<f64>,
    window: RwLock<VecDeque<Outcome>>,
    since_update: RwLock<usize>,
}

impl AdaptiveThreshold {
    pub fn new(initial: f64) -> Self {
        Self {
            value: RwLock::new(initial.clamp(THRESHOLD_MIN, THRESHOLD_MAX)),
            window: RwLock::new(VecDeque::with_capacity(THRESHOLD_WINDOW_SIZE)),
            since_update: RwLock::new(0),
        }
    }

    pub async fn current(&self) -> f64 {
        *self.value.read().await
    }

    /// Overrides the threshold directly, still clamped. Used in tests and
    /// for manual operator overrides.
    pub async fn force(&self, value: f64) {
        *self.value.write().await = value.clamp(THRESHOLD_MIN, THRESHOLD_MAX);
    }

    pub async fn record(&self, outcome: Outcome) {
        {
            let mut window = self.window.write().await;
            window.push_back(outcome);
            if window.len() > THRESHOLD_WINDOW_SIZE {
                window.pop_front();
            }
        }
        let mut since_update = self.since_update.write().await;
        *since_update += 1;
        if *since_update >= THRESHOLD_UPDATE_EVERY {
            *since_update = 0;
            drop(since_update);
            self.recompute().await;
        }
    }

    async fn recompute(&self) {
        let (fp_rate, fn_rate) = {
            let window = self.window.read().await;
            if window.is_empty() {
                return;
            }
            let total = window.len() as f64;
            let fp = window.iter().filter(|o| **o == Outcome::FalsePositive).count() as f64;
            let fnr = window.iter().filter(|o| **o == Outcome::FalseNegative).count() as f64;
            (fp / total, fnr / total)
        };
        let mut value = self.value.write().await;
        if fp_rate > FALSE_POSITIVE_RATE_TRIGGER {
            *value = (*value + THRESHOLD_STEP).min(THRESHOLD_MAX);
        } else if fn_rate > FALSE_NEGATIVE_RATE_TRIGGER {
            *value = (*value - THRESHOLD_STEP).max(THRESHOLD_MIN);
        }
    }
}

/// Prioritized, fixed-capacity replay buffer over [`TrainingExample`]s.
pub struct ReplayBuffer {
    entries: Vec<crate::model::TrainingExample>,
    capacity: usize,
}

impl ReplayBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, example: crate::model::TrainingExample) {
        if self.entries.len() >= self.capacity {
            self.entries.remove(0);
        }
        self.entries.push(example);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&crate::model::TrainingExample> {
        self.entries.get(index)
    }

    pub fn set_priority(&mut self, index: usize, priority: f64) {
        if let Some(entry) = self.entries.get_mut(index) {
            entry.td_priority = priority;
        }
    }

    /// Weighted sample without replacement of up to `n` indices, weighted
    /// by `td_priority` (a small floor keeps zero-priority entries drawable).
    pub fn sample_indices(&self, n: usize) -> Vec<usize> {
        if self.entries.is_empty() {
            return Vec::new();
        }
        let mut remaining: Vec<usize> = (0..self.entries.len()).collect();
        let mut picked = Vec::with_capacity(n.min(remaining.len()));
        let mut rng = rand::thread_rng();
        for _ in 0..n.min(self.entries.len()) {
            let total: f64 = remaining.iter().map(|&i| self.entries[i].td_priority.max(1e-6)).sum();
            let mut roll = rng.gen_range(0.0..total);
            let mut chosen_pos = remaining.len() - 1;
            for (pos, &idx) in remaining.iter().enumerate() {
                roll -= self.entries[idx].td_priority.max(1e-6);
                if roll <= 0.0 {
                    chosen_pos = pos;
                    break;
                }
            }
            picked.push(remaining.remove(chosen_pos));
        }
        picked
    }
}

/// Outcome of one `Learner::train` call.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct TrainReport {
    pub trained: bool,
    pub traces_processed: usize,
    pub examples_generated: usize,
    pub loss: f64,
    pub priorities_updated: usize,
}

/// Ties trace ingestion, replay-based training, and the adaptive threshold
/// together over a shared [`Hypergraph`]/[`GraphStore`]/[`Scorer`].
pub struct Learner {
    graph: GraphStore,
    hypergraph: Hypergraph,
    scorer: Scorer,
    replay: RwLock<ReplayBuffer>,
    threshold: AdaptiveThreshold,
    training_lock: Mutex<()>,
}

impl Learner {
    pub fn new(graph: GraphStore, hypergraph: Hypergraph, scorer: Scorer) -> Self {
        Self {
            graph,
            hypergraph,
            scorer,
            replay: RwLock::new(ReplayBuffer::new(2048)),
            threshold: AdaptiveThreshold::new(0.6),
            training_lock: Mutex::new(()),
        }
    }

    pub fn threshold(&self) -> &AdaptiveThreshold {
        &self.threshold
    }

    /// Derives graph edges from the trace, updates the winning capability's
    /// running statistics, and (if the trace carries both a capability id
    /// and an intent embedding) appends a replay example.
    pub async fn ingest_trace(&self, trace: &ExecutionTrace) -> Result<()> {
        self.derive_edges(trace).await?;

        if let Some(capability_id) = &trace.capability_id {
            self.update_capability_stats(capability_id, trace.success).await?;
            self.record_outcome(if trace.success {
                Outcome::TruePositive
            } else {
                Outcome::FalsePositive
            })
            .await;

            if let Some(embedding) = &trace.intent_embedding {
                let example = self.build_training_example(capability_id, embedding, trace.success).await?;
                self.replay.write().await.push(example);
            }
        }
        Ok(())
    }

    /// Records a suggestion outcome directly, for callers (e.g. a human
    /// reviewing a missed suggestion) that observe the label outside of a
    /// completed trace.
    pub async fn record_outcome(&self, outcome: Outcome) {
        self.threshold.record(outcome).await;
    }

    async fn derive_edges(&self, trace: &ExecutionTrace) -> Result<()> {
        if let Some(capability_id) = &trace.capability_id {
            let mut seen = std::collections::HashSet::new();
            for task_result in &trace.task_results {
                if seen.insert(task_result.tool.clone()) {
                    self.graph
                        .add_edge(capability_id, &task_result.tool, EdgeType::Contains, EdgeSource::Observed)
                        .await?;
                }
            }
        }

        for window in trace.task_results.windows(2) {
            let (a, b) = (&window[0], &window[1]);
            if a.tool == b.tool {
                continue;
            }
            self.graph
                .add_edge(&a.tool, &b.tool, EdgeType::Sequence, EdgeSource::Observed)
                .await?;
        }
        Ok(())
    }

    async fn update_capability_stats(&self, capability_id: &str, success: bool) -> Result<()> {
        let Some(mut capability) = self.hypergraph.get_capability(capability_id).await else {
            return Ok(());
        };
        let observed = if success { 1.0 } else { 0.0 };
        let count = capability.usage_count + 1;
        capability.success_rate += (observed - capability.success_rate) / count as f64;
        capability.usage_count = count;
        capability.last_used = Some(Utc::now());
        self.hypergraph.register_capability(capability).await?;
        Ok(())
    }

    async fn build_training_example(
        &self,
        capability_id: &str,
        embedding: &[f32],
        success: bool,
    ) -> Result<crate::model::TrainingExample> {
        let outcome = if success { 1.0 } else { 0.0 };
        let score = if let Some(capability) = self.hypergraph.get_capability(capability_id).await {
            let features = self.scorer.features_for(embedding, &capability, Utc::now()).await;
            let weights = self.scorer.weights_snapshot().await;
            forward(&weights, &features).1
        } else {
            0.0
        };
        let td_priority = (outcome - score).abs().powf(REPLAY_ALPHA);
        Ok(crate::model::TrainingExample {
            intent_embedding: embedding.to_vec(),
            context_tools: Vec::new(),
            candidate_capability_id: capability_id.to_string(),
            outcome,
            td_priority,
        })
    }

    /// Runs one training pass if enough examples are buffered and no other
    /// pass is in flight. Never blocks: returns `trained: false` immediately
    /// if the training lock is already held.
    pub async fn train(&self) -> TrainReport {
        let Ok(_guard) = self.training_lock.try_lock() else {
            return TrainReport::default();
        };

        let buffer_len = self.replay.read().await.len();
        if buffer_len < MIN_TRACE_THRESHOLD {
            return TrainReport {
                trained: false,
                traces_processed: 0,
                examples_generated: buffer_len,
                loss: 0.0,
                priorities_updated: 0,
            };
        }

        let indices = self.replay.read().await.sample_indices(BATCH_SIZE);
        let weights = self.scorer.weights_snapshot().await;
        let mut accumulated = vec![[0.0f64; NUM_FEATURES]; weights.heads.len()];
        let mut total_loss = 0.0;
        let mut priorities_updated = 0usize;
        let now = Utc::now();

        for &index in &indices {
            let Some(example) = self.replay.read().await.get(index).cloned() else {
                continue;
            };
            let Some(capability) = self.hypergraph.get_capability(&example.candidate_capability_id).await else {
                continue;
            };
            let features = self.scorer.features_for(&example.intent_embedding, &capability, now).await;
            let (head_scores, score) = forward(&weights, &features);
            let attention_weights = crate::scorer::softmax(&head_scores);
            let td_error = example.outcome - score;
            total_loss += td_error * td_error;

            let raw = features.as_array();
            for (head_index, head_weight) in attention_weights.iter().enumerate() {
                for (feature_index, slot) in accumulated[head_index].iter_mut().enumerate() {
                    *slot += LEARNING_RATE * td_error * head_weight * raw[feature_index];
                }
            }

            let new_priority = td_error.abs().powf(REPLAY_ALPHA);
            self.replay.write().await.set_priority(index, new_priority);
            priorities_updated += 1;
        }

        let divisor = indices.len().max(1) as f64;
        let mut updated_weights = weights.clone();
        for (head_index, delta) in accumulated.iter().enumerate() {
            for (feature_index, slot) in updated_weights.heads[head_index].iter_mut().enumerate() {
                *slot += delta[feature_index] / divisor;
            }
        }
        self.scorer.set_weights(updated_weights).await;

        TrainReport {
            trained: true,
            traces_processed: indices.len(),
            examples_generated: buffer_len,
            loss: total_loss / divisor,
            priorities_updated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Capability, TraceTaskResult};

    fn trace(capability_id: &str, success: bool) -> ExecutionTrace {
        ExecutionTrace {
            id: "trace-1".into(),
            capability_id: Some(capability_id.to_string()),
            intent_text: Some("read a file".into()),
            intent_embedding: Some(vec![1.0, 0.0, 0.0]),
            success,
            execution_time_ms: 10,
            task_results: vec![
                TraceTaskResult { tool: "fs:read".into(), layer_index: 0, success },
                TraceTaskResult { tool: "fs:summarize".into(), layer_index: 1, success },
            ],
            parent_trace_id: None,
            decisions: Vec::new(),
        }
    }

    async fn learner_with_capability() -> Learner {
        let graph = GraphStore::new();
        let hypergraph = Hypergraph::new();
        let capability = Capability::new("cap:read", vec![1.0, 0.0, 0.0]).with_success_rate(0.5);
        hypergraph.register_capability(capability).await.unwrap();
        let scorer = Scorer::new(hypergraph.clone());
        Learner::new(graph, hypergraph, scorer)
    }

    #[tokio::test]
    async fn ingest_trace_derives_sequence_and_contains_edges() {
        let learner = learner_with_capability().await;
        learner.ingest_trace(&trace("cap:read", true)).await.unwrap();
        assert!(learner.graph.has_edge("cap:read", "fs:read").await);
        assert!(learner.graph.has_edge("cap:read", "fs:summarize").await);
        assert!(learner.graph.has_edge("fs:read", "fs:summarize").await);
    }

    #[tokio::test]
    async fn ingest_trace_updates_capability_usage_stats() {
        let learner = learner_with_capability().await;
        learner.ingest_trace(&trace("cap:read", true)).await.unwrap();
        let capability = learner.hypergraph.get_capability("cap:read").await.unwrap();
        assert_eq!(capability.usage_count, 1);
        assert!(capability.last_used.is_some());
    }

    #[tokio::test]
    async fn training_is_noop_below_min_trace_threshold() {
        let learner = learner_with_capability().await;
        learner.ingest_trace(&trace("cap:read", true)).await.unwrap();
        let report = learner.train().await;
        assert!(!report.trained);
    }

    #[tokio::test]
    async fn training_runs_once_threshold_is_met() {
        let learner = learner_with_capability().await;
        for _ in 0..MIN_TRACE_THRESHOLD {
            learner.ingest_trace(&trace("cap:read", true)).await.unwrap();
        }
        let report = learner.train().await;
        assert!(report.trained);
        assert!(report.priorities_updated > 0);
    }

    #[tokio::test]
    async fn adaptive_threshold_matches_fixed_scenario() {
        let threshold = AdaptiveThreshold::new(0.60);

        // First 10 outcomes: 3/10 false positives trips the FP trigger.
        let first_batch = [
            Outcome::FalsePositive,
            Outcome::FalsePositive,
            Outcome::FalsePositive,
            Outcome::TruePositive,
            Outcome::TruePositive,
            Outcome::TruePositive,
            Outcome::TruePositive,
            Outcome::TruePositive,
            Outcome::TruePositive,
            Outcome::TruePositive,
        ];
        for outcome in first_batch {
            threshold.record(outcome).await;
        }
        assert!((threshold.current().await - 0.65).abs() < 1e-9);

        // Next 10 outcomes: over the full 20-wide window, FP rate drops to
        // 3/20 (below trigger) while FN rate rises to 7/20 (above trigger).
        let second_batch = [
            Outcome::FalseNegative,
            Outcome::FalseNegative,
            Outcome::FalseNegative,
            Outcome::FalseNegative,
            Outcome::FalseNegative,
            Outcome::FalseNegative,
            Outcome::FalseNegative,
            Outcome::TruePositive,
            Outcome::TruePositive,
            Outcome::TruePositive,
        ];
        for outcome in second_batch {
            threshold.record(outcome).await;
        }
        assert!((threshold.current().await - 0.60).abs() < 1e-9);
    }
}
