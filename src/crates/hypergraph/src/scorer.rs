//! Scorer / SHGAT (C3): K-head attention scoring of capabilities against an
//! intent embedding.
//!
//! Four features are computed per capability — semantic (cosine similarity),
//! structural (mean pagerank of the transitive tool closure, scaled by the
//! same density-adaptive alpha the open questions describe), temporal
//! (exponential recency decay), and reliability (`success_rate x (1 -
//! 1/(1+usage_count))`). Each of `K` heads is a learned linear projection
//! over the four features; head scores are combined by a softmax-weighted
//! sum and composed with the reliability feature for the final score.
//!
//! Scoring is a pure function of `(graph, weights, q)` — weights are read
//! once as a frozen snapshot per call, never mutated mid-score. Only the
//! Learner writes weights, and only under its training lock.

use crate::error::Result;
use crate::hypergraph::Hypergraph;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::sync::Arc;
use tokio::sync::RwLock;

pub const NUM_HEADS: usize = 4;
pub const NUM_FEATURES: usize = 4;

/// Half-life for the temporal recency feature: one week.
const TEMPORAL_HALF_LIFE_HOURS: f64 = 24.0 * 7.0;

/// One capability's four raw feature values before head projection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FeatureContributions {
    pub semantic: f64,
    pub structural: f64,
    pub temporal: f64,
    pub reliability: f64,
}

impl FeatureContributions {
    pub(crate) fn as_array(&self) -> [f64; NUM_FEATURES] {
        [self.semantic, self.structural, self.temporal, self.reliability]
    }
}

/// A capability's match result against one intent embedding.
#[derive(Debug, Clone, Serialize)]
pub struct CapabilityMatch {
    pub id: String,
    pub score: f64,
    pub per_head_scores: Vec<f64>,
    pub feature_contributions: FeatureContributions,
    pub usage_count: u64,
}

/// The K-head attention weight vector, `heads[k]` holding one linear
/// projection over the four features. Updated only by the Learner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorerWeights {
    pub heads: Vec<[f64; NUM_FEATURES]>,
}

impl Default for ScorerWeights {
    fn default() -> Self {
        Self {
            heads: vec![[0.25; NUM_FEATURES]; NUM_HEADS],
        }
    }
}

/// SHGAT scorer over a shared [`Hypergraph`].
#[derive(Clone)]
pub struct Scorer {
    hypergraph: Hypergraph,
    weights: Arc<RwLock<ScorerWeights>>,
}

impl Scorer {
    pub fn new(hypergraph: Hypergraph) -> Self {
        Self {
            hypergraph,
            weights: Arc::new(RwLock::new(ScorerWeights::default())),
        }
    }

    pub fn with_weights(hypergraph: Hypergraph, weights: ScorerWeights) -> Self {
        Self {
            hypergraph,
            weights: Arc::new(RwLock::new(weights)),
        }
    }

    /// A frozen copy of the current weights, read once at the start of a
    /// `score` call so the whole pass is a pure function of this snapshot.
    pub async fn weights_snapshot(&self) -> ScorerWeights {
        self.weights.read().await.clone()
    }

    /// Called only by the Learner, under its training lock.
    pub async fn set_weights(&self, weights: ScorerWeights) {
        *self.weights.write().await = weights;
    }

    /// Scores every registered capability against `q`, returning matches
    /// sorted by score descending, ties broken by `usage_count` descending
    /// then lexicographic id.
    pub async fn score(&self, q: &[f32], now: DateTime<Utc>) -> Result<Vec<CapabilityMatch>> {
        let weights = self.weights_snapshot().await;
        let capabilities = self.hypergraph.capabilities().await;

        let mut matches = Vec::with_capacity(capabilities.len());
        for capability in &capabilities {
            let features = self.features_for(q, capability, now).await;
            let (head_scores, score) = forward(&weights, &features);

            matches.push(CapabilityMatch {
                id: capability.pattern_id.clone(),
                score,
                per_head_scores: head_scores,
                feature_contributions: features,
                usage_count: capability.usage_count,
            });
        }

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| b.usage_count.cmp(&a.usage_count))
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(matches)
    }

    /// The four raw features for one `(q, capability)` pair, reused by the
    /// Learner's training step so it scores against the same formula.
    pub(crate) async fn features_for(
        &self,
        q: &[f32],
        capability: &crate::model::Capability,
        now: DateTime<Utc>,
    ) -> FeatureContributions {
        let stats = self.hypergraph.incidence_stats().await;
        let density = if stats.tools * stats.capabilities == 0 {
            0.0
        } else {
            stats.ones as f64 / (stats.tools * stats.capabilities) as f64
        };
        // Open question: the source text's "adaptive alpha" formula is
        // applied only here, per the structural feature, not in the
        // pathfinder (see DESIGN.md's Open Question resolutions).
        let alpha = (1.0 - density * 2.0).max(0.5);

        let transitive_tools = self.hypergraph.transitive_tools_of(&capability.pattern_id).await;
        let mut pagerank_sum = 0.0;
        let mut pagerank_count = 0usize;
        for tool_id in &transitive_tools {
            if let Some(tool) = self.hypergraph.get_tool(tool_id).await {
                pagerank_sum += tool.pagerank.unwrap_or(1.0 / (1.0 + transitive_tools.len() as f64));
                pagerank_count += 1;
            }
        }
        let structural = if pagerank_count == 0 {
            0.0
        } else {
            alpha * (pagerank_sum / pagerank_count as f64)
        };

        FeatureContributions {
            semantic: cosine(q, &capability.embedding),
            structural,
            temporal: temporal_feature(capability.last_used, now),
            reliability: reliability_feature(capability.success_rate, capability.usage_count),
        }
    }
}

/// Pure K-head attention forward pass: head scores plus the final
/// reliability-composed score. Shared by `Scorer::score` and the Learner's
/// training step so both sides of the gradient step use the same formula.
pub(crate) fn forward(weights: &ScorerWeights, features: &FeatureContributions) -> (Vec<f64>, f64) {
    let raw = features.as_array();
    let head_scores: Vec<f64> = weights.heads.iter().map(|head| dot(head, &raw)).collect();
    let attention_weights = softmax(&head_scores);
    let attention: f64 = attention_weights.iter().zip(&head_scores).map(|(w, s)| w * s).sum();
    let score = (attention * features.reliability).clamp(0.0, 1.0);
    (head_scores, score)
}

fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() || a.len() != b.len() {
        return 0.0;
    }
    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

fn temporal_feature(last_used: Option<DateTime<Utc>>, now: DateTime<Utc>) -> f64 {
    match last_used {
        None => 0.0,
        Some(ts) => {
            let hours = (now - ts).num_seconds().max(0) as f64 / 3600.0;
            let lambda = std::f64::consts::LN_2 / TEMPORAL_HALF_LIFE_HOURS;
            (-lambda * hours).exp()
        }
    }
}

fn reliability_feature(success_rate: f64, usage_count: u64) -> f64 {
    success_rate * (1.0 - 1.0 / (1.0 + usage_count as f64))
}

fn dot(a: &[f64; NUM_FEATURES], b: &[f64; NUM_FEATURES]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

pub(crate) fn softmax(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    if sum == 0.0 {
        vec![1.0 / scores.len() as f64; scores.len()]
    } else {
        exps.iter().map(|e| e / sum).collect()
    }
}
