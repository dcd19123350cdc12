//! Ranked results and the shared predictor capability

use crate::record::Query;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A ranked (name, score) result.
///
/// Score semantics depend on the predictor that produced it: a weighted
/// match sum for the rule matcher, a cosine similarity for the neighbor
/// matcher. Scores from different predictors are not comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMatch {
    pub name: String,
    pub score: f32,
}

impl ScoredMatch {
    pub fn new(name: impl Into<String>, score: f32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Ranks a catalog against a partial query
pub trait Predictor {
    /// Short name used in logs and CLI output
    fn name(&self) -> &'static str;

    /// Return up to `limit` matches, best first
    fn rank(&self, query: &Query, limit: usize) -> Vec<ScoredMatch>;
}

/// Sort `(catalog_index, score)` pairs by descending score and keep `limit`.
///
/// The sort is stable, so equal scores keep catalog order.
pub fn top_by_score(mut scored: Vec<(usize, f32)>, limit: usize) -> Vec<(usize, f32)> {
    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    scored.truncate(limit);
    scored
}
