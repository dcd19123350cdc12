//! Nearest-neighbor matcher
//!
//! Encodes the query with the fitted encoder and ranks the snapshot records
//! by cosine similarity. The snapshot is encoded once at construction; since
//! the bundle is immutable this is the same as encoding it per query.
//!
//! Predictions always reflect the bundle's snapshot, never a live catalog.
//! Use [`FittedEncoding::is_stale_for`] to detect drift.

use crate::fitted::FittedEncoding;
use gpumatch_core::{
    top_by_score, Predictor, Query, ScoredMatch, Vector, DEFAULT_NEIGHBORS,
};
use std::sync::Arc;
use tracing::debug;

/// Cosine nearest-neighbor predictor over a fitted encoding
#[derive(Debug, Clone)]
pub struct NeighborMatcher {
    fitted: Arc<FittedEncoding>,
    vectors: Vec<Vector>,
    k: usize,
}

impl NeighborMatcher {
    /// Create a matcher returning [`DEFAULT_NEIGHBORS`] results
    pub fn new(fitted: impl Into<Arc<FittedEncoding>>) -> Self {
        let fitted = fitted.into();
        let vectors = fitted.encoder().encode_catalog(fitted.catalog());
        Self {
            fitted,
            vectors,
            k: DEFAULT_NEIGHBORS,
        }
    }

    /// Set the number of neighbors returned by [`predict`](Self::predict)
    pub fn with_neighbors(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn neighbors(&self) -> usize {
        self.k
    }

    pub fn fitted(&self) -> &FittedEncoding {
        &self.fitted
    }

    /// Return the `min(k, catalog size)` most similar records
    pub fn predict(&self, query: &Query) -> Vec<ScoredMatch> {
        self.nearest(query, self.k)
    }

    /// Return the `min(limit, catalog size)` most similar records, best first.
    ///
    /// Equal similarities keep snapshot order.
    pub fn nearest(&self, query: &Query, limit: usize) -> Vec<ScoredMatch> {
        let similarities = self.similarities(query);
        let scored: Vec<(usize, f32)> = similarities.into_iter().enumerate().collect();
        let catalog = self.fitted.catalog();

        top_by_score(scored, limit)
            .into_iter()
            .map(|(i, similarity)| ScoredMatch::new(catalog.records()[i].name.clone(), similarity))
            .collect()
    }

    /// Cosine similarity of the query to every snapshot record, in snapshot order
    pub fn similarities(&self, query: &Query) -> Vec<f32> {
        let encoded = self.fitted.encoder().encode(query);
        debug!(dim = encoded.dim(), "encoded neighbor query");

        self.vectors
            .iter()
            .map(|v| 1.0 - encoded.cosine_distance(v))
            .collect()
    }
}

impl Predictor for NeighborMatcher {
    fn name(&self) -> &'static str {
        "neighbor"
    }

    fn rank(&self, query: &Query, limit: usize) -> Vec<ScoredMatch> {
        self.nearest(query, limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpumatch_core::{CardRecord, Catalog};

    fn create_test_catalog(size: usize) -> Catalog {
        let specs = [
            ("Tesla V100", "NVIDIA", "Volta", "High", 250.0, 300.0),
            ("RX 580", "AMD", "Polaris", "Medium", 185.0, 185.0),
            ("GT 1030", "NVIDIA", "Pascal", "Low", 30.0, 100.0),
            ("Titan V", "NVIDIA", "Volta", "High", 250.0, 250.0),
            ("Radeon VII", "AMD", "Vega", "High", 300.0, 300.0),
            ("GTX 1060", "NVIDIA", "Pascal", "Medium", 120.0, 150.0),
            ("RX 6600", "AMD", "RDNA2", "Medium", 132.0, 160.0),
            ("RTX 3090", "NVIDIA", "Ampere", "High", 350.0, 350.0),
            ("RX 550", "AMD", "Polaris", "Low", 50.0, 75.0),
            ("RTX 3060", "NVIDIA", "Ampere", "Medium", 170.0, 170.0),
            ("Arc A770", "Intel", "Alchemist", "Medium", 225.0, 225.0),
            ("A100", "NVIDIA", "Ampere", "High", 400.0, 400.0),
        ];
        specs
            .iter()
            .take(size)
            .map(|(name, m, a, p, tdp, power)| {
                CardRecord::new(*name)
                    .with_manufacturer(*m)
                    .with_architecture(*a)
                    .with_performance(*p)
                    .with_tdp(*tdp)
                    .with_power(*power)
            })
            .collect()
    }

    fn create_matcher(size: usize) -> NeighborMatcher {
        NeighborMatcher::new(FittedEncoding::fit(create_test_catalog(size)).unwrap())
    }

    #[test]
    fn test_exact_record_is_top_match() {
        let matcher = create_matcher(12);
        let record = matcher.fitted().catalog().get(4).unwrap().clone();

        let results = matcher.predict(&Query::from(&record));

        assert_eq!(results[0].name, "Radeon VII");
        assert!((results[0].score - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_result_count_is_k() {
        let matcher = create_matcher(12);
        assert_eq!(matcher.neighbors(), 10);
        assert_eq!(matcher.predict(&Query::new().with_manufacturer("AMD")).len(), 10);
    }

    #[test]
    fn test_small_catalog_returns_all() {
        let matcher = create_matcher(3);
        let results = matcher.predict(&Query::new().with_manufacturer("NVIDIA"));
        assert_eq!(results.len(), 3);
    }

    #[test]
    fn test_unseen_category_still_ranks() {
        let matcher = create_matcher(12);
        let query = Query::new()
            .with_manufacturer("Matrox")
            .with_architecture("Unknown")
            .with_tdp(250.0);

        let results = matcher.predict(&query);
        assert_eq!(results.len(), 10);
        assert!(results.iter().all(|m| (-1.0..=1.0).contains(&m.score)));
    }

    #[test]
    fn test_extreme_numeric_query_stays_bounded() {
        for size in [3, 12] {
            let matcher = create_matcher(size);
            let query = Query::new().with_manufacturer("NVIDIA").with_power(1e40);

            let results = matcher.predict(&query);
            assert_eq!(results.len(), size.min(10));
            assert!(results
                .iter()
                .all(|m| m.score.is_finite() && (-1.0..=1.0).contains(&m.score)));
            for pair in results.windows(2) {
                assert!(pair[0].score >= pair[1].score);
            }
        }
    }

    #[test]
    fn test_scores_descending() {
        let matcher = create_matcher(12);
        let results = matcher.predict(&Query::new().with_performance("High").with_power(320.0));
        for pair in results.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }

    #[test]
    fn test_ties_keep_snapshot_order() {
        let record = CardRecord::new("dup")
            .with_manufacturer("NVIDIA")
            .with_architecture("Volta")
            .with_performance("High")
            .with_tdp(250.0)
            .with_power(300.0);
        let mut records = create_test_catalog(3).into_records();
        records.push(CardRecord {
            name: "dup-b".to_string(),
            ..record.clone()
        });
        records.insert(1, CardRecord {
            name: "dup-a".to_string(),
            ..record.clone()
        });

        let matcher = NeighborMatcher::new(FittedEncoding::fit(Catalog::new(records)).unwrap());
        let results = matcher.predict(&Query::from(&record));

        // Tesla V100 carries the same attributes, so three records tie
        let names: Vec<_> = results.iter().take(3).map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["Tesla V100", "dup-a", "dup-b"]);
    }

    #[test]
    fn test_deterministic_ranking() {
        let matcher = create_matcher(12);
        let query = Query::new().with_manufacturer("NVIDIA").with_tdp(200.0);
        assert_eq!(matcher.predict(&query), matcher.predict(&query));
    }

    #[test]
    fn test_with_neighbors() {
        let matcher = create_matcher(12).with_neighbors(4);
        assert_eq!(matcher.predict(&Query::new()).len(), 4);

        let predictor: &dyn Predictor = &matcher;
        assert_eq!(predictor.name(), "neighbor");
        assert_eq!(predictor.rank(&Query::new(), 2).len(), 2);
    }

    #[test]
    fn test_similarities_cover_snapshot() {
        let matcher = create_matcher(5);
        assert_eq!(matcher.similarities(&Query::new()).len(), 5);
    }
}
