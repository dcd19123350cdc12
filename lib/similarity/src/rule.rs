//! Rule-based matcher
//!
//! Scores every catalog record by summing the weights of the attributes
//! whose values exactly match the query (case-insensitive, numbers compared
//! by their string form). Absent query attributes contribute nothing and
//! records sharing no attribute with the query are dropped.

use crate::schema::{MatchSchema, SchemaError};
use gpumatch_core::{
    top_by_score, Attribute, AttributeValue, Attributes, CardRecord, Catalog, Predictor, Query,
    ScoredMatch,
};
use tracing::debug;

/// Contribution of one attribute to a rule score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldContribution {
    pub attribute: Attribute,
    /// Whether the query and the record hold the same value
    pub matched: bool,
    /// Weight added to the score (0.0 when not matched)
    pub score: f32,
}

/// Weighted exact-match predictor over a catalog
#[derive(Debug, Clone)]
pub struct RuleMatcher {
    catalog: Catalog,
    schema: MatchSchema,
}

impl RuleMatcher {
    /// Create a matcher with the fixed expert weights
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            schema: MatchSchema::expert(),
        }
    }

    /// Create a matcher with a custom weight schema
    pub fn with_schema(catalog: Catalog, schema: MatchSchema) -> Result<Self, SchemaError> {
        schema.validate()?;
        Ok(Self { catalog, schema })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn schema(&self) -> &MatchSchema {
        &self.schema
    }

    /// Score a single record against the query
    pub fn score(&self, query: &Query, record: &CardRecord) -> f32 {
        self.explain(query, record).iter().map(|c| c.score).sum()
    }

    /// Per-attribute breakdown of a record's score
    pub fn explain(&self, query: &Query, record: &CardRecord) -> Vec<FieldContribution> {
        self.schema
            .fields
            .iter()
            .map(|field| {
                let matched = match (query.value(field.attribute), record.value(field.attribute)) {
                    (Some(q), Some(c)) => values_match(&q, &c),
                    _ => false,
                };
                FieldContribution {
                    attribute: field.attribute,
                    matched,
                    score: if matched { field.weight } else { 0.0 },
                }
            })
            .collect()
    }

    /// Return up to `top_n` records with a non-zero score, best first.
    ///
    /// Equal scores keep catalog order.
    pub fn predict(&self, query: &Query, top_n: usize) -> Vec<ScoredMatch> {
        self.ranked(query, top_n)
            .into_iter()
            .map(|(i, score)| ScoredMatch::new(self.catalog.records()[i].name.clone(), score))
            .collect()
    }

    /// Like [`predict`](Self::predict), with the per-attribute breakdown of
    /// each result
    pub fn predict_explained(
        &self,
        query: &Query,
        top_n: usize,
    ) -> Vec<(ScoredMatch, Vec<FieldContribution>)> {
        self.ranked(query, top_n)
            .into_iter()
            .map(|(i, score)| {
                let record = &self.catalog.records()[i];
                (
                    ScoredMatch::new(record.name.clone(), score),
                    self.explain(query, record),
                )
            })
            .collect()
    }

    fn ranked(&self, query: &Query, top_n: usize) -> Vec<(usize, f32)> {
        let scored: Vec<(usize, f32)> = self
            .catalog
            .iter()
            .enumerate()
            .map(|(i, record)| (i, self.score(query, record)))
            .filter(|(_, score)| *score > 0.0)
            .collect();

        debug!(
            candidates = scored.len(),
            catalog = self.catalog.len(),
            "rule matcher scored catalog"
        );

        top_by_score(scored, top_n)
    }
}

impl Predictor for RuleMatcher {
    fn name(&self) -> &'static str {
        "expert"
    }

    fn rank(&self, query: &Query, limit: usize) -> Vec<ScoredMatch> {
        self.predict(query, limit)
    }
}

/// Case-insensitive equality of the string forms of two values
fn values_match(query: &AttributeValue<'_>, candidate: &AttributeValue<'_>) -> bool {
    query.to_match_string().to_lowercase() == candidate.to_match_string().to_lowercase()
}
