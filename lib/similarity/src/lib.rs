//! # gpumatch Similarity
//!
//! The two card predictors and the feature encoding behind the statistical one.
//!
//! ## Features
//!
//! - **Rule-based matching**: fixed per-attribute weights, case-insensitive exact matches, explainable scores
//! - **Feature encoding**: median imputation, standardization and one-hot blocks fitted once per catalog
//! - **Nearest neighbors**: cosine similarity between the encoded query and the fitted catalog snapshot
//!
//! ## Example
//!
//! ```rust
//! use gpumatch_core::{CardRecord, Catalog, Query};
//! use gpumatch_similarity::{FittedEncoding, NeighborMatcher, RuleMatcher};
//!
//! let catalog = Catalog::new(vec![
//!     CardRecord::new("Tesla V100")
//!         .with_manufacturer("NVIDIA")
//!         .with_architecture("Volta")
//!         .with_performance("High")
//!         .with_tdp(250.0)
//!         .with_power(300.0),
//!     CardRecord::new("RX 580")
//!         .with_manufacturer("AMD")
//!         .with_architecture("Polaris")
//!         .with_performance("Medium")
//!         .with_tdp(185.0)
//!         .with_power(185.0),
//! ]);
//!
//! let query = Query::new().with_manufacturer("nvidia").with_architecture("Volta");
//!
//! let expert = RuleMatcher::new(catalog.clone());
//! assert_eq!(expert.predict(&query, 10)[0].score, 5.5);
//!
//! let fitted = FittedEncoding::fit(catalog).unwrap();
//! let neighbor = NeighborMatcher::new(fitted);
//! assert_eq!(neighbor.predict(&query).len(), 2);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Catalog   │────>│   Encoder   │────>│   Fitted    │
//! │  (records)  │ fit │ (stats+vocab│     │  Encoding   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!       │                                        │
//!       v                                        v
//! ┌─────────────┐                         ┌─────────────┐
//! │    Rule     │                         │  Neighbor   │
//! │   Matcher   │                         │   Matcher   │
//! └─────────────┘                         └─────────────┘
//! ```

pub mod encoder;
pub mod fitted;
pub mod neighbor;
pub mod rule;
pub mod schema;

pub use encoder::{
    CategoryVocabulary, FeatureEncoder, NumericStats, CATEGORICAL_FEATURES, MISSING_CATEGORY,
    NUMERIC_FEATURES,
};
pub use fitted::{catalog_fingerprint, FittedEncoding, FORMAT_VERSION};
pub use neighbor::NeighborMatcher;
pub use rule::{FieldContribution, RuleMatcher};
pub use schema::{FieldWeight, MatchSchema, SchemaError};
