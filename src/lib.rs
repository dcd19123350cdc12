//! # gpumatch
//!
//! Recommends graphics cards matching a partial description, using two
//! independent predictors over the same catalog.
//!
//! - **Expert** ([`RuleMatcher`]): fixed per-attribute weights summed over
//!   case-insensitive exact matches. Transparent and deterministic.
//! - **Neighbor** ([`NeighborMatcher`]): median imputation, standardization
//!   and one-hot encoding fitted once per catalog, then cosine similarity
//!   between the encoded query and every catalog record.
//!
//! Scores from the two predictors live on different scales and must not be
//! compared with each other.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! gpumatch --catalog gpus.json --model gpu_model.bin fit
//! gpumatch predict --method expert --manufacturer NVIDIA --architecture Volta
//! gpumatch predict --method neighbor --query '{"manufacturer": "NVIDIA", "power": "250"}'
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use gpumatch::prelude::*;
//!
//! let store = CatalogStore::open("gpus.json").unwrap();
//! let artifacts = ArtifactStore::new("gpu_model.bin");
//! let fitted = artifacts.refit(store.snapshot()).unwrap();
//!
//! let query = Query::new().with_manufacturer("NVIDIA").with_power(250.0);
//!
//! let expert = RuleMatcher::new(store.snapshot());
//! for m in expert.predict(&query, 10) {
//!     println!("{} - {:.1}", m.name, m.score);
//! }
//!
//! let neighbor = NeighborMatcher::new(fitted);
//! for m in neighbor.predict(&query) {
//!     println!("{} - {:.4}", m.name, m.score);
//! }
//! ```
//!
//! ## Crate Structure
//!
//! - `gpumatch-core` - Records, queries, catalog, vectors, ranking
//! - `gpumatch-similarity` - Weight schema, feature encoder, both matchers
//! - `gpumatch-storage` - Catalog document store and fitted artifact persistence

// Re-export core types
pub use gpumatch_core::{
    Attribute, AttributeKind, Attributes, CardRecord, Catalog, Error, MatcherConfig, Predictor,
    Query, Result, ScoredMatch, Vector,
};

// Re-export predictors
pub use gpumatch_similarity::{
    FeatureEncoder, FittedEncoding, MatchSchema, NeighborMatcher, RuleMatcher,
};

// Re-export storage
pub use gpumatch_storage::{ArtifactStore, CatalogStore};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        ArtifactStore, Attribute, Attributes, CardRecord, Catalog, CatalogStore, Error,
        FittedEncoding, MatcherConfig, NeighborMatcher, Predictor, Query, Result, RuleMatcher,
        ScoredMatch,
    };
}
