//! # gpumatch Core
//!
//! Core library for the gpumatch card recommender.
//!
//! This crate provides the shared data representation both matchers work on:
//!
//! - [`CardRecord`] - A catalog entry with optional, leniently-coerced attributes
//! - [`Query`] - A partial card description
//! - [`Catalog`] - An ordered, read-only sequence of records
//! - [`Vector`] - Dense vector with cosine similarity
//! - [`Predictor`] / [`ScoredMatch`] - The shared ranking capability and its results
//!
//! ## Example
//!
//! ```rust
//! use gpumatch_core::{Attribute, Attributes, CardRecord, Catalog, Query};
//!
//! let catalog = Catalog::new(vec![
//!     CardRecord::new("Tesla V100")
//!         .with_manufacturer("NVIDIA")
//!         .with_architecture("Volta")
//!         .with_tdp(250.0),
//! ]);
//!
//! let query = Query::new().with_manufacturer("nvidia");
//! assert_eq!(query.text(Attribute::Manufacturer), Some("nvidia"));
//! assert_eq!(catalog.len(), 1);
//! ```

pub mod catalog;
pub mod config;
pub mod error;
pub mod ranking;
pub mod record;
pub mod vector;

pub use catalog::Catalog;
pub use config::{MatcherConfig, DEFAULT_NEIGHBORS, DEFAULT_TOP_N};
pub use error::{Error, Result};
pub use ranking::{top_by_score, Predictor, ScoredMatch};
pub use record::{
    coerce_number, coerce_text, format_number, Attribute, AttributeKind, AttributeValue,
    Attributes, CardRecord, Query,
};
pub use vector::Vector;
