//! Rule matcher weight schema
//!
//! Declares which attributes the rule matcher scores and how much an exact
//! match on each one is worth. The expert schema carries the fixed weights;
//! weights are never learned.

use gpumatch_core::Attribute;
use serde::{Deserialize, Serialize};

pub const MANUFACTURER_WEIGHT: f32 = 3.0;
pub const ARCHITECTURE_WEIGHT: f32 = 2.5;
pub const PERFORMANCE_WEIGHT: f32 = 2.0;
pub const TDP_WEIGHT: f32 = 1.0;
pub const POWER_WEIGHT: f32 = 1.0;

/// Weight schema version 1
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchSchema {
    /// Schema version for future compatibility
    #[serde(default = "default_version")]
    pub version: u32,

    /// Weighted attributes in scoring order
    pub fields: Vec<FieldWeight>,
}

fn default_version() -> u32 {
    1
}

/// Weight of an exact match on a single attribute
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FieldWeight {
    pub attribute: Attribute,
    pub weight: f32,
}

impl FieldWeight {
    pub fn new(attribute: Attribute, weight: f32) -> Self {
        Self { attribute, weight }
    }
}

impl Default for MatchSchema {
    fn default() -> Self {
        Self::expert()
    }
}

impl MatchSchema {
    /// Create a schema with the given weighted fields
    pub fn new(fields: Vec<FieldWeight>) -> Self {
        Self { version: 1, fields }
    }

    /// The fixed expert weights
    pub fn expert() -> Self {
        Self::new(vec![
            FieldWeight::new(Attribute::Manufacturer, MANUFACTURER_WEIGHT),
            FieldWeight::new(Attribute::Architecture, ARCHITECTURE_WEIGHT),
            FieldWeight::new(Attribute::Performance, PERFORMANCE_WEIGHT),
            FieldWeight::new(Attribute::Tdp, TDP_WEIGHT),
            FieldWeight::new(Attribute::Power, POWER_WEIGHT),
        ])
    }

    /// Validate the schema
    /// - At least one field
    /// - No negative or non-finite weights
    /// - Each attribute listed once
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::EmptySchema);
        }

        for (i, field) in self.fields.iter().enumerate() {
            if !field.weight.is_finite() || field.weight < 0.0 {
                return Err(SchemaError::NegativeWeight(field.attribute));
            }
            if self.fields[..i].iter().any(|f| f.attribute == field.attribute) {
                return Err(SchemaError::DuplicateField(field.attribute));
            }
        }

        Ok(())
    }

    /// Weight for an attribute, 0.0 if it is not scored
    pub fn weight(&self, attribute: Attribute) -> f32 {
        self.fields
            .iter()
            .find(|f| f.attribute == attribute)
            .map_or(0.0, |f| f.weight)
    }

    /// Highest score a record can reach
    pub fn total_weight(&self) -> f32 {
        self.fields.iter().map(|f| f.weight).sum()
    }
}

/// Errors that can occur during schema validation
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Field '{0}' has a negative or non-finite weight")]
    NegativeWeight(Attribute),

    #[error("Field '{0}' is listed more than once")]
    DuplicateField(Attribute),
}

impl From<SchemaError> for gpumatch_core::Error {
    fn from(e: SchemaError) -> Self {
        gpumatch_core::Error::InvalidConfig(e.to_string())
    }
}
