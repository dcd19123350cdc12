//! Card records and partial queries
//!
//! Both records and queries expose their scorable attributes through
//! [`Attributes`], so matchers and encoders work over either one.
//! Raw JSON is coerced leniently: malformed values become missing values
//! instead of errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// A scorable card attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    Manufacturer,
    Architecture,
    Performance,
    Tdp,
    Power,
}

/// How an attribute's values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeKind {
    /// Nominal string value
    Categorical,
    /// Floating point value
    Numeric,
}

impl Attribute {
    /// Every scorable attribute, categoricals first
    pub const ALL: [Attribute; 5] = [
        Attribute::Manufacturer,
        Attribute::Architecture,
        Attribute::Performance,
        Attribute::Tdp,
        Attribute::Power,
    ];

    pub const CATEGORICAL: [Attribute; 3] = [
        Attribute::Manufacturer,
        Attribute::Architecture,
        Attribute::Performance,
    ];

    pub const NUMERIC: [Attribute; 2] = [Attribute::Tdp, Attribute::Power];

    /// Key used for this attribute in catalog documents and queries
    pub fn key(self) -> &'static str {
        match self {
            Attribute::Manufacturer => "manufacturer",
            Attribute::Architecture => "architecture",
            Attribute::Performance => "performance",
            Attribute::Tdp => "tdp",
            Attribute::Power => "power",
        }
    }

    pub fn kind(self) -> AttributeKind {
        match self {
            Attribute::Manufacturer | Attribute::Architecture | Attribute::Performance => {
                AttributeKind::Categorical
            }
            Attribute::Tdp | Attribute::Power => AttributeKind::Numeric,
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.key() == key)
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A borrowed attribute value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue<'a> {
    Text(&'a str),
    Number(f64),
}

impl<'a> AttributeValue<'a> {
    /// String form used for exact matching.
    ///
    /// Numbers use the shortest round-trip decimal, so `250.0` renders as `250`.
    pub fn to_match_string(&self) -> String {
        match self {
            AttributeValue::Text(s) => (*s).to_string(),
            AttributeValue::Number(n) => format_number(*n),
        }
    }

    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            AttributeValue::Text(s) => Some(*s),
            AttributeValue::Number(_) => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Text(_) => None,
        }
    }
}

/// Read access to the scorable attributes of a record or query
pub trait Attributes {
    fn manufacturer(&self) -> Option<&str>;
    fn architecture(&self) -> Option<&str>;
    fn performance(&self) -> Option<&str>;
    fn tdp(&self) -> Option<f64>;
    fn power(&self) -> Option<f64>;

    fn value(&self, attr: Attribute) -> Option<AttributeValue<'_>> {
        match attr {
            Attribute::Manufacturer => self.manufacturer().map(AttributeValue::Text),
            Attribute::Architecture => self.architecture().map(AttributeValue::Text),
            Attribute::Performance => self.performance().map(AttributeValue::Text),
            Attribute::Tdp => self.tdp().map(AttributeValue::Number),
            Attribute::Power => self.power().map(AttributeValue::Number),
        }
    }

    fn text(&self, attr: Attribute) -> Option<&str> {
        self.value(attr).and_then(|v| v.as_text())
    }

    fn number(&self, attr: Attribute) -> Option<f64> {
        self.value(attr).and_then(|v| v.as_number())
    }
}

/// A graphics card in the catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CardRecord {
    /// Human-facing identifier, not used in scoring
    #[serde(rename = "card")]
    pub name: String,
    pub manufacturer: Option<String>,
    pub tdp: Option<f64>,
    pub power: Option<f64>,
    pub architecture: Option<String>,
    pub performance: Option<String>,
}

impl CardRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_manufacturer(mut self, value: impl Into<String>) -> Self {
        self.manufacturer = non_blank(value.into());
        self
    }

    pub fn with_architecture(mut self, value: impl Into<String>) -> Self {
        self.architecture = non_blank(value.into());
        self
    }

    pub fn with_performance(mut self, value: impl Into<String>) -> Self {
        self.performance = non_blank(value.into());
        self
    }

    pub fn with_tdp(mut self, value: f64) -> Self {
        self.tdp = Some(value).filter(|v| v.is_finite());
        self
    }

    pub fn with_power(mut self, value: f64) -> Self {
        self.power = Some(value).filter(|v| v.is_finite());
        self
    }

    /// Build a record from a raw catalog document entry.
    ///
    /// Returns `None` if the entry is not a JSON object. Absent or
    /// malformed attributes become missing values.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        Some(Self {
            name: obj.get("card").and_then(coerce_text).unwrap_or_default(),
            manufacturer: obj.get("manufacturer").and_then(coerce_text),
            tdp: obj.get("tdp").and_then(coerce_number),
            power: obj.get("power").and_then(coerce_number),
            architecture: obj.get("architecture").and_then(coerce_text),
            performance: obj.get("performance").and_then(coerce_text),
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "card": self.name,
            "manufacturer": self.manufacturer,
            "tdp": self.tdp,
            "power": self.power,
            "architecture": self.architecture,
            "performance": self.performance,
        })
    }

    /// True if every scorable attribute is present
    pub fn is_complete(&self) -> bool {
        Attribute::ALL.iter().all(|attr| self.value(*attr).is_some())
    }
}

impl Attributes for CardRecord {
    fn manufacturer(&self) -> Option<&str> {
        self.manufacturer.as_deref()
    }

    fn architecture(&self) -> Option<&str> {
        self.architecture.as_deref()
    }

    fn performance(&self) -> Option<&str> {
        self.performance.as_deref()
    }

    fn tdp(&self) -> Option<f64> {
        self.tdp
    }

    fn power(&self) -> Option<f64> {
        self.power
    }
}

/// A partial card description submitted by a caller
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Query {
    pub manufacturer: Option<String>,
    pub architecture: Option<String>,
    pub performance: Option<String>,
    pub tdp: Option<f64>,
    pub power: Option<f64>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_manufacturer(mut self, value: impl Into<String>) -> Self {
        self.manufacturer = non_blank(value.into());
        self
    }

    pub fn with_architecture(mut self, value: impl Into<String>) -> Self {
        self.architecture = non_blank(value.into());
        self
    }

    pub fn with_performance(mut self, value: impl Into<String>) -> Self {
        self.performance = non_blank(value.into());
        self
    }

    pub fn with_tdp(mut self, value: f64) -> Self {
        self.tdp = Some(value).filter(|v| v.is_finite());
        self
    }

    pub fn with_power(mut self, value: f64) -> Self {
        self.power = Some(value).filter(|v| v.is_finite());
        self
    }

    /// Build a query from a JSON mapping of attribute keys to values.
    ///
    /// Unknown keys are ignored; a non-object value yields an empty query.
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return Self::default();
        };
        Self {
            manufacturer: obj.get("manufacturer").and_then(coerce_text),
            architecture: obj.get("architecture").and_then(coerce_text),
            performance: obj.get("performance").and_then(coerce_text),
            tdp: obj.get("tdp").and_then(coerce_number),
            power: obj.get("power").and_then(coerce_number),
        }
    }

    /// True if no attribute is set
    pub fn is_empty(&self) -> bool {
        Attribute::ALL.iter().all(|attr| self.value(*attr).is_none())
    }
}

impl Attributes for Query {
    fn manufacturer(&self) -> Option<&str> {
        self.manufacturer.as_deref()
    }

    fn architecture(&self) -> Option<&str> {
        self.architecture.as_deref()
    }

    fn performance(&self) -> Option<&str> {
        self.performance.as_deref()
    }

    fn tdp(&self) -> Option<f64> {
        self.tdp
    }

    fn power(&self) -> Option<f64> {
        self.power
    }
}

impl From<&CardRecord> for Query {
    fn from(record: &CardRecord) -> Self {
        Self {
            manufacturer: record.manufacturer.clone(),
            architecture: record.architecture.clone(),
            performance: record.performance.clone(),
            tdp: record.tdp,
            power: record.power,
        }
    }
}

/// Coerce a JSON value into a categorical string.
///
/// Numbers and booleans use their textual form; null, blank strings and
/// containers are missing.
pub fn coerce_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => non_blank(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Coerce a JSON value into a finite number.
///
/// Accepts numbers and numeric strings; everything else is missing.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

/// Shortest round-trip decimal form of a number
pub fn format_number(n: f64) -> String {
    format!("{}", n)
}

/// Trim surrounding whitespace; blank becomes missing
fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else if trimmed.len() == s.len() {
        Some(s)
    } else {
        Some(trimmed.to_string())
    }
}
