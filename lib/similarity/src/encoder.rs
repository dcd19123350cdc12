//! Feature encoder
//!
//! Converts card attributes into a fixed-width numeric vector:
//! standardized numerics followed by one-hot blocks per categorical
//! attribute.
//!
//! ```text
//! [ tdp | power | manufacturer one-hot | architecture one-hot | performance one-hot ]
//! ```
//!
//! Numerics: missing values take the fit-time median, then `(x - mean) / std`
//! with population statistics of the imputed column. Categoricals: missing
//! values take the `"missing"` sentinel; values not seen at fit time encode
//! as an all-zero block.

use gpumatch_core::{Attribute, Attributes, Catalog, Error, Result, Vector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Sentinel category substituted for missing categorical values
pub const MISSING_CATEGORY: &str = "missing";

/// Numeric attributes in vector order
pub const NUMERIC_FEATURES: [Attribute; 2] = Attribute::NUMERIC;

/// Categorical attributes in vector order
pub const CATEGORICAL_FEATURES: [Attribute; 3] = Attribute::CATEGORICAL;

/// Imputation and scaling statistics for one numeric attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NumericStats {
    pub attribute: Attribute,
    /// Median of the non-missing values, used for imputation
    pub median: f64,
    /// Mean of the imputed column
    pub mean: f64,
    /// Population standard deviation of the imputed column, 1.0 if constant
    pub scale: f64,
}

impl NumericStats {
    /// Compute the statistics over a catalog.
    ///
    /// Fails if no record carries a value for the attribute.
    pub fn fit(attribute: Attribute, catalog: &Catalog) -> Result<Self> {
        let mut present: Vec<f64> = catalog.iter().filter_map(|r| r.number(attribute)).collect();
        if present.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "attribute '{}' is missing from every catalog record",
                attribute
            )));
        }

        present.sort_by(f64::total_cmp);
        let median = median_of_sorted(&present);

        let imputed: Vec<f64> = catalog
            .iter()
            .map(|r| r.number(attribute).unwrap_or(median))
            .collect();
        let n = imputed.len() as f64;

        let mean = imputed.iter().sum::<f64>() / n;
        let variance = imputed.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / n;
        let std = variance.sqrt();
        let scale = if std > 1e-10 { std } else { 1.0 };

        Ok(Self {
            attribute,
            median,
            mean,
            scale,
        })
    }

    /// Impute and standardize a value.
    ///
    /// Saturates at the `f32` range so extreme inputs stay finite.
    pub fn transform(&self, value: Option<f64>) -> f32 {
        let x = value.unwrap_or(self.median);
        let z = (x - self.mean) / self.scale;
        if z.is_nan() {
            return 0.0;
        }
        z.clamp(f64::from(f32::MIN), f64::from(f32::MAX)) as f32
    }
}

/// Sorted category vocabulary for one categorical attribute
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryVocabulary {
    pub attribute: Attribute,
    /// Distinct fit-time values, including the sentinel if any record
    /// lacked the attribute, in sorted order
    pub categories: Vec<String>,
}

impl CategoryVocabulary {
    /// Collect the distinct values of an attribute.
    ///
    /// Fails if no record carries a value for the attribute.
    pub fn fit(attribute: Attribute, catalog: &Catalog) -> Result<Self> {
        if catalog.iter().all(|r| r.text(attribute).is_none()) {
            return Err(Error::InvalidConfig(format!(
                "attribute '{}' is missing from every catalog record",
                attribute
            )));
        }

        let categories: BTreeSet<&str> = catalog
            .iter()
            .map(|r| r.text(attribute).unwrap_or(MISSING_CATEGORY))
            .collect();

        Ok(Self {
            attribute,
            categories: categories.into_iter().map(str::to_string).collect(),
        })
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Indicator position of a value, `None` if unseen at fit time
    pub fn index_of(&self, value: Option<&str>) -> Option<usize> {
        let value = value.unwrap_or(MISSING_CATEGORY);
        self.categories
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    /// Append this attribute's one-hot block to `out`
    fn encode_into(&self, value: Option<&str>, out: &mut Vec<f32>) {
        let start = out.len();
        out.resize(start + self.len(), 0.0);
        if let Some(i) = self.index_of(value) {
            out[start + i] = 1.0;
        }
    }
}

/// Fitted transform from card attributes to vectors
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeatureEncoder {
    numeric: Vec<NumericStats>,
    categorical: Vec<CategoryVocabulary>,
}

impl FeatureEncoder {
    /// Fit the encoder on a catalog.
    ///
    /// Deterministic: the same catalog always yields the same statistics and
    /// vocabulary order.
    pub fn fit(catalog: &Catalog) -> Result<Self> {
        if catalog.is_empty() {
            return Err(Error::InvalidConfig(
                "cannot fit an encoding on an empty catalog".to_string(),
            ));
        }

        let numeric = NUMERIC_FEATURES
            .iter()
            .map(|attr| NumericStats::fit(*attr, catalog))
            .collect::<Result<Vec<_>>>()?;
        let categorical = CATEGORICAL_FEATURES
            .iter()
            .map(|attr| CategoryVocabulary::fit(*attr, catalog))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            numeric,
            categorical,
        })
    }

    /// Total vector dimension
    pub fn dim(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(CategoryVocabulary::len).sum::<usize>()
    }

    pub fn numeric_stats(&self) -> &[NumericStats] {
        &self.numeric
    }

    pub fn vocabularies(&self) -> &[CategoryVocabulary] {
        &self.categorical
    }

    pub fn vocabulary(&self, attribute: Attribute) -> Option<&CategoryVocabulary> {
        self.categorical.iter().find(|v| v.attribute == attribute)
    }

    /// Name of every vector dimension, e.g. `tdp` or `manufacturer=NVIDIA`
    pub fn feature_names(&self) -> Vec<String> {
        let numeric = self.numeric.iter().map(|s| s.attribute.to_string());
        let categorical = self.categorical.iter().flat_map(|v| {
            v.categories
                .iter()
                .map(move |c| format!("{}={}", v.attribute, c))
        });
        numeric.chain(categorical).collect()
    }

    /// Encode a record or query
    pub fn encode<A: Attributes + ?Sized>(&self, item: &A) -> Vector {
        let mut components = Vec::with_capacity(self.dim());

        for stats in &self.numeric {
            components.push(stats.transform(item.number(stats.attribute)));
        }
        for vocab in &self.categorical {
            vocab.encode_into(item.text(vocab.attribute), &mut components);
        }

        Vector::new(components)
    }

    /// Encode every catalog record, preserving order
    pub fn encode_catalog(&self, catalog: &Catalog) -> Vec<Vector> {
        catalog.iter().map(|record| self.encode(record)).collect()
    }
}

fn median_of_sorted(values: &[f64]) -> f64 {
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gpumatch_core::{CardRecord, Query};

    fn create_test_catalog() -> Catalog {
        Catalog::new(vec![
            CardRecord::new("Tesla V100")
                .with_manufacturer("NVIDIA")
                .with_architecture("Volta")
                .with_performance("High")
                .with_tdp(250.0)
                .with_power(300.0),
            CardRecord::new("RX 580")
                .with_manufacturer("AMD")
                .with_architecture("Polaris")
                .with_performance("Medium")
                .with_tdp(185.0),
            CardRecord::new("GT 1030")
                .with_manufacturer("NVIDIA")
                .with_architecture("Pascal")
                .with_tdp(30.0)
                .with_power(100.0),
        ])
    }

    #[test]
    fn test_numeric_statistics() {
        let encoder = FeatureEncoder::fit(&create_test_catalog()).unwrap();
        let stats = encoder.numeric_stats();

        assert_eq!(stats[0].attribute, Attribute::Tdp);
        assert_eq!(stats[0].median, 185.0);
        assert!((stats[0].mean - 155.0).abs() < 1e-9);

        // power: [300, missing -> 200, 100]
        assert_eq!(stats[1].attribute, Attribute::Power);
        assert_eq!(stats[1].median, 200.0);
        assert!((stats[1].mean - 200.0).abs() < 1e-9);
        let expected_std = (20000.0f64 / 3.0).sqrt();
        assert!((stats[1].scale - expected_std).abs() < 1e-9);
    }

    #[test]
    fn test_extreme_values_saturate() {
        let encoder = FeatureEncoder::fit(&create_test_catalog()).unwrap();
        let power = &encoder.numeric_stats()[1];

        assert_eq!(power.transform(Some(1e300)), f32::MAX);
        assert_eq!(power.transform(Some(-1e300)), f32::MIN);

        let encoded = encoder.encode(&Query::new().with_power(1e40));
        assert!(encoded.as_slice().iter().all(|x| x.is_finite()));
    }

    #[test]
    fn test_vocabulary_sorted_with_sentinel() {
        let encoder = FeatureEncoder::fit(&create_test_catalog()).unwrap();

        let manufacturer = encoder.vocabulary(Attribute::Manufacturer).unwrap();
        assert_eq!(manufacturer.categories, vec!["AMD", "NVIDIA"]);

        let performance = encoder.vocabulary(Attribute::Performance).unwrap();
        assert_eq!(performance.categories, vec!["High", "Medium", "missing"]);
    }

    #[test]
    fn test_layout_and_dim() {
        let encoder = FeatureEncoder::fit(&create_test_catalog()).unwrap();
        // 2 numeric + 2 manufacturers + 3 architectures + 3 performances
        assert_eq!(encoder.dim(), 10);
        assert_eq!(
            encoder.feature_names(),
            vec![
                "tdp",
                "power",
                "manufacturer=AMD",
                "manufacturer=NVIDIA",
                "architecture=Pascal",
                "architecture=Polaris",
                "architecture=Volta",
                "performance=High",
                "performance=Medium",
                "performance=missing",
            ]
        );
    }

    #[test]
    fn test_encode_record() {
        let catalog = create_test_catalog();
        let encoder = FeatureEncoder::fit(&catalog).unwrap();
        let v = encoder.encode(catalog.get(2).unwrap());
        let s = v.as_slice();

        assert_eq!(v.dim(), encoder.dim());
        assert!(s[0] < 0.0);
        assert_eq!(&s[2..], &[0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_unseen_category_encodes_zero_block() {
        let encoder = FeatureEncoder::fit(&create_test_catalog()).unwrap();
        let query = Query::new().with_manufacturer("Intel");
        let v = encoder.encode(&query);

        assert_eq!(&v.as_slice()[2..4], &[0.0, 0.0]);
    }

    #[test]
    fn test_missing_query_values_are_imputed() {
        let encoder = FeatureEncoder::fit(&create_test_catalog()).unwrap();
        let v = encoder.encode(&Query::new());
        let s = v.as_slice();

        // tdp imputed with median 185 -> (185 - 155) / std
        assert!(s[0] > 0.0);
        // power imputed with median 200 == mean
        assert_eq!(s[1], 0.0);
        // "missing" exists only in the performance vocabulary
        assert_eq!(&s[2..], &[0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_constant_column_scale() {
        let catalog = Catalog::new(vec![
            CardRecord::new("a")
                .with_manufacturer("X")
                .with_architecture("Y")
                .with_performance("Z")
                .with_tdp(100.0)
                .with_power(100.0),
            CardRecord::new("b")
                .with_manufacturer("X")
                .with_architecture("Y")
                .with_performance("Z")
                .with_tdp(100.0)
                .with_power(100.0),
        ]);
        let encoder = FeatureEncoder::fit(&catalog).unwrap();

        assert_eq!(encoder.numeric_stats()[0].scale, 1.0);
        assert_eq!(encoder.encode(catalog.get(0).unwrap()).as_slice()[0], 0.0);
    }

    #[test]
    fn test_fit_is_deterministic() {
        let catalog = create_test_catalog();
        let first = FeatureEncoder::fit(&catalog).unwrap();
        let second = FeatureEncoder::fit(&catalog).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_catalog_error() {
        let result = FeatureEncoder::fit(&Catalog::default());
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_attribute_absent_everywhere_error() {
        let catalog = Catalog::new(vec![CardRecord::new("a")
            .with_manufacturer("X")
            .with_architecture("Y")
            .with_performance("Z")
            .with_tdp(100.0)]);
        let err = FeatureEncoder::fit(&catalog).unwrap_err();
        assert!(err.to_string().contains("power"));
    }

    #[test]
    fn test_median_even_count() {
        assert_eq!(median_of_sorted(&[1.0, 2.0, 3.0, 10.0]), 2.5);
        assert_eq!(median_of_sorted(&[7.0]), 7.0);
    }
}
