//! Fitted encoding bundle
//!
//! Pairs a fitted [`FeatureEncoder`] with the catalog snapshot it was fitted
//! on. The two never change independently: a changed catalog needs a new
//! bundle from [`FittedEncoding::fit`].

use crate::encoder::FeatureEncoder;
use chrono::{DateTime, Utc};
use gpumatch_core::{Catalog, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::info;

/// Current bundle format version
pub const FORMAT_VERSION: u32 = 1;

/// Immutable encoder plus catalog snapshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FittedEncoding {
    version: u32,
    fitted_at: DateTime<Utc>,
    fingerprint: String,
    encoder: FeatureEncoder,
    catalog: Catalog,
}

impl FittedEncoding {
    /// Fit an encoder on the catalog and take ownership of it as the snapshot
    pub fn fit(catalog: Catalog) -> Result<Self> {
        let encoder = FeatureEncoder::fit(&catalog)?;
        let fingerprint = catalog_fingerprint(&catalog);

        info!(
            records = catalog.len(),
            dim = encoder.dim(),
            fingerprint = %fingerprint,
            "fitted feature encoding"
        );

        Ok(Self {
            version: FORMAT_VERSION,
            fitted_at: Utc::now(),
            fingerprint,
            encoder,
            catalog,
        })
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn fitted_at(&self) -> DateTime<Utc> {
        self.fitted_at
    }

    /// SHA-256 of the snapshot at fit time
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn encoder(&self) -> &FeatureEncoder {
        &self.encoder
    }

    /// The catalog the encoder was fitted on
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// True if `live` differs from the fit-time snapshot.
    ///
    /// Predictions still come from the snapshot; callers decide whether to
    /// refit.
    pub fn is_stale_for(&self, live: &Catalog) -> bool {
        catalog_fingerprint(live) != self.fingerprint
    }
}

/// Hex SHA-256 of the catalog's canonical JSON form
pub fn catalog_fingerprint(catalog: &Catalog) -> String {
    let mut hasher = Sha256::new();
    for value in catalog.to_values() {
        hasher.update(value.to_string().as_bytes());
        hasher.update(b"\n");
    }
    format!("{:x}", hasher.finalize())
}
