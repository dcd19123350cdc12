//! Fitted encoding artifact persistence
//!
//! Bundles are bincode-encoded and written through a temporary file that is
//! renamed into place, so a reader sees either the previous bundle or the
//! new one, never a partial write.

use atomicwrites::{AtomicFile, OverwriteBehavior};
use gpumatch_core::{Catalog, Error, Result};
use gpumatch_similarity::{FittedEncoding, FORMAT_VERSION};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Location of a persisted [`FittedEncoding`]
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    path: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Atomically replace the persisted bundle
    pub fn save(&self, fitted: &FittedEncoding) -> Result<()> {
        let data = bincode::serialize(fitted)
            .map_err(|e| Error::Serialization(format!("Serialization error: {}", e)))?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        AtomicFile::new(&self.path, OverwriteBehavior::AllowOverwrite)
            .write(|f| f.write_all(&data))
            .map_err(|e| Error::Persistence(format!("failed to write {:?}: {}", self.path, e)))?;

        info!(
            "Saved fitted encoding ({} records, {} bytes) to {:?}",
            fitted.catalog().len(),
            data.len(),
            self.path
        );
        Ok(())
    }

    /// Load the persisted bundle
    pub fn load(&self) -> Result<FittedEncoding> {
        let data = std::fs::read(&self.path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ArtifactNotFound(self.path.clone()),
            _ => self.corrupt(e.to_string()),
        })?;

        let fitted: FittedEncoding =
            bincode::deserialize(&data).map_err(|e| self.corrupt(e.to_string()))?;

        if fitted.version() != FORMAT_VERSION {
            return Err(self.corrupt(format!(
                "unsupported format version {} (expected {})",
                fitted.version(),
                FORMAT_VERSION
            )));
        }

        info!(
            "Loaded fitted encoding from {:?} (fitted at {})",
            self.path,
            fitted.fitted_at()
        );
        Ok(fitted)
    }

    /// Fit a new bundle on `catalog` and replace the persisted one
    pub fn refit(&self, catalog: Catalog) -> Result<FittedEncoding> {
        let fitted = FittedEncoding::fit(catalog)?;
        self.save(&fitted)?;
        Ok(fitted)
    }

    fn corrupt(&self, reason: String) -> Error {
        Error::CorruptArtifact {
            path: self.path.clone(),
            reason,
        }
    }
}
