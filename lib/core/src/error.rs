use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog document not found: {}", .0.display())]
    CatalogNotFound(PathBuf),

    #[error("Malformed catalog document {}: {reason}", path.display())]
    MalformedCatalog { path: PathBuf, reason: String },

    #[error("Fitted encoding artifact not found: {}", .0.display())]
    ArtifactNotFound(PathBuf),

    #[error("Corrupt fitted encoding artifact {}: {reason}", path.display())]
    CorruptArtifact { path: PathBuf, reason: String },

    #[error("Record index {index} out of range for catalog of {len} records")]
    RecordIndexOutOfRange { index: usize, len: usize },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// True for the errors that mean a predictor has no data to work from.
    pub fn is_missing_artifact(&self) -> bool {
        matches!(
            self,
            Error::CatalogNotFound(_)
                | Error::MalformedCatalog { .. }
                | Error::ArtifactNotFound(_)
                | Error::CorruptArtifact { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
