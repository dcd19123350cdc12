pub mod artifact;
pub mod document;

pub use artifact::ArtifactStore;
pub use document::{write_document, CatalogStore};
