//! Catalog document store
//!
//! A list-backed store over a JSON document. Reads share a lock; every
//! mutation holds the write lock across the in-memory change and the
//! document rewrite, so writers are serialized and readers never observe
//! a half-applied edit.
//!
//! Entries are written back exactly as they were read unless they were
//! edited: lenient values such as `"power": "n/a"` and non-object entries
//! survive a rewrite. Added or replaced records are written in normalized
//! form.

use atomicwrites::{AtomicFile, OverwriteBehavior};
use gpumatch_core::{CardRecord, Catalog, Error, Result};
use parking_lot::RwLock;
use serde_json::Value;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// A document entry as read, with the record parsed from it
#[derive(Debug, Clone)]
struct Entry {
    raw: Value,
    record: Option<CardRecord>,
}

impl Entry {
    fn parse(raw: Value) -> Self {
        let record = CardRecord::from_value(&raw);
        Self { raw, record }
    }

    fn edited(record: CardRecord) -> Self {
        Self {
            raw: record.to_value(),
            record: Some(record),
        }
    }
}

/// Editable card catalog persisted as a JSON document.
///
/// Record indexes count card records only; non-object entries are kept in
/// the document but are not addressable.
pub struct CatalogStore {
    path: PathBuf,
    entries: RwLock<Vec<Entry>>,
}

impl CatalogStore {
    /// Open an existing catalog document
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = read_entries(&path)?;
        let skipped = entries.iter().filter(|e| e.record.is_none()).count();
        if skipped > 0 {
            warn!("Skipped {} non-object entries in {:?}", skipped, path);
        }
        info!(
            "Loaded {} catalog records from {:?}",
            entries.len() - skipped,
            path
        );
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Open a catalog document, starting empty if it does not exist yet
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::open(&path) {
            Err(Error::CatalogNotFound(path)) => {
                info!("Catalog {:?} not found, starting empty", path);
                Ok(Self {
                    path,
                    entries: RwLock::new(Vec::new()),
                })
            }
            other => other,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.read().iter().filter(|e| e.record.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> Option<CardRecord> {
        let entries = self.entries.read();
        entries.iter().filter_map(|e| e.record.as_ref()).nth(index).cloned()
    }

    /// Copy of the current records
    pub fn records(&self) -> Vec<CardRecord> {
        let entries = self.entries.read();
        entries.iter().filter_map(|e| e.record.clone()).collect()
    }

    /// Owned catalog for the predictors
    pub fn snapshot(&self) -> Catalog {
        Catalog::new(self.records())
    }

    /// Append a record and persist. Returns its index.
    pub fn add(&self, record: CardRecord) -> Result<usize> {
        let mut entries = self.entries.write();
        let mut updated = entries.clone();
        updated.push(Entry::edited(record));
        write_entries(&self.path, &updated)?;
        *entries = updated;

        let index = entries.iter().filter(|e| e.record.is_some()).count() - 1;
        debug!("Added catalog record at index {}", index);
        Ok(index)
    }

    /// Replace the record at `index` and persist
    pub fn update(&self, index: usize, record: CardRecord) -> Result<()> {
        let mut entries = self.entries.write();
        let (position, _) = locate(&entries, index)?;
        let mut updated = entries.clone();
        updated[position] = Entry::edited(record);
        write_entries(&self.path, &updated)?;
        *entries = updated;
        debug!("Updated catalog record at index {}", index);
        Ok(())
    }

    /// Remove the record at `index` and persist. Returns the removed record.
    pub fn delete(&self, index: usize) -> Result<CardRecord> {
        let mut entries = self.entries.write();
        let (position, removed) = locate(&entries, index)?;
        let mut updated = entries.clone();
        updated.remove(position);
        write_entries(&self.path, &updated)?;
        *entries = updated;
        debug!("Deleted catalog record at index {}", index);
        Ok(removed)
    }

    /// Rewrite the document from memory
    pub fn save(&self) -> Result<()> {
        let entries = self.entries.write();
        write_entries(&self.path, &entries)
    }
}

/// Entry position and record of the `index`-th card record
fn locate(entries: &[Entry], index: usize) -> Result<(usize, CardRecord)> {
    entries
        .iter()
        .enumerate()
        .filter_map(|(position, e)| e.record.as_ref().map(|r| (position, r.clone())))
        .nth(index)
        .ok_or_else(|| Error::RecordIndexOutOfRange {
            index,
            len: entries.iter().filter(|e| e.record.is_some()).count(),
        })
}

fn read_entries(path: &Path) -> Result<Vec<Entry>> {
    let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => Error::CatalogNotFound(path.to_path_buf()),
        _ => Error::MalformedCatalog {
            path: path.to_path_buf(),
            reason: e.to_string(),
        },
    })?;

    let value: Value = serde_json::from_str(&content).map_err(|e| Error::MalformedCatalog {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    match value {
        Value::Array(items) => Ok(items.into_iter().map(Entry::parse).collect()),
        _ => Err(Error::MalformedCatalog {
            path: path.to_path_buf(),
            reason: "expected a list of card records".to_string(),
        }),
    }
}

fn write_entries(path: &Path, entries: &[Entry]) -> Result<()> {
    let values: Vec<&Value> = entries.iter().map(|e| &e.raw).collect();
    write_values(path, &values)
}

/// Atomically write records as a pretty-printed JSON document
pub fn write_document(path: &Path, records: &[CardRecord]) -> Result<()> {
    let values: Vec<Value> = records.iter().map(CardRecord::to_value).collect();
    write_values(path, &values)
}

fn write_values<T: serde::Serialize>(path: &Path, values: &[T]) -> Result<()> {
    let data = serde_json::to_vec_pretty(values)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    AtomicFile::new(path, OverwriteBehavior::AllowOverwrite)
        .write(|f| f.write_all(&data))
        .map_err(|e| Error::Persistence(format!("failed to write {:?}: {}", path, e)))?;
    Ok(())
}
