//! Catalog persistence: the `CatalogStore` trait and the JSON file store.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::instrument;

use crate::catalog::Catalog;

/// Errors that can occur while loading or saving the catalog.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Catalog file does not exist.
    #[error("catalog file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Filesystem error while reading or writing.
    #[error("catalog I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file exists but does not parse as a catalog.
    #[error("catalog file is malformed: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Where catalogs live.
///
/// The engine only ever sees a loaded [`Catalog`]; paths, formats, and
/// durability all sit behind this trait.
pub trait CatalogStore {
    /// Load the full catalog.
    ///
    /// # Errors
    ///
    /// Fails when the catalog cannot be read or parsed.
    fn load(&self) -> Result<Catalog, StoreError>;

    /// Persist the full catalog.
    ///
    /// # Errors
    ///
    /// Fails when the catalog cannot be serialized or written.
    fn save(&self, catalog: &Catalog) -> Result<(), StoreError>;
}

/// Store backed by one pretty-printed JSON file.
///
/// Saves go to a sibling temp file first and rename over the target, so a
/// crash mid-write cannot leave a half-written catalog behind.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store over the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogStore for JsonFileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn load(&self) -> Result<Catalog, StoreError> {
        if !self.path.exists() {
            return Err(StoreError::NotFound(self.path.clone()));
        }
        let raw = fs::read_to_string(&self.path)?;
        let mut catalog: Catalog = serde_json::from_str(&raw)?;
        // Hand-edited files may carry batch IDs past the stored sequence
        catalog.sync_sequence();
        tracing::debug!(products = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    #[instrument(skip_all, fields(path = %self.path.display(), products = catalog.len()))]
    fn save(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(catalog)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!("catalog saved");
        Ok(())
    }
}
