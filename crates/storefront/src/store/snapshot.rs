//! Durable snapshot of the store's persisted subset.
//!
//! One named JSON file holds `{cart, cachedProducts}`. It is read once at
//! startup to restore state and rewritten after every cart or cache
//! mutation. The field names keep the camelCase blob schema so a snapshot
//! written by an earlier deployment restores unchanged.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use driftwood_core::ProductId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::CartLine;
use crate::catalog::Product;

/// Errors that can occur reading or writing the snapshot file.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// File read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file contents were not a valid snapshot.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The persisted subset of the store.
///
/// Catalog snapshot, filters, and load status are deliberately absent:
/// they are transient and re-derived on the next catalog load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Cart lines, at most one per product ID.
    #[serde(default)]
    pub cart: Vec<CartLine>,
    /// Product detail cache keyed by product ID.
    #[serde(default)]
    pub cached_products: HashMap<ProductId, Product>,
}

/// Reads and writes [`Snapshot`]s at a fixed path.
#[derive(Debug, Clone)]
pub struct SnapshotStorage {
    path: PathBuf,
}

impl SnapshotStorage {
    /// Create storage backed by `path`. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Load the snapshot from disk.
    ///
    /// A missing file is an empty snapshot, not an error: first launch has
    /// nothing to restore.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Snapshot, SnapshotError> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Snapshot::default());
            }
            Err(e) => return Err(e.into()),
        };

        Ok(serde_json::from_str(&contents)?)
    }

    /// Write the snapshot to disk, replacing any previous contents.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let contents = serde_json::to_string(snapshot)?;
        fs::write(&self.path, contents)?;
        Ok(())
    }
}
