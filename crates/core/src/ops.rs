//! Index and compare workflows on top of scan, store and diff

use crate::diff::{compare, Comparison};
use crate::error::{Error, Result};
use crate::scan::{scan, ScanOptions};
use crate::snapshot::Snapshot;
use crate::store::IndexStore;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Outcome of [`index`]
#[derive(Debug)]
pub struct IndexReport {
    pub snapshot: Snapshot,
    /// True when an earlier index was overwritten
    pub replaced: bool,
}

impl IndexReport {
    pub fn file_count(&self) -> usize {
        self.snapshot.len()
    }
}

/// Outcome of [`compare_with_saved`]
#[derive(Debug)]
pub struct CompareReport {
    pub previous: Snapshot,
    pub current: Snapshot,
    pub comparison: Comparison,
}

/// Scan `root` and save the result as its index
///
/// Nothing is written if the scan fails.
pub fn index(root: &Path, include_hidden: bool, options: &ScanOptions) -> Result<IndexReport> {
    let snapshot = scan(root, include_hidden, options)?;
    let store = IndexStore::new(snapshot.root_path());
    let replaced = store.exists();
    store.save(&snapshot)?;

    info!(
        root = %snapshot.root_path().display(),
        files = snapshot.len(),
        replaced,
        "index saved"
    );
    Ok(IndexReport { snapshot, replaced })
}

/// Rescan `root` and compare it with its saved index
///
/// The hidden-file policy comes from the saved index unless
/// `hidden_override` is set. The rescan always uses the saved index's hash
/// algorithm so fingerprints are comparable. The index itself is left as is.
pub fn compare_with_saved(
    root: &Path,
    hidden_override: Option<bool>,
    options: &ScanOptions,
) -> Result<CompareReport> {
    let root = fs::canonicalize(root).map_err(|e| Error::scan(root, e))?;
    let previous = IndexStore::new(&root).load()?;

    let include_hidden = hidden_override.unwrap_or(previous.include_hidden());
    let options = ScanOptions {
        algorithm: previous.algorithm(),
        ..*options
    };
    let current = scan(&root, include_hidden, &options)?;
    let comparison = compare(&previous, &current);

    info!(
        root = %root.display(),
        include_hidden,
        changes = comparison.total_changes(),
        "compared with saved index"
    );
    Ok(CompareReport {
        previous,
        current,
        comparison,
    })
}

/// Load the saved index if there is one, otherwise scan
///
/// `hidden_override` set to a policy other than the saved one forces a fresh
/// scan with that policy. Without an index and without an override, hidden
/// files are excluded.
pub fn load_or_scan(
    root: &Path,
    hidden_override: Option<bool>,
    options: &ScanOptions,
) -> Result<Snapshot> {
    let canonical = fs::canonicalize(root).map_err(|e| Error::scan(root, e))?;
    match IndexStore::new(&canonical).load() {
        Ok(snapshot) => match hidden_override {
            Some(include_hidden) if include_hidden != snapshot.include_hidden() => {
                debug!(include_hidden, "hidden policy differs from saved index, rescanning");
                scan(&canonical, include_hidden, options)
            }
            _ => Ok(snapshot),
        },
        Err(Error::SnapshotNotFound { .. }) => {
            scan(&canonical, hidden_override.unwrap_or(false), options)
        }
        Err(e) => Err(e),
    }
}
