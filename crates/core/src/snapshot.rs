//! Snapshot data model: the indexed state of a directory at one point in time

use crate::error::{Error, Result};
use crate::hash::{Fingerprint, FingerprintAlgorithm};
use ahash::AHashMap;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One indexed file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path relative to the snapshot root, `/`-separated
    pub path: String,
    /// Content digest
    pub fingerprint: Fingerprint,
    /// Size in bytes (reporting only)
    pub size: u64,
    /// Last modification time (reporting only)
    pub modified_at: DateTime<Utc>,
}

impl FileRecord {
    pub fn new(
        path: impl Into<String>,
        fingerprint: Fingerprint,
        size: u64,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            path: path.into(),
            fingerprint,
            size,
            modified_at,
        }
    }
}

/// Immutable set of [`FileRecord`]s taken against one root directory
///
/// `records` is the single source of truth. The fingerprint index is derived
/// from it at construction and never touched afterwards, so the two views
/// cannot drift apart.
#[derive(Debug, Clone)]
pub struct Snapshot {
    root_path: PathBuf,
    include_hidden: bool,
    algorithm: FingerprintAlgorithm,
    /// Path -> record, iterated in lexicographic path order
    records: BTreeMap<String, FileRecord>,
    /// Fingerprint -> paths sharing it (each list sorted)
    by_fingerprint: AHashMap<Fingerprint, Vec<String>>,
}

impl Snapshot {
    /// Build a snapshot from records the caller already holds
    ///
    /// Fails with [`Error::DuplicatePath`] if two records share a path.
    pub fn from_records(
        root_path: impl Into<PathBuf>,
        include_hidden: bool,
        algorithm: FingerprintAlgorithm,
        records: impl IntoIterator<Item = FileRecord>,
    ) -> Result<Self> {
        let mut map = BTreeMap::new();
        for record in records {
            if map.contains_key(&record.path) {
                return Err(Error::DuplicatePath(record.path));
            }
            map.insert(record.path.clone(), record);
        }
        Ok(Self::from_map(root_path.into(), include_hidden, algorithm, map))
    }

    /// Empty snapshot for a root
    pub fn empty(root_path: impl Into<PathBuf>, include_hidden: bool) -> Self {
        Self::from_map(
            root_path.into(),
            include_hidden,
            FingerprintAlgorithm::default(),
            BTreeMap::new(),
        )
    }

    pub(crate) fn from_map(
        root_path: PathBuf,
        include_hidden: bool,
        algorithm: FingerprintAlgorithm,
        records: BTreeMap<String, FileRecord>,
    ) -> Self {
        let mut by_fingerprint: AHashMap<Fingerprint, Vec<String>> = AHashMap::new();
        // BTreeMap iteration is sorted, so every list comes out sorted too
        for (path, record) in &records {
            by_fingerprint
                .entry(record.fingerprint)
                .or_default()
                .push(path.clone());
        }

        Self {
            root_path,
            include_hidden,
            algorithm,
            records,
            by_fingerprint,
        }
    }

    /// Absolute root the snapshot was taken against
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Whether hidden entries were retained
    pub fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    /// Hash function used for every fingerprint in this snapshot
    pub fn algorithm(&self) -> FingerprintAlgorithm {
        self.algorithm
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by relative path
    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.records.get(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.records.contains_key(path)
    }

    /// All records in path order
    pub fn records(&self) -> impl Iterator<Item = &FileRecord> + '_ {
        self.records.values()
    }

    /// All relative paths in lexicographic order
    pub fn paths(&self) -> impl Iterator<Item = &str> + '_ {
        self.records.keys().map(String::as_str)
    }

    /// Paths whose content hashes to `fingerprint`, sorted
    pub fn paths_with(&self, fingerprint: &Fingerprint) -> &[String] {
        self.by_fingerprint
            .get(fingerprint)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Every distinct fingerprint with the paths that share it
    pub fn fingerprint_groups(&self) -> impl Iterator<Item = (&Fingerprint, &[String])> + '_ {
        self.by_fingerprint
            .iter()
            .map(|(fp, paths)| (fp, paths.as_slice()))
    }

    /// Sum of all record sizes
    pub fn total_size(&self) -> u64 {
        self.records.values().map(|r| r.size).sum()
    }
}

impl PartialEq for Snapshot {
    fn eq(&self, other: &Self) -> bool {
        self.root_path == other.root_path
            && self.include_hidden == other.include_hidden
            && self.algorithm == other.algorithm
            && self.records == other.records
    }
}

impl Eq for Snapshot {}
