//! Snapshot assembly from a traversal sequence
//!
//! The builder does not walk the filesystem itself. It consumes any sequence
//! of [`TraversalEntry`] values, applies the self-exclusion and hidden-file
//! rules, and fingerprints every retained regular file. [`walk`] is the
//! default supplier, built on `walkdir`.

use crate::error::{Error, Result};
use crate::hash::{FingerprintAlgorithm, Fingerprinter, Sha256};
use crate::snapshot::{FileRecord, Snapshot};
use crate::store::INDEX_FILE_NAME;
use ahash::AHashSet;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::ffi::OsStr;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};
use walkdir::WalkDir;

/// One filesystem entry produced by a traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraversalEntry {
    /// Absolute path of the entry
    pub abs_path: PathBuf,
    /// Final path component
    pub base_name: String,
    /// Directory (true) or regular file (false)
    pub is_dir: bool,
}

impl TraversalEntry {
    pub fn file(abs_path: impl Into<PathBuf>) -> Self {
        Self::new(abs_path.into(), false)
    }

    pub fn dir(abs_path: impl Into<PathBuf>) -> Self {
        Self::new(abs_path.into(), true)
    }

    fn new(abs_path: PathBuf, is_dir: bool) -> Self {
        let base_name = abs_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self {
            abs_path,
            base_name,
            is_dir,
        }
    }
}

/// Knobs for [`scan`]
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanOptions {
    /// Hash function for fingerprints
    pub algorithm: FingerprintAlgorithm,
    /// Hash files on the rayon pool instead of one after another
    pub parallel: bool,
}

/// Assembles a [`Snapshot`] from a traversal sequence
pub struct SnapshotBuilder<'a> {
    root: PathBuf,
    include_hidden: bool,
    fingerprinter: &'a dyn Fingerprinter,
    parallel: bool,
}

impl SnapshotBuilder<'static> {
    /// Builder for `root` using SHA-256 and sequential hashing
    pub fn new(root: impl Into<PathBuf>, include_hidden: bool) -> Self {
        Self {
            root: root.into(),
            include_hidden,
            fingerprinter: &Sha256,
            parallel: false,
        }
    }
}

impl<'a> SnapshotBuilder<'a> {
    /// Use a different hash function
    pub fn fingerprinter<'b>(self, fingerprinter: &'b dyn Fingerprinter) -> SnapshotBuilder<'b> {
        SnapshotBuilder {
            root: self.root,
            include_hidden: self.include_hidden,
            fingerprinter,
            parallel: self.parallel,
        }
    }

    /// Hash retained files in parallel
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Consume the traversal and produce a snapshot
    ///
    /// Entry order does not matter: a file under a hidden directory is dropped
    /// whether or not the directory itself was seen first. The first error,
    /// from the traversal or from hashing, aborts the whole build. Two entries
    /// mapping to the same relative path (for instance non-UTF-8 names that
    /// convert to the same string) fail with [`Error::DuplicatePath`].
    pub fn build<I>(self, entries: I) -> Result<Snapshot>
    where
        I: IntoIterator<Item = Result<TraversalEntry>>,
    {
        let index_path = self.root.join(INDEX_FILE_NAME);
        let mut records = BTreeMap::new();
        let mut pending = Vec::new();
        let mut seen: AHashSet<String> = AHashSet::new();

        for entry in entries {
            let entry = entry?;
            let Some(rel_path) = self.retain(&entry, &index_path)? else {
                continue;
            };
            if !seen.insert(rel_path.clone()) {
                return Err(Error::DuplicatePath(rel_path));
            }

            if self.parallel {
                pending.push((rel_path, entry.abs_path));
            } else {
                let record = self.record(rel_path, &entry.abs_path)?;
                records.insert(record.path.clone(), record);
            }
        }

        if !pending.is_empty() {
            debug!(files = pending.len(), "hashing in parallel");
            let hashed = pending
                .into_par_iter()
                .map(|(rel_path, abs_path)| self.record(rel_path, &abs_path))
                .collect::<Result<Vec<_>>>()?;

            // Single-threaded insert once every task is done
            for record in hashed {
                records.insert(record.path.clone(), record);
            }
        }

        Ok(Snapshot::from_map(
            self.root,
            self.include_hidden,
            self.fingerprinter.algorithm(),
            records,
        ))
    }

    /// Relative path of an entry that becomes a record, `None` if it is skipped
    fn retain(&self, entry: &TraversalEntry, index_path: &Path) -> Result<Option<String>> {
        // The index never indexes itself, whatever the hidden policy says
        if entry.abs_path == index_path {
            debug!(path = %entry.abs_path.display(), "skipping index file");
            return Ok(None);
        }

        if entry.abs_path == self.root {
            return Ok(None);
        }

        let rel_path = relative_path(&self.root, &entry.abs_path)?;

        if !self.include_hidden
            && (is_hidden(&entry.base_name) || rel_path.split('/').any(is_hidden))
        {
            debug!(path = %rel_path, "skipping hidden entry");
            return Ok(None);
        }

        if entry.is_dir {
            return Ok(None);
        }

        Ok(Some(rel_path))
    }

    fn record(&self, rel_path: String, abs_path: &Path) -> Result<FileRecord> {
        let metadata = fs::metadata(abs_path).map_err(|e| Error::scan(abs_path, e))?;
        let fingerprint = self
            .fingerprinter
            .fingerprint_file(abs_path)
            .map_err(|e| Error::scan(abs_path, e))?;
        let modified = metadata.modified().map_err(|e| Error::scan(abs_path, e))?;

        debug!(path = %rel_path, %fingerprint, "hashed");
        Ok(FileRecord::new(
            rel_path,
            fingerprint,
            metadata.len(),
            DateTime::<Utc>::from(modified),
        ))
    }
}

/// Hidden means the name starts with a dot
pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

fn is_hidden_os(name: &OsStr) -> bool {
    is_hidden(&name.to_string_lossy())
}

/// `abs_path` relative to `root`, joined with `/`
fn relative_path(root: &Path, abs_path: &Path) -> Result<String> {
    let stripped = abs_path.strip_prefix(root).map_err(|_| Error::Traversal {
        path: abs_path.to_path_buf(),
        message: format!("entry is outside root {}", root.display()),
    })?;

    let mut parts = Vec::new();
    for component in stripped.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy()),
            Component::CurDir => {}
            _ => {
                return Err(Error::Traversal {
                    path: abs_path.to_path_buf(),
                    message: "entry path is not normalized".to_string(),
                })
            }
        }
    }
    Ok(parts.join("/"))
}

/// Walk `root` depth-first, yielding directories and regular files
///
/// Hidden directories are pruned here already when `include_hidden` is false.
/// A symlink to a regular file is reported as a file and later hashed through
/// the link. Symlinks to directories are not followed. A dangling symlink is a
/// scan error.
pub fn walk(root: &Path, include_hidden: bool) -> impl Iterator<Item = Result<TraversalEntry>> {
    WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(move |e| include_hidden || e.depth() == 0 || !is_hidden_os(e.file_name()))
        .filter_map(|result| match result {
            Ok(entry) => {
                let file_type = entry.file_type();
                let is_dir = if file_type.is_symlink() {
                    match fs::metadata(entry.path()) {
                        Ok(target) if target.is_file() => false,
                        Ok(_) => {
                            debug!(path = %entry.path().display(), "skipping symlink to non-file");
                            return None;
                        }
                        Err(e) => return Some(Err(Error::scan(entry.path(), e))),
                    }
                } else if file_type.is_dir() || file_type.is_file() {
                    file_type.is_dir()
                } else {
                    return None;
                };
                Some(Ok(TraversalEntry {
                    base_name: entry.file_name().to_string_lossy().into_owned(),
                    is_dir,
                    abs_path: entry.into_path(),
                }))
            }
            Err(err) => Some(Err(Error::Traversal {
                path: err.path().map(Path::to_path_buf).unwrap_or_default(),
                message: err.to_string(),
            })),
        })
}

/// Walk and fingerprint a directory tree
///
/// `root` is canonicalized first, so the snapshot always records an absolute
/// root.
pub fn scan(root: &Path, include_hidden: bool, options: &ScanOptions) -> Result<Snapshot> {
    let root = fs::canonicalize(root).map_err(|e| Error::scan(root, e))?;
    if !root.is_dir() {
        return Err(Error::Traversal {
            path: root,
            message: "not a directory".to_string(),
        });
    }

    let start = Instant::now();
    let snapshot = SnapshotBuilder::new(root.clone(), include_hidden)
        .fingerprinter(options.algorithm.fingerprinter())
        .parallel(options.parallel)
        .build(walk(&root, include_hidden))?;

    info!(
        root = %root.display(),
        files = snapshot.len(),
        algorithm = %options.algorithm,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scan complete"
    );
    Ok(snapshot)
}
