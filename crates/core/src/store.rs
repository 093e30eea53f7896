//! On-disk persistence of the saved snapshot
//!
//! The index lives in a single JSON file at the root of the indexed tree:
//! ```text
//! <root>/
//!   dirsnap.json      <- never indexes itself
//!   ...
//! ```
//! ```json
//! {
//!   "files": { "src/main.rs": { "hash": "<hex>", "size": 12, "mod_time": "<rfc3339>" } },
//!   "abs_path": "/abs/root",
//!   "include_hidden": false,
//!   "algorithm": "sha256"
//! }
//! ```

use crate::error::{Error, Result};
use crate::hash::{Fingerprint, FingerprintAlgorithm};
use crate::snapshot::{FileRecord, Snapshot};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Well-known name of the index file, relative to the snapshot root
pub const INDEX_FILE_NAME: &str = "dirsnap.json";

#[derive(Serialize, Deserialize)]
struct IndexFile {
    files: BTreeMap<String, Content>,
    abs_path: PathBuf,
    include_hidden: bool,
    /// Indexes written before the algorithm was recorded are SHA-256
    #[serde(default)]
    algorithm: FingerprintAlgorithm,
}

#[derive(Serialize, Deserialize)]
struct Content {
    hash: Fingerprint,
    size: u64,
    mod_time: DateTime<Utc>,
}

/// Serialize a snapshot to index bytes (pretty JSON)
pub fn to_bytes(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let file = IndexFile {
        files: snapshot
            .records()
            .map(|r| {
                (
                    r.path.clone(),
                    Content {
                        hash: r.fingerprint,
                        size: r.size,
                        mod_time: r.modified_at,
                    },
                )
            })
            .collect(),
        abs_path: snapshot.root_path().to_path_buf(),
        include_hidden: snapshot.include_hidden(),
        algorithm: snapshot.algorithm(),
    };
    Ok(serde_json::to_vec_pretty(&file)?)
}

/// Parse index bytes back into a snapshot, records kept verbatim
pub fn from_bytes(bytes: &[u8]) -> Result<Snapshot> {
    let file: IndexFile = serde_json::from_slice(bytes)?;
    let records = file
        .files
        .into_iter()
        .map(|(path, content)| {
            let record = FileRecord::new(path.clone(), content.hash, content.size, content.mod_time);
            (path, record)
        })
        .collect();
    Ok(Snapshot::from_map(
        file.abs_path,
        file.include_hidden,
        file.algorithm,
        records,
    ))
}

/// The saved index of one root directory
#[derive(Debug, Clone)]
pub struct IndexStore {
    root: PathBuf,
}

impl IndexStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Full path of the index file
    pub fn index_path(&self) -> PathBuf {
        self.root.join(INDEX_FILE_NAME)
    }

    pub fn exists(&self) -> bool {
        self.index_path().is_file()
    }

    /// Load the saved snapshot
    ///
    /// [`Error::SnapshotNotFound`] if nothing was saved yet,
    /// [`Error::Serialization`] if the file is malformed.
    pub fn load(&self) -> Result<Snapshot> {
        let path = self.index_path();
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(Error::SnapshotNotFound { path });
            }
            Err(e) => return Err(Error::io(path, e)),
        };

        let snapshot = from_bytes(&bytes)?;
        debug!(path = %path.display(), files = snapshot.len(), "loaded index");
        Ok(snapshot)
    }

    /// Replace the saved snapshot atomically
    pub fn save(&self, snapshot: &Snapshot) -> Result<()> {
        let bytes = to_bytes(snapshot)?;
        let path = self.index_path();
        atomic_write(&path, &bytes)?;
        debug!(path = %path.display(), files = snapshot.len(), "saved index");
        Ok(())
    }
}

/// Atomic write helper
///
/// Writes to a temporary file next to `target`, fsyncs it, then renames it
/// over the target. Readers see either the old file or the new one.
pub fn atomic_write(target: &Path, data: &[u8]) -> Result<()> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| Error::io(dir, e))?;
    tmp.write_all(data).map_err(|e| Error::io(tmp.path(), e))?;
    tmp.as_file().sync_all().map_err(|e| Error::io(tmp.path(), e))?;
    tmp.persist(target).map_err(|e| Error::io(target, e.error))?;

    #[cfg(unix)]
    {
        let dir_handle = std::fs::File::open(dir).map_err(|e| Error::io(dir, e))?;
        dir_handle.sync_all().map_err(|e| Error::io(dir, e))?;
    }

    Ok(())
}
