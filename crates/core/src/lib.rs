//! Content-addressed directory snapshots and change classification
//!
//! This crate provides:
//! - Pluggable content fingerprints (SHA-256, BLAKE3)
//! - Snapshot assembly from a traversal sequence
//! - Comparison of two snapshots into added / modified / deleted / renamed
//! - Duplicate-content grouping
//! - JSON persistence of the saved index

pub mod diff;
pub mod duplicates;
pub mod error;
pub mod hash;
pub mod ops;
pub mod scan;
pub mod snapshot;
pub mod store;

// Re-exports
pub use diff::{compare, Comparison, Rename};
pub use duplicates::{find_all_duplicates, find_duplicates_of, DuplicateStats};
pub use error::{Error, Result};
pub use hash::{Fingerprint, FingerprintAlgorithm, Fingerprinter};
pub use ops::{compare_with_saved, index, load_or_scan, CompareReport, IndexReport};
pub use scan::{scan, walk, ScanOptions, SnapshotBuilder, TraversalEntry};
pub use snapshot::{FileRecord, Snapshot};
pub use store::{IndexStore, INDEX_FILE_NAME};
