//! Duplicate-content queries over a single snapshot

use crate::error::{Error, Result};
use crate::hash::Fingerprint;
use crate::snapshot::{FileRecord, Snapshot};
use std::collections::BTreeMap;

/// Every fingerprint shared by two or more records
///
/// Members of each group are in path order.
pub fn find_all_duplicates(snapshot: &Snapshot) -> BTreeMap<Fingerprint, Vec<&FileRecord>> {
    snapshot
        .fingerprint_groups()
        .filter(|(_, paths)| paths.len() >= 2)
        .map(|(fingerprint, paths)| {
            let members = paths.iter().filter_map(|p| snapshot.get(p)).collect();
            (*fingerprint, members)
        })
        .collect()
}

/// Paths with the same content as `target`, the target included, sorted
pub fn find_duplicates_of(snapshot: &Snapshot, target: &str) -> Result<Vec<String>> {
    let record = snapshot.get(target).ok_or_else(|| Error::NotFound {
        path: target.to_string(),
    })?;
    Ok(snapshot.paths_with(&record.fingerprint).to_vec())
}

/// Summary of how much space duplicates take up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DuplicateStats {
    /// Number of duplicate groups
    pub groups: usize,
    /// Files beyond the first in each group
    pub redundant_files: usize,
    /// Bytes held by those redundant files
    pub wasted_bytes: u64,
}

impl DuplicateStats {
    pub fn from_groups(groups: &BTreeMap<Fingerprint, Vec<&FileRecord>>) -> Self {
        groups.values().fold(Self::default(), |mut stats, members| {
            let redundant = members.len().saturating_sub(1);
            stats.groups += 1;
            stats.redundant_files += redundant;
            // Same content, same size: any member's size will do
            stats.wasted_bytes += members.first().map_or(0, |r| r.size) * redundant as u64;
            stats
        })
    }
}
