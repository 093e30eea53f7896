//! Classify the changes between two snapshots

use crate::hash::Fingerprint;
use crate::snapshot::Snapshot;
use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::collections::VecDeque;
use tracing::debug;

/// A path whose content moved without changing
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Rename {
    pub old_path: String,
    pub new_path: String,
}

/// Classified delta between a previous and a current snapshot
///
/// Every path from either side lands in exactly one bucket, or in none when
/// it is present on both sides with the same fingerprint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Comparison {
    /// Only in the current snapshot
    pub added: Vec<String>,
    /// Same path on both sides, different content
    pub modified: Vec<String>,
    /// Only in the previous snapshot
    pub deleted: Vec<String>,
    /// Different paths, same content
    pub renamed_or_moved: Vec<Rename>,
}

impl Comparison {
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty()
            || !self.modified.is_empty()
            || !self.deleted.is_empty()
            || !self.renamed_or_moved.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_changes()
    }

    pub fn total_changes(&self) -> usize {
        self.added.len() + self.modified.len() + self.deleted.len() + self.renamed_or_moved.len()
    }
}

/// Compare `previous` against `current`
///
/// 1. Same path on both sides: modified if the fingerprint differs, otherwise
///    unchanged. Either way both sides are consumed, so a path match always
///    beats a content match.
/// 2. Each remaining current path, in path order, takes the first remaining
///    previous path with the same fingerprint (candidates in path order).
///    A previous path is matched at most once.
/// 3. Leftover current paths are added, leftover previous paths deleted.
///
/// The result depends only on the two inputs; the path ordering makes the
/// tie-break between equal-content candidates reproducible.
pub fn compare(previous: &Snapshot, current: &Snapshot) -> Comparison {
    let mut result = Comparison::default();
    let mut consumed_previous: AHashSet<&str> = AHashSet::new();
    let mut consumed_current: AHashSet<&str> = AHashSet::new();

    // Pass 1: same path
    for record in current.records() {
        if let Some(old) = previous.get(&record.path) {
            if old.fingerprint != record.fingerprint {
                result.modified.push(record.path.clone());
            }
            consumed_previous.insert(old.path.as_str());
            consumed_current.insert(record.path.as_str());
        }
    }

    // Unmatched previous paths by fingerprint, each queue in path order
    let mut candidates: AHashMap<Fingerprint, VecDeque<&str>> = AHashMap::new();
    for record in previous.records() {
        if !consumed_previous.contains(record.path.as_str()) {
            candidates
                .entry(record.fingerprint)
                .or_default()
                .push_back(record.path.as_str());
        }
    }

    // Pass 2: same content, different path
    for record in current.records() {
        if consumed_current.contains(record.path.as_str()) {
            continue;
        }
        let Some(old_path) = candidates
            .get_mut(&record.fingerprint)
            .and_then(VecDeque::pop_front)
        else {
            continue;
        };

        result.renamed_or_moved.push(Rename {
            old_path: old_path.to_string(),
            new_path: record.path.clone(),
        });
        consumed_previous.insert(old_path);
        consumed_current.insert(record.path.as_str());
    }

    // Pass 3: leftovers
    result.added = current
        .paths()
        .filter(|p| !consumed_current.contains(p))
        .map(str::to_string)
        .collect();
    result.deleted = previous
        .paths()
        .filter(|p| !consumed_previous.contains(p))
        .map(str::to_string)
        .collect();

    debug!(
        added = result.added.len(),
        modified = result.modified.len(),
        deleted = result.deleted.len(),
        renamed = result.renamed_or_moved.len(),
        "comparison complete"
    );
    result
}
