//! Workflow integration tests
//!
//! End-to-end runs of the `dsnap` binary against real temp trees.

pub mod duplicates;
pub mod index_compare;
