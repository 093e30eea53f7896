//! CLI command implementations

pub mod compare;
pub mod dupes;
pub mod index;
pub mod info;
