//! Show what the saved index contains

use crate::util;
use anyhow::{Context, Result};
use ds_core::{find_all_duplicates, DuplicateStats, IndexStore};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn run(dir: Option<PathBuf>) -> Result<()> {
    let root = util::resolve_dir(dir)?;
    let store = IndexStore::new(&root);

    let snapshot = match store.load() {
        Err(e) if e.is_snapshot_not_found() => {
            anyhow::bail!("{e}\nRun 'dsnap index' first to create one")
        }
        other => other.context("Failed to load index")?,
    };

    let latest = snapshot.records().map(|r| r.modified_at).max();
    let dupes = DuplicateStats::from_groups(&find_all_duplicates(&snapshot));

    println!("{}", "Index".bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!();
    println!("Root:          {}", snapshot.root_path().display().to_string().cyan());
    println!("Index file:    {}", store.index_path().display());
    println!("Algorithm:     {}", snapshot.algorithm());
    println!("Hidden files:  {}", if snapshot.include_hidden() { "included" } else { "excluded" });
    println!();
    println!("Files:         {}", snapshot.len());
    println!("Total size:    {}", util::format_size(snapshot.total_size()));
    if let Some(ts) = latest {
        println!("Newest file:   {}", util::format_time(ts));
    }
    println!(
        "Duplicates:    {} ({} reclaimable)",
        util::plural(dupes.groups, "group"),
        util::format_size(dupes.wasted_bytes)
    );

    Ok(())
}
