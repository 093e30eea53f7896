//! List files with identical content

use crate::config::UserConfig;
use crate::util;
use anyhow::{Context, Result};
use ds_core::{find_all_duplicates, find_duplicates_of, DuplicateStats, Snapshot};
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn run(
    dir: Option<PathBuf>,
    path: Option<&str>,
    hidden: bool,
    rescan: bool,
    config: &UserConfig,
) -> Result<()> {
    let root = util::resolve_dir(dir)?;
    // --hidden (or the config default) is an explicit choice and beats the saved index
    let hidden_override = (hidden || config.scan.include_hidden).then_some(true);
    let options = config.scan_options(false, None);

    let snapshot = if rescan {
        ds_core::scan(&root, hidden_override.unwrap_or(false), &options)
    } else {
        ds_core::load_or_scan(&root, hidden_override, &options)
    }
    .with_context(|| format!("Failed to read {}", root.display()))?;

    match path {
        Some(target) => print_matches(&snapshot, &normalize_target(target)),
        None => {
            print_groups(&snapshot);
            Ok(())
        }
    }
}

/// Accept `./a/b` and `a\b` as well as `a/b`
fn normalize_target(target: &str) -> String {
    let target = target.replace('\\', "/");
    target.trim_start_matches("./").to_string()
}

fn print_matches(snapshot: &Snapshot, target: &str) -> Result<()> {
    let matches = find_duplicates_of(snapshot, target)?;

    if matches.len() == 1 {
        println!("{}", format!("No other file has the same content as {target}").dimmed());
        return Ok(());
    }

    println!("{} {}", "Identical to".bold(), target.cyan());
    for path in matches.iter().filter(|p| p.as_str() != target) {
        println!("  = {}", path);
    }
    Ok(())
}

/// Bytes taken by every copy in a group
fn group_bytes(size: u64, count: usize) -> u64 {
    size.saturating_mul(count as u64)
}

fn print_groups(snapshot: &Snapshot) {
    let groups = find_all_duplicates(snapshot);
    if groups.is_empty() {
        println!("{}", "No duplicates found".dimmed());
        return;
    }

    // Largest waste first, then by fingerprint for stable output
    let mut ordered: Vec<_> = groups.iter().collect();
    ordered.sort_by_key(|(fp, members)| {
        let size = members.first().map_or(0, |r| r.size);
        (std::cmp::Reverse(group_bytes(size, members.len())), **fp)
    });

    for (fingerprint, members) in ordered {
        let size = members.first().map_or(0, |r| r.size);
        println!(
            "{} {} {}",
            (&fingerprint.to_hex()[..12]).yellow(),
            util::plural(members.len(), "file"),
            format!("({} each)", util::format_size(size)).dimmed()
        );
        for record in members {
            println!("  {}", record.path);
        }
        println!();
    }

    let stats = DuplicateStats::from_groups(&groups);
    println!(
        "{}",
        format!(
            "{}, {} redundant, {} reclaimable",
            util::plural(stats.groups, "group"),
            util::plural(stats.redundant_files, "file"),
            util::format_size(stats.wasted_bytes)
        )
        .dimmed()
    );
}
