//! Compare the working tree with the saved index

use crate::config::UserConfig;
use crate::util;
use anyhow::{Context, Result};
use ds_core::Comparison;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn run(
    dir: Option<PathBuf>,
    hidden: bool,
    parallel: bool,
    json: bool,
    config: &UserConfig,
) -> Result<()> {
    let root = util::resolve_dir(dir)?;
    // Only an explicit --hidden overrides what the index was saved with
    let hidden_override = hidden.then_some(true);
    let options = config.scan_options(parallel, None);

    let report = match ds_core::compare_with_saved(&root, hidden_override, &options) {
        Err(e) if e.is_snapshot_not_found() => {
            anyhow::bail!("{e}\nRun 'dsnap index' first to create one")
        }
        other => other.with_context(|| format!("Failed to compare {}", root.display()))?,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report.comparison)?);
    } else {
        print_comparison(&report.comparison);
    }
    Ok(())
}

fn print_comparison(c: &Comparison) {
    if !c.has_changes() {
        println!("{}", "No changes detected".dimmed());
        return;
    }

    if !c.added.is_empty() {
        println!("\n{}", "Added:".green().bold());
        for path in &c.added {
            println!("  {} {}", "+".green(), path);
        }
    }

    if !c.modified.is_empty() {
        println!("\n{}", "Modified:".yellow().bold());
        for path in &c.modified {
            println!("  {} {}", "~".yellow(), path);
        }
    }

    if !c.renamed_or_moved.is_empty() {
        println!("\n{}", "Renamed/Moved:".cyan().bold());
        for rename in &c.renamed_or_moved {
            println!("  {} {} -> {}", "→".cyan(), rename.old_path, rename.new_path);
        }
    }

    if !c.deleted.is_empty() {
        println!("\n{}", "Deleted:".red().bold());
        for path in &c.deleted {
            println!("  {} {}", "-".red(), path);
        }
    }

    println!();
    println!(
        "{}",
        format!(
            "{} added, {} modified, {} renamed/moved, {} deleted",
            c.added.len(),
            c.modified.len(),
            c.renamed_or_moved.len(),
            c.deleted.len()
        )
        .dimmed()
    );
}
