//! Index a directory

use crate::config::UserConfig;
use crate::util;
use anyhow::{Context, Result};
use ds_core::FingerprintAlgorithm;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub fn run(
    dir: Option<PathBuf>,
    hidden: bool,
    parallel: bool,
    algorithm: Option<FingerprintAlgorithm>,
    config: &UserConfig,
) -> Result<()> {
    let root = util::resolve_dir(dir)?;
    let include_hidden = hidden || config.scan.include_hidden;
    let options = config.scan_options(parallel, algorithm);

    let report = ds_core::index(&root, include_hidden, &options)
        .with_context(|| format!("Failed to index {}", root.display()))?;

    println!(
        "{} Indexed {}",
        "✓".green(),
        util::plural(report.file_count(), "file")
    );
    println!(
        "{}",
        format!(
            "{} ({}, {}{})",
            report.snapshot.root_path().display(),
            util::format_size(report.snapshot.total_size()),
            options.algorithm,
            if include_hidden { ", hidden included" } else { "" }
        )
        .dimmed()
    );
    if report.replaced {
        println!("{}", "Previous index replaced".dimmed());
    }

    Ok(())
}
