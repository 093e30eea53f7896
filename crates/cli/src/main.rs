//! dirsnap CLI - dsnap command

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use ds_core::FingerprintAlgorithm;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;
mod config;
mod util;

/// dirsnap - snapshot a directory and see what changed since
#[derive(Parser)]
#[command(name = "dsnap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug); RUST_LOG wins if set
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index all files, including subdirectories (creates or replaces the index)
    Index {
        /// Directory to index (default: current directory)
        dir: Option<PathBuf>,
        /// Include hidden files and directories
        #[arg(long)]
        hidden: bool,
        /// Hash files on all cores
        #[arg(long)]
        parallel: bool,
        /// Hash function for fingerprints
        #[arg(long, value_enum)]
        algorithm: Option<AlgorithmArg>,
    },
    /// Compare the current state with the saved index
    Compare {
        /// Indexed directory (default: current directory)
        dir: Option<PathBuf>,
        /// Include hidden files (default: the setting saved in the index)
        #[arg(long)]
        hidden: bool,
        /// Hash files on all cores
        #[arg(long)]
        parallel: bool,
        /// Print the comparison as JSON
        #[arg(long)]
        json: bool,
    },
    /// List files that share identical content
    Dupes {
        /// Directory (default: current directory)
        dir: Option<PathBuf>,
        /// Only show files identical to this one (path relative to DIR)
        #[arg(long)]
        path: Option<String>,
        /// Include hidden files when scanning
        #[arg(long)]
        hidden: bool,
        /// Scan the directory even if an index exists
        #[arg(long)]
        rescan: bool,
    },
    /// Show what the saved index contains
    Info {
        /// Indexed directory (default: current directory)
        dir: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Sha256,
    Blake3,
}

impl From<AlgorithmArg> for FingerprintAlgorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Sha256 => FingerprintAlgorithm::Sha256,
            AlgorithmArg::Blake3 => FingerprintAlgorithm::Blake3,
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = config::load()?;

    match cli.command {
        Commands::Index { dir, hidden, parallel, algorithm } => {
            cmd::index::run(dir, hidden, parallel, algorithm.map(Into::into), &config)
        }
        Commands::Compare { dir, hidden, parallel, json } => {
            cmd::compare::run(dir, hidden, parallel, json, &config)
        }
        Commands::Dupes { dir, path, hidden, rescan } => {
            cmd::dupes::run(dir, path.as_deref(), hidden, rescan, &config)
        }
        Commands::Info { dir } => cmd::info::run(dir),
    }
}
