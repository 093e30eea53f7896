//! User configuration file
//!
//! Read from `$DIRSNAP_CONFIG` if set, otherwise
//! `<config dir>/dirsnap/config.toml`. A missing file means defaults.
//!
//! ```toml
//! [scan]
//! parallel = true
//! algorithm = "blake3"
//! include_hidden = false
//! ```

use anyhow::{Context, Result};
use ds_core::{FingerprintAlgorithm, ScanOptions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "DIRSNAP_CONFIG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub scan: ScanConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Hash files in parallel
    pub parallel: bool,
    /// Fingerprint algorithm for new indexes
    pub algorithm: FingerprintAlgorithm,
    /// Include hidden files when indexing without --hidden
    pub include_hidden: bool,
}

impl UserConfig {
    /// Scan options after applying command-line flags on top of the file
    pub fn scan_options(&self, parallel: bool, algorithm: Option<FingerprintAlgorithm>) -> ScanOptions {
        ScanOptions {
            algorithm: algorithm.unwrap_or(self.scan.algorithm),
            parallel: parallel || self.scan.parallel,
        }
    }
}

/// Where the config file is expected
pub fn config_file_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("dirsnap").join("config.toml"))
}

/// Load the config file, falling back to defaults when absent
pub fn load() -> Result<UserConfig> {
    let Some(path) = config_file_path() else {
        return Ok(UserConfig::default());
    };
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    parse(&text).with_context(|| format!("Invalid config: {}", path.display()))
}

fn parse(text: &str) -> Result<UserConfig> {
    Ok(toml::from_str(text)?)
}
