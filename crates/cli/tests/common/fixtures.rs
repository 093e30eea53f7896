//! Temporary directory trees for workflow tests

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A scratch tree under its own temp directory
///
/// The tree lives in `<temp>/tree` so the test config file can sit beside it
/// without being indexed.
pub struct TestTree {
    _temp: TempDir,
    root: PathBuf,
}

impl TestTree {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new()?;
        let root = fs::canonicalize(temp.path())?.join("tree");
        fs::create_dir(&root)?;
        Ok(Self { _temp: temp, root })
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Write a file, creating parent directories
    pub fn write(&self, rel: &str, content: &str) -> Result<()> {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    pub fn remove(&self, rel: &str) -> Result<()> {
        fs::remove_file(self.root.join(rel))?;
        Ok(())
    }

    /// Rename within the tree, creating the destination's parent
    pub fn rename(&self, from: &str, to: &str) -> Result<()> {
        let dest = self.root.join(to);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::rename(self.root.join(from), dest)?;
        Ok(())
    }

    /// Write the user config file the CLI is pointed at
    pub fn write_config(&self, toml: &str) -> Result<()> {
        fs::write(self.root.join("..").join("dsnap-test-config.toml"), toml)?;
        Ok(())
    }
}
