//! Restore output metadata (`project.assets.json`)
//!
//! Written by the restorer into the staging directory and moved with it into
//! the package directory. Records which framework and runtime were selected
//! and every asset file placed under `tools/<framework>/<runtime>/`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, io_error};

/// File name of the restore metadata inside a staging or package directory
pub const ASSETS_FILE: &str = "project.assets.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsFile {
    pub package_id: String,
    pub version: String,
    pub target_framework: String,
    pub runtime_identifier: String,

    /// Forward-slash paths relative to the package content root
    #[serde(default)]
    pub assets: Vec<String>,
}

impl AssetsFile {
    /// Read the metadata from `dir`
    pub fn read(dir: &Path) -> Result<Self> {
        let path = dir.join(ASSETS_FILE);
        let content = fs::read_to_string(&path)
            .map_err(|e| io_error(format!("Failed to read {}: {}", path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| io_error(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Write the metadata into `dir`
    pub fn write(&self, dir: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join(ASSETS_FILE), content)?;
        Ok(())
    }
}
