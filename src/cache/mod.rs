//! Resolver cache
//!
//! Remembers which commands an installed package exposes so later lookups
//! skip reading restore output and settings files. Layout:
//!
//! ```text
//! <cache-root>/<format-version>/<package-id>.json
//! ```
//!
//! Each file holds a JSON array of rows, one per (version, framework,
//! runtime). Executable paths are stored relative to a content root so the
//! cache survives moving the store. The first row saved for a key wins; later
//! saves for the same key are ignored.

use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::domain::{PackageId, PackageVersion, RestoredCommand};
use crate::error::{Result, cache_operation_failed};
use crate::paths::CACHE_FORMAT_VERSION;

/// Address of one cache row
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub id: PackageId,
    pub version: PackageVersion,
    pub framework: String,
    pub runtime: String,
}

impl CacheKey {
    pub fn new(
        id: PackageId,
        version: PackageVersion,
        framework: impl Into<String>,
        runtime: impl AsRef<str>,
    ) -> Self {
        Self {
            id,
            version,
            framework: framework.into(),
            runtime: runtime.as_ref().to_lowercase(),
        }
    }

    fn matches(&self, row: &CacheRow) -> bool {
        row.version == self.version.normalized()
            && row.target_framework == self.framework
            && row.runtime_identifier == self.runtime
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CacheRow {
    version: String,
    target_framework: String,
    runtime_identifier: String,
    serializable_command_settings_array: Vec<CachedCommand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CachedCommand {
    name: String,
    runner: String,
    #[serde(rename = "RelativeToNuGetGlobalPackagesFolderPathToDll")]
    relative_path: String,
}

/// Per-package JSON files under one versioned directory
#[derive(Debug, Clone)]
pub struct ResolverCache {
    dir: PathBuf,
}

impl ResolverCache {
    /// Open the cache rooted at `cache_root`; nothing is created until a save
    pub fn new(cache_root: impl AsRef<Path>) -> Self {
        Self {
            dir: cache_root.as_ref().join(CACHE_FORMAT_VERSION),
        }
    }

    /// Cache file for one package
    pub fn file_for(&self, id: &PackageId) -> PathBuf {
        self.dir.join(format!("{}.json", id.lowercase()))
    }

    /// Record `commands` for `key` unless a row for it already exists
    pub fn save(&self, key: &CacheKey, commands: &[RestoredCommand], content_root: &Path) -> Result<()> {
        let path = self.file_for(&key.id);
        let mut rows = if path.exists() {
            read_rows(&path)?
        } else {
            Vec::new()
        };

        if rows.iter().any(|row| key.matches(row)) {
            debug!("Cache row for {} {} already present", key.id, key.version);
            return Ok(());
        }

        let cached = commands
            .iter()
            .map(|command| {
                Ok(CachedCommand {
                    name: command.name.to_string(),
                    runner: command.runner.clone(),
                    relative_path: relative_to(&command.executable, content_root)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        rows.push(CacheRow {
            version: key.version.normalized(),
            target_framework: key.framework.clone(),
            runtime_identifier: key.runtime.clone(),
            serializable_command_settings_array: cached,
        });

        write_rows(&self.dir, &path, &rows)?;
        debug!("Cached {} command(s) for {} {}", commands.len(), key.id, key.version);
        Ok(())
    }

    /// Commands recorded for `key`, empty on a miss
    pub fn load(&self, key: &CacheKey, content_root: &Path) -> Vec<RestoredCommand> {
        let path = self.file_for(&key.id);
        if !path.exists() {
            debug!("Cache miss for {}: no cache file", key.id);
            return Vec::new();
        }

        let rows = match read_rows(&path) {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Ignoring unreadable resolver cache file: {}", e);
                return Vec::new();
            }
        };

        let Some(row) = rows.into_iter().find(|row| key.matches(row)) else {
            debug!("Cache miss for {} {}", key.id, key.version);
            return Vec::new();
        };

        debug!("Cache hit for {} {}", key.id, key.version);
        row.serializable_command_settings_array
            .into_iter()
            .map(|c| RestoredCommand::new(c.name.as_str(), c.runner, expand(content_root, &c.relative_path)))
            .collect()
    }
}

fn read_rows(path: &Path) -> Result<Vec<CacheRow>> {
    let content = fs::read_to_string(path).map_err(|e| {
        cache_operation_failed(format!("Failed to read cache file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        cache_operation_failed(format!("Failed to parse cache file {}: {}", path.display(), e))
    })
}

/// Replace the cache file in one rename
fn write_rows(dir: &Path, path: &Path, rows: &[CacheRow]) -> Result<()> {
    let failed = |e: &dyn std::fmt::Display| {
        cache_operation_failed(format!("Failed to write cache file {}: {}", path.display(), e))
    };

    fs::create_dir_all(dir).map_err(|e| failed(&e))?;
    let content = serde_json::to_string_pretty(rows)?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| failed(&e))?;
    file.write_all(content.as_bytes()).map_err(|e| failed(&e))?;
    file.persist(path).map_err(|e| failed(&e.error))?;
    Ok(())
}

/// `path` relative to `root`, with forward slashes
fn relative_to(path: &Path, root: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).map_err(|_| {
        cache_operation_failed(format!(
            "{} is not under {}",
            path.display(),
            root.display()
        ))
    })?;

    Ok(relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/"))
}

fn expand(root: &Path, relative: &str) -> PathBuf {
    relative
        .split(['/', '\\'])
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |acc, segment| acc.join(segment))
}
