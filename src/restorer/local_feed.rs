//! Restorer backed by a package feed on the local file system
//!
//! Feed layout:
//!
//! ```text
//! <feed>/<id>/<version>/tools/<framework>/<runtime>/...
//! ```
//!
//! Package ids are matched ignoring case. A floating request picks the highest
//! version in the feed. Feeds named by the request are searched first; the
//! first feed holding a matching version wins.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;
use walkdir::WalkDir;

use super::{ProjectRestorer, RestoreRequest};
use crate::domain::PackageVersion;
use crate::error::{Result, ToolpackError, restore_failed};
use crate::paths::DEFAULT_RUNTIME;
use crate::store::AssetsFile;

/// Folder holding platform-specific tool assets inside a package
const TOOLS_DIR: &str = "tools";

#[derive(Debug, Clone)]
pub struct LocalFeedRestorer {
    feed: PathBuf,
}

impl LocalFeedRestorer {
    pub fn new(feed: impl Into<PathBuf>) -> Self {
        Self { feed: feed.into() }
    }

    fn restore_into(&self, request: &RestoreRequest, output_dir: &Path) -> Result<()> {
        let fail = |reason: String| restore_failed(request.id.as_str(), reason);

        let feeds: Vec<&Path> = request
            .additional_feeds
            .iter()
            .chain(std::iter::once(&self.feed))
            .map(PathBuf::as_path)
            .collect();

        let mut package_found = false;
        let mut selected = None;
        for feed in &feeds {
            let Some(package_dir) = find_package_dir(feed, request)? else {
                continue;
            };
            package_found = true;
            if let Some(found) = select_version(&package_dir, &request.version)? {
                debug!("Found {} in feed {}", request.id, feed.display());
                selected = Some(found);
                break;
            }
        }

        let (version, version_dir) = selected.ok_or_else(|| {
            if package_found {
                fail(format!("version {} not found in feed", request.version))
            } else {
                fail(format!("package not found in feed {}", display_feeds(&feeds)))
            }
        })?;

        let tools_dir = version_dir.join(TOOLS_DIR);
        let framework = select_framework(&tools_dir, &request.framework)?.ok_or_else(|| {
            fail(format!(
                "no tool assets for framework '{}'",
                request.framework
            ))
        })?;
        let runtime = select_runtime(&tools_dir.join(&framework), &request.runtime)?
            .ok_or_else(|| fail(format!("no tool assets for runtime '{}'", request.runtime)))?;

        debug!(
            "Restoring {} {} ({}/{}) from {}",
            request.id,
            version,
            framework,
            runtime,
            version_dir.display()
        );

        let content_root = output_dir
            .join(request.id.lowercase())
            .join(version.normalized());
        copy_tree(&version_dir, &content_root)?;

        let assets = list_assets(
            &content_root,
            &content_root.join(TOOLS_DIR).join(&framework).join(&runtime),
        );

        AssetsFile {
            package_id: request.id.to_string(),
            version: version.normalized(),
            target_framework: framework,
            runtime_identifier: runtime.to_lowercase(),
            assets,
        }
        .write(output_dir)
    }
}

impl ProjectRestorer for LocalFeedRestorer {
    fn restore(&self, request: &RestoreRequest, output_dir: &Path) -> Result<()> {
        self.restore_into(request, output_dir).map_err(|e| match e {
            ToolpackError::RestoreFailed { .. } => e,
            other => restore_failed(request.id.as_str(), other),
        })
    }
}

fn find_package_dir(feed: &Path, request: &RestoreRequest) -> Result<Option<PathBuf>> {
    Ok(child_dirs(feed)?
        .into_iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(request.id.as_str()))
        .map(|(_, path)| path))
}

fn display_feeds(feeds: &[&Path]) -> String {
    feeds
        .iter()
        .map(|f| f.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Subdirectories of `dir` as (name, path); empty when `dir` is missing
fn child_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut children = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir()
            && let Some(name) = entry.file_name().to_str()
        {
            children.push((name.to_string(), entry.path()));
        }
    }
    children.sort();
    Ok(children)
}

fn select_version(
    package_dir: &Path,
    requested: &PackageVersion,
) -> Result<Option<(PackageVersion, PathBuf)>> {
    let available = child_dirs(package_dir)?
        .into_iter()
        .filter_map(|(name, path)| PackageVersion::concrete(&name).ok().map(|v| (v, path)));

    let selected = if requested.is_floating() {
        available.max_by(|(a, _), (b, _)| a.as_version().cmp(&b.as_version()))
    } else {
        available.into_iter().find(|(v, _)| v == requested)
    };
    Ok(selected)
}

/// The requested framework, or the only one the package ships
fn select_framework(tools_dir: &Path, requested: &str) -> Result<Option<String>> {
    let names: Vec<String> = child_dirs(tools_dir)?.into_iter().map(|(n, _)| n).collect();

    if let Some(found) = names.iter().find(|n| n.eq_ignore_ascii_case(requested)) {
        return Ok(Some(found.clone()));
    }
    match names.as_slice() {
        [only] => Ok(Some(only.clone())),
        _ => Ok(None),
    }
}

/// The requested runtime, else the portable `any` runtime
fn select_runtime(framework_dir: &Path, requested: &str) -> Result<Option<String>> {
    let names: Vec<String> = child_dirs(framework_dir)?
        .into_iter()
        .map(|(n, _)| n)
        .collect();

    Ok(names
        .iter()
        .find(|n| n.eq_ignore_ascii_case(requested))
        .or_else(|| names.iter().find(|n| n.eq_ignore_ascii_case(DEFAULT_RUNTIME)))
        .cloned())
}

fn copy_tree(src: &Path, dst: &Path) -> Result<()> {
    for entry in WalkDir::new(src) {
        let entry = entry.map_err(|e| crate::error::io_error(e.to_string()))?;
        let Ok(relative) = entry.path().strip_prefix(src) else {
            continue;
        };
        let target = dst.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Files under `asset_dir` as forward-slash paths relative to `content_root`
fn list_assets(content_root: &Path, asset_dir: &Path) -> Vec<String> {
    let mut assets: Vec<String> = WalkDir::new(asset_dir)
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| {
            e.path().strip_prefix(content_root).ok().map(|relative| {
                relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/")
            })
        })
        .collect();
    assets.sort();
    assets
}
