//! Package store
//!
//! Installed packages live at `<root>/<id>/<version>/`. A version directory
//! exists only once that version is fully installed, so its presence is the
//! record of the install. In-flight operations work in `<root>/.stage/<random>/`
//! and are never visible to readers of the store.
//!
//! Directory names use the lower-cased package id; the original casing is kept
//! in each package's restore metadata.

pub mod assets;
pub mod package;

use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use rand::distr::Alphanumeric;
use tracing::debug;

use crate::domain::{PackageId, PackageVersion, STAGING_DIR};
use crate::error::{Result, ToolpackError};

pub use assets::AssetsFile;
pub use package::InstalledPackage;

/// Length of random staging directory names
const STAGING_NAME_LEN: usize = 16;

/// Maps package ids and versions to directories under one root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageStore {
    root: PathBuf,
}

impl PackageStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let root = std::path::absolute(&root).unwrap_or(root);
        Self {
            root: dunce::simplified(&root).to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding every installed version of `id`
    pub fn root_directory_for(&self, id: &PackageId) -> PathBuf {
        self.root.join(id.lowercase())
    }

    /// Directory of one installed version
    pub fn directory_for(&self, id: &PackageId, version: &PackageVersion) -> PathBuf {
        self.root_directory_for(id).join(version.normalized())
    }

    /// A fresh staging path. The directory is not created.
    pub fn new_staging_directory(&self) -> PathBuf {
        let name: String = rand::rng()
            .sample_iter(&Alphanumeric)
            .take(STAGING_NAME_LEN)
            .map(|b| char::from(b).to_ascii_lowercase())
            .collect();
        self.root.join(STAGING_DIR).join(name)
    }

    /// Installed package ids, skipping the staging folder and foreign entries
    pub fn enumerate_packages(&self) -> Result<Vec<PackageId>> {
        let mut ids: Vec<PackageId> = subdirectory_names(&self.root)?
            .into_iter()
            .filter(|name| name != STAGING_DIR)
            .filter_map(|name| {
                PackageId::new(name.as_str())
                    .ok()
                    .filter(|id| id.lowercase() == name)
            })
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Installed versions of `id`, oldest first
    pub fn enumerate_versions(&self, id: &PackageId) -> Result<Vec<PackageVersion>> {
        let mut versions: Vec<PackageVersion> =
            subdirectory_names(&self.root_directory_for(id))?
                .into_iter()
                .filter_map(|name| PackageVersion::concrete(&name).ok())
                .collect();
        versions.sort_by(|a, b| a.as_version().cmp(&b.as_version()));
        Ok(versions)
    }

    /// The installed package, or `None` when that version is not installed
    pub fn try_get_package(
        &self,
        id: &PackageId,
        version: &PackageVersion,
    ) -> Result<Option<InstalledPackage>> {
        let directory = self.directory_for(id, version);
        if !directory.is_dir() {
            return Ok(None);
        }
        InstalledPackage::open(self.clone(), id.clone(), version.clone(), directory).map(Some)
    }

    /// All installed packages with every version
    pub fn installed_packages(&self) -> Result<Vec<(PackageId, Vec<PackageVersion>)>> {
        self.enumerate_packages()?
            .into_iter()
            .map(|id| {
                let versions = self.enumerate_versions(&id)?;
                Ok((id, versions))
            })
            .collect()
    }

    /// The single version a restore placed under `<stage>/<id>/`
    pub fn staged_package_version(&self, stage: &Path, id: &PackageId) -> Result<PackageVersion> {
        let not_found = || ToolpackError::StagedVersionNotFound { id: id.to_string() };

        let names = subdirectory_names(&stage.join(id.lowercase()))?;
        match names.as_slice() {
            [only] => {
                debug!("Resolved staged version of {} to {}", id, only);
                PackageVersion::concrete(only).map_err(|_| not_found())
            }
            _ => Err(not_found()),
        }
    }
}

/// Names of the directories directly under `dir`; empty when `dir` is missing
fn subdirectory_names(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir()
            && let Some(name) = entry.file_name().to_str()
        {
            names.push(name.to_string());
        }
    }
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn id(s: &str) -> PackageId {
        PackageId::new(s).unwrap()
    }

    fn version(s: &str) -> PackageVersion {
        PackageVersion::concrete(s).unwrap()
    }

    #[test]
    fn test_directory_layout() {
        let temp = TempDir::new().unwrap();
        let store = PackageStore::new(temp.path());

        assert_eq!(
            store.directory_for(&id("Demo.Tool"), &version("1.2")),
            store.root().join("demo.tool").join("1.2.0")
        );
    }

    #[test]
    fn test_staging_directories_are_unique() {
        let temp = TempDir::new().unwrap();
        let store = PackageStore::new(temp.path());

        let a = store.new_staging_directory();
        let b = store.new_staging_directory();
        assert_ne!(a, b);
        assert_eq!(a.parent().unwrap(), store.root().join(STAGING_DIR));
        assert!(!a.exists());
    }

    #[test]
    fn test_enumerate_skips_staging_and_foreign_entries() {
        let temp = TempDir::new().unwrap();
        let store = PackageStore::new(temp.path());

        fs::create_dir_all(store.root().join(STAGING_DIR).join("abc")).unwrap();
        fs::create_dir_all(store.root().join("demo.tool").join("1.0.0")).unwrap();
        fs::create_dir_all(store.root().join("demo.tool").join("2.0.0")).unwrap();
        fs::create_dir_all(store.root().join("demo.tool").join("not-a-version")).unwrap();
        fs::write(store.root().join("stray.txt"), "x").unwrap();

        let ids = store.enumerate_packages().unwrap();
        assert_eq!(ids, vec![id("demo.tool")]);

        let versions = store.enumerate_versions(&id("demo.tool")).unwrap();
        assert_eq!(versions, vec![version("1.0.0"), version("2.0.0")]);
    }

    #[test]
    fn test_enumerate_skips_mixed_case_directories() {
        let temp = TempDir::new().unwrap();
        let store = PackageStore::new(temp.path());

        fs::create_dir_all(store.root().join("Other.Tool").join("1.0.0")).unwrap();
        fs::create_dir_all(store.root().join("demo.tool").join("1.0.0")).unwrap();

        assert_eq!(store.enumerate_packages().unwrap(), vec![id("demo.tool")]);
        let listed = store.installed_packages().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].1, vec![version("1.0.0")]);
    }

    #[test]
    fn test_missing_store_enumerates_nothing() {
        let temp = TempDir::new().unwrap();
        let store = PackageStore::new(temp.path().join("missing"));
        assert!(store.enumerate_packages().unwrap().is_empty());
        assert!(store.enumerate_versions(&id("x.y")).unwrap().is_empty());
    }

    #[test]
    fn test_try_get_package_not_found() {
        let temp = TempDir::new().unwrap();
        let store = PackageStore::new(temp.path());
        assert!(
            store
                .try_get_package(&id("demo.tool"), &version("1.0.0"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_staged_version_requires_exactly_one() {
        let temp = TempDir::new().unwrap();
        let store = PackageStore::new(temp.path());
        let stage = store.new_staging_directory();
        let pkg = id("demo.tool");

        assert!(matches!(
            store.staged_package_version(&stage, &pkg),
            Err(ToolpackError::StagedVersionNotFound { .. })
        ));

        fs::create_dir_all(stage.join("demo.tool").join("1.2.3")).unwrap();
        assert_eq!(
            store.staged_package_version(&stage, &pkg).unwrap(),
            version("1.2.3")
        );

        fs::create_dir_all(stage.join("demo.tool").join("1.2.4")).unwrap();
        assert!(store.staged_package_version(&stage, &pkg).is_err());
    }
}
