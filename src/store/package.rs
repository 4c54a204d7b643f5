//! Installed package handle
//!
//! Wraps one `<root>/<id>/<version>/` directory. Commands are resolved from
//! the package's settings asset on first access and kept afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::PackageStore;
use super::assets::AssetsFile;
use crate::config::{TOOL_SETTINGS_FILE, ToolConfiguration};
use crate::domain::{PackageId, PackageVersion, RestoredCommand};
use crate::error::{Result, ToolpackError};
use crate::installer::matcher::find_asset;
use crate::transaction::{CommitStep, RollbackStep, remove_dir_if_empty, run_transactionally};

#[derive(Debug, Clone)]
pub struct InstalledPackage {
    store: PackageStore,
    id: PackageId,
    version: PackageVersion,
    directory: PathBuf,
    assets: AssetsFile,

    /// Filled on first call to `commands()`
    commands: Option<Vec<RestoredCommand>>,
}

impl InstalledPackage {
    /// Open an installed package directory, reading its restore metadata
    pub(crate) fn open(
        store: PackageStore,
        id: PackageId,
        version: PackageVersion,
        directory: PathBuf,
    ) -> Result<Self> {
        let assets = AssetsFile::read(&directory)?;
        Ok(Self {
            store,
            id,
            version,
            directory,
            assets,
            commands: None,
        })
    }

    pub fn id(&self) -> &PackageId {
        &self.id
    }

    pub fn version(&self) -> &PackageVersion {
        &self.version
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Folder the asset paths are relative to
    pub fn content_root(&self) -> PathBuf {
        self.directory()
            .join(self.id.lowercase())
            .join(self.version.normalized())
    }

    pub fn framework(&self) -> &str {
        &self.assets.target_framework
    }

    pub fn runtime(&self) -> &str {
        &self.assets.runtime_identifier
    }

    /// Commands exposed by this package, resolved once
    pub fn commands(&mut self) -> Result<&[RestoredCommand]> {
        if self.commands.is_none() {
            let resolved = self.resolve_commands()?;
            self.commands = Some(resolved);
        }
        Ok(self.commands.as_deref().unwrap_or_default())
    }

    fn resolve_commands(&self) -> Result<Vec<RestoredCommand>> {
        let content_root = self.content_root();

        let settings = self.locate(TOOL_SETTINGS_FILE)?;
        let configuration = ToolConfiguration::load(&content_root.join(settings))?;

        configuration
            .commands
            .into_iter()
            .map(|command| {
                let entry_point = self.locate(&command.entry_point)?;
                Ok(RestoredCommand::new(
                    command.name,
                    command.runner,
                    content_root.join(entry_point),
                ))
            })
            .collect()
    }

    fn locate(&self, relative: &str) -> Result<&str> {
        find_asset(&self.assets.assets, relative).ok_or_else(|| ToolpackError::MissingAsset {
            id: self.id.to_string(),
            asset: relative.to_string(),
        })
    }

    /// Remove this version from the store
    ///
    /// The version directory is moved into a staging folder first, and the id
    /// folder is removed once empty. The staged copy is deleted only after
    /// both steps succeed; on failure it is moved back.
    pub fn uninstall(&self) -> Result<()> {
        let original = self.directory.clone();
        let package_root = self.store.root_directory_for(&self.id);

        run_transactionally(|tx| {
            if original.is_dir() {
                let staged = self.store.new_staging_directory();
                if let Some(parent) = staged.parent() {
                    fs::create_dir_all(parent)?;
                }

                debug!("Staging {} for removal at {}", original.display(), staged.display());
                fs::rename(&original, &staged)?;

                tx.on_rollback(RollbackStep::MoveBack {
                    staged: staged.clone(),
                    original: original.clone(),
                });
                tx.on_commit(CommitStep::RemoveDir(staged));
            }

            remove_dir_if_empty(&package_root)?;
            Ok(())
        })
        .map_err(|e| ToolpackError::UninstallFailed {
            id: self.id.to_string(),
            reason: e.to_string(),
        })?;

        info!("Uninstalled {} {}", self.id, self.version);
        Ok(())
    }
}
