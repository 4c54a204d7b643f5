//! Transactional package installation
//!
//! An install restores the package into a private staging directory, then
//! publishes it with a single directory rename into `<root>/<id>/<version>/`.
//! Nothing is visible in the store before the rename, and every failure after
//! it removes the published directory again.
//!
//! Steps:
//! 1. Allocate a staging directory
//! 2. Run the restore callback into it
//! 3. Resolve a floating version from the staged package folder
//! 4. Refuse to replace an existing install
//! 5. Rename the staging directory into place
//! 6. Resolve the settings and entry-point assets

pub mod matcher;

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::domain::{PackageId, PackageVersion};
use crate::error::{Result, ToolpackError};
use crate::restorer::{ProjectRestorer, RestoreRequest};
use crate::store::{InstalledPackage, PackageStore};
use crate::transaction::{RollbackStep, run_transactionally};

/// Installs packages into a store
#[derive(Debug, Clone)]
pub struct PackageInstaller {
    store: PackageStore,
}

impl PackageInstaller {
    pub fn new(store: PackageStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &PackageStore {
        &self.store
    }

    /// Install `id` at `requested_version`, filling the staging directory with
    /// `restore`
    pub fn install<F>(
        &self,
        id: &PackageId,
        requested_version: &PackageVersion,
        restore: F,
    ) -> Result<InstalledPackage>
    where
        F: FnOnce(&Path) -> Result<()>,
    {
        let package_root = self.store.root_directory_for(id);

        run_transactionally(|tx| {
            let stage = self.store.new_staging_directory();
            tx.on_rollback(RollbackStep::RemoveDir(stage.clone()));
            tx.on_rollback(RollbackStep::RemoveDirIfEmpty(package_root.clone()));

            debug!("Staging {} {} at {}", id, requested_version, stage.display());
            fs::create_dir_all(&stage)?;

            restore(&stage)?;

            let version = if requested_version.is_floating() {
                self.store.staged_package_version(&stage, id)?
            } else {
                requested_version.clone()
            };

            let final_dir = self.store.directory_for(id, &version);
            if final_dir.exists() {
                return Err(ToolpackError::PackageConflict {
                    id: id.to_string(),
                    version: version.to_string(),
                });
            }

            fs::create_dir_all(&package_root)?;
            fs::rename(&stage, &final_dir)?;
            tx.on_rollback(RollbackStep::RemoveDir(final_dir.clone()));
            debug!("Moved {} into {}", stage.display(), final_dir.display());

            let mut package =
                InstalledPackage::open(self.store.clone(), id.clone(), version, final_dir)?;
            package.commands()?;

            Ok(package)
        })
        .map_err(|e| match e {
            ToolpackError::IoError { message } => ToolpackError::InstallFailed {
                id: id.to_string(),
                reason: message,
            },
            other => other,
        })
        .inspect(|package| info!("Installed {} {}", package.id(), package.version()))
    }

    /// Install using a project restorer to fill the staging directory
    pub fn install_with_restorer(
        &self,
        request: &RestoreRequest,
        restorer: &dyn ProjectRestorer,
    ) -> Result<InstalledPackage> {
        self.install(&request.id, &request.version, |stage| {
            restorer.restore(request, stage)
        })
    }
}
