//! Manifest restore orchestration
//!
//! Every manifest entry is installed independently; a failing entry is
//! recorded and the batch moves on. Once all entries ran, command names are
//! checked for case-insensitive collisions across the entries that passed,
//! and only then are those entries written to the resolver cache.
//!
//! Per-entry states:
//!
//! ```text
//! Pending -> Restoring -> Installed -> Validated
//!                      |            -> Mismatched
//!                      -> Failed
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::cache::{CacheKey, ResolverCache};
use crate::config::ManifestEntry;
use crate::domain::{PackageId, PackageVersion, RestoredCommand, ToolCommandName, quote_names};
use crate::error::{Result, ToolpackError};
use crate::installer::PackageInstaller;
use crate::restorer::{ProjectRestorer, RestoreRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    Pending,
    Restoring,
    Installed,
    Validated,
    Mismatched,
    Failed,
}

impl fmt::Display for EntryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EntryState::Pending => "pending",
            EntryState::Restoring => "restoring",
            EntryState::Installed => "installed",
            EntryState::Validated => "validated",
            EntryState::Mismatched => "mismatched",
            EntryState::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// A package installed for one manifest entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredPackage {
    pub key: CacheKey,
    pub commands: Vec<RestoredCommand>,
}

/// Installs the package behind a manifest entry
pub trait EntryInstaller {
    fn install_entry(&self, entry: &ManifestEntry) -> Result<RestoredPackage>;
}

/// Installs entries into a package store through a project restorer,
/// reusing versions that are already installed.
///
/// Cache keys use the requested framework and runtime, not the folders the
/// restorer fell back to, so lookups with the same request find them.
pub struct StoreEntryInstaller<'a> {
    installer: &'a PackageInstaller,
    restorer: &'a dyn ProjectRestorer,
    framework: String,
    runtime: String,
    additional_feeds: Vec<PathBuf>,
}

impl<'a> StoreEntryInstaller<'a> {
    pub fn new(
        installer: &'a PackageInstaller,
        restorer: &'a dyn ProjectRestorer,
        framework: impl Into<String>,
        runtime: impl Into<String>,
    ) -> Self {
        Self {
            installer,
            restorer,
            framework: framework.into(),
            runtime: runtime.into(),
            additional_feeds: Vec::new(),
        }
    }

    /// Feeds searched before any the entry names, for every entry
    #[must_use]
    pub fn with_additional_feeds(mut self, feeds: impl IntoIterator<Item = PathBuf>) -> Self {
        self.additional_feeds.extend(feeds);
        self
    }
}

impl EntryInstaller for StoreEntryInstaller<'_> {
    fn install_entry(&self, entry: &ManifestEntry) -> Result<RestoredPackage> {
        let store = self.installer.store();
        let framework = entry
            .target_framework
            .clone()
            .unwrap_or_else(|| self.framework.clone());

        let mut package = match store.try_get_package(&entry.id, &entry.version)? {
            Some(existing) => {
                debug!("Reusing installed {} {}", entry.id, entry.version);
                existing
            }
            None => {
                let feeds = self
                    .additional_feeds
                    .iter()
                    .chain(&entry.additional_feeds)
                    .cloned();
                let request = RestoreRequest::new(
                    entry.id.clone(),
                    entry.version.clone(),
                    framework.clone(),
                    self.runtime.clone(),
                )
                .with_additional_feeds(feeds);
                self.installer.install_with_restorer(&request, self.restorer)?
            }
        };

        let commands = package.commands()?.to_vec();
        Ok(RestoredPackage {
            key: CacheKey::new(
                package.id().clone(),
                package.version().clone(),
                framework,
                &self.runtime,
            ),
            commands,
        })
    }
}

/// Outcome of one manifest entry
#[derive(Debug)]
pub struct EntryOutcome {
    pub id: PackageId,
    pub version: PackageVersion,
    pub state: EntryState,
    pub error: Option<ToolpackError>,
}

impl EntryOutcome {
    fn pending(entry: &ManifestEntry) -> Self {
        Self {
            id: entry.id.clone(),
            version: entry.version.clone(),
            state: EntryState::Pending,
            error: None,
        }
    }
}

/// Outcome of a whole restore batch
#[derive(Debug, Default)]
pub struct RestoreReport {
    pub outcomes: Vec<EntryOutcome>,
    pub collision: Option<ToolpackError>,
}

impl RestoreReport {
    /// True when every entry validated and no command names collided
    pub fn is_success(&self) -> bool {
        self.collision.is_none()
            && self
                .outcomes
                .iter()
                .all(|o| o.state == EntryState::Validated)
    }

    /// Every failure message, entry failures first
    pub fn failures(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(|e| format!("{} {}: {}", o.id, o.version, e)))
            .chain(self.collision.iter().map(ToString::to_string))
            .collect()
    }

    /// `Ok` on success, else one error listing every failure
    pub fn into_result(self) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        Err(ToolpackError::RestorePartiallyFailed {
            details: self.failures().join("\n"),
        })
    }
}

/// Runs a manifest through an installer and records results in the cache
pub struct RestoreOrchestrator<'a> {
    installer: &'a dyn EntryInstaller,
    cache: &'a ResolverCache,
    content_root: PathBuf,
}

impl<'a> RestoreOrchestrator<'a> {
    /// `content_root` is the root cached executable paths are relative to
    pub fn new(
        installer: &'a dyn EntryInstaller,
        cache: &'a ResolverCache,
        content_root: impl AsRef<Path>,
    ) -> Self {
        Self {
            installer,
            cache,
            content_root: content_root.as_ref().to_path_buf(),
        }
    }

    pub fn restore(&self, entries: &[ManifestEntry]) -> RestoreReport {
        let mut report = RestoreReport {
            outcomes: entries.iter().map(EntryOutcome::pending).collect(),
            collision: None,
        };
        let mut validated: Vec<(usize, RestoredPackage)> = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let outcome = &mut report.outcomes[index];
            outcome.state = EntryState::Restoring;
            debug!("Restoring {} {}", entry.id, entry.version);

            match self.installer.install_entry(entry) {
                Err(e) => {
                    warn!("Failed to restore {} {}: {}", entry.id, entry.version, e);
                    outcome.state = EntryState::Failed;
                    outcome.error = Some(e);
                }
                Ok(restored) => {
                    outcome.state = EntryState::Installed;
                    match check_commands(entry, &restored.commands) {
                        Ok(()) => {
                            outcome.state = EntryState::Validated;
                            validated.push((index, restored));
                        }
                        Err(e) => {
                            warn!("{}", e);
                            outcome.state = EntryState::Mismatched;
                            outcome.error = Some(e);
                        }
                    }
                }
            }

            info!("{} {}: {}", outcome.id, outcome.version, outcome.state);
        }

        report.collision = find_collisions(validated.iter().map(|(_, r)| r));
        if report.collision.is_some() {
            return report;
        }

        for (index, restored) in validated {
            if let Err(e) = self
                .cache
                .save(&restored.key, &restored.commands, &self.content_root)
            {
                warn!("Failed to cache commands for {}: {}", restored.key.id, e);
                let outcome = &mut report.outcomes[index];
                outcome.state = EntryState::Failed;
                outcome.error = Some(e);
            }
        }

        report
    }
}

/// Installed command names must equal the declared ones as a set
fn check_commands(entry: &ManifestEntry, commands: &[RestoredCommand]) -> Result<()> {
    let expected: BTreeSet<&ToolCommandName> = entry.commands.iter().collect();
    let actual: BTreeSet<&ToolCommandName> = commands.iter().map(|c| &c.name).collect();

    if expected == actual {
        return Ok(());
    }

    Err(ToolpackError::CommandsMismatch {
        id: entry.id.to_string(),
        expected: quote_names(expected.iter().copied()),
        actual: quote_names(commands.iter().map(|c| &c.name)),
    })
}

/// One error naming every package and command involved in a
/// case-insensitive command name clash
fn find_collisions<'a>(packages: impl Iterator<Item = &'a RestoredPackage>) -> Option<ToolpackError> {
    let mut by_name: BTreeMap<String, Vec<(&PackageId, &ToolCommandName)>> = BTreeMap::new();
    for package in packages {
        for command in &package.commands {
            by_name
                .entry(command.name.lowercase())
                .or_default()
                .push((&package.key.id, &command.name));
        }
    }

    let mut package_ids: BTreeSet<&PackageId> = BTreeSet::new();
    let mut command_names: Vec<&ToolCommandName> = Vec::new();
    for users in by_name.values() {
        let distinct: BTreeSet<&PackageId> = users.iter().map(|(id, _)| *id).collect();
        if distinct.len() > 1 {
            package_ids.extend(distinct);
            command_names.extend(users.iter().map(|(_, name)| *name));
        }
    }

    if package_ids.is_empty() {
        return None;
    }

    Some(ToolpackError::CommandNameCollision {
        packages: quote_names(package_ids),
        commands: quote_names(command_names),
    })
}
