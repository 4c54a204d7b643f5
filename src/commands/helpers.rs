//! Command helper utilities

use std::path::PathBuf;

use console::Style;

use crate::cache::ResolverCache;
use crate::cli::GlobalArgs;
use crate::domain::RestoredCommand;
use crate::error::{Result, io_error};
use crate::paths;
use crate::restorer::LocalFeedRestorer;
use crate::store::PackageStore;

/// Locations and platform selectors shared by every command
#[derive(Debug, Clone)]
pub struct Context {
    pub store: PackageStore,
    pub cache: ResolverCache,
    pub feed: PathBuf,
    pub framework: String,
    pub runtime: String,
}

impl Context {
    /// Build from global flags, falling back to environment and defaults
    pub fn from_args(args: &GlobalArgs) -> Result<Self> {
        let store = match &args.store {
            Some(dir) => dir.clone(),
            None => paths::store_dir()?,
        };
        let cache = match &args.cache {
            Some(dir) => dir.clone(),
            None => paths::cache_dir()?,
        };
        let feed = match &args.feed {
            Some(dir) => dir.clone(),
            None => paths::feed_dir()?,
        };

        Ok(Self {
            store: PackageStore::new(store),
            cache: ResolverCache::new(cache),
            feed,
            framework: args.framework.clone(),
            runtime: args.runtime.clone(),
        })
    }

    pub fn restorer(&self) -> LocalFeedRestorer {
        LocalFeedRestorer::new(&self.feed)
    }
}

/// Resolve the directory manifest discovery starts from
pub fn current_dir() -> Result<PathBuf> {
    std::env::current_dir()
        .map_err(|e| io_error(format!("Failed to get current directory: {e}")))
}

/// Print commands as an indented table
pub fn print_commands(commands: &[RestoredCommand]) {
    let width = commands
        .iter()
        .map(|c| c.name.as_str().len())
        .max()
        .unwrap_or(0);

    for command in commands {
        println!(
            "    {:<width$}  {} {}",
            Style::new().bold().cyan().apply_to(command.name.as_str()),
            Style::new().dim().apply_to(&command.runner),
            command.executable.display(),
        );
    }
}

