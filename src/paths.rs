//! Default locations and platform selectors
//!
//! Every location can be overridden with an environment variable, and the CLI
//! flags override those in turn.

use std::path::PathBuf;

use crate::error::{Result, io_error};

/// Directory name under the platform data and cache directories
const APP_DIR: &str = "toolpack";

/// Subdirectory of the home directory holding installed packages
const STORE_DIR: &str = "store";

/// Subdirectory of the home directory holding the local package feed
const FEED_DIR: &str = "feed";

/// Subdirectory of the cache directory holding resolver cache files
const RESOLVER_DIR: &str = "resolver";

/// Resolver cache format version, used as a path segment
pub const CACHE_FORMAT_VERSION: &str = "1";

/// Target framework used when none is requested
pub const DEFAULT_FRAMEWORK: &str = "net8.0";

/// Runtime identifier used when none is requested
pub const DEFAULT_RUNTIME: &str = "any";

pub const HOME_ENV: &str = "TOOLPACK_HOME";
pub const STORE_ENV: &str = "TOOLPACK_STORE_DIR";
pub const CACHE_ENV: &str = "TOOLPACK_CACHE_DIR";
pub const FEED_ENV: &str = "TOOLPACK_FEED";

fn env_path(name: &str) -> Option<PathBuf> {
    std::env::var_os(name)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Toolpack home directory
///
/// Uses the platform's standard data location with a `toolpack`
/// subdirectory. Can be overridden with `TOOLPACK_HOME`.
pub fn home_dir() -> Result<PathBuf> {
    if let Some(home) = env_path(HOME_ENV) {
        return Ok(home);
    }

    let base = dirs::data_dir().ok_or_else(|| io_error("Could not determine data directory"))?;
    Ok(base.join(APP_DIR))
}

/// Package store root
pub fn store_dir() -> Result<PathBuf> {
    if let Some(store) = env_path(STORE_ENV) {
        return Ok(store);
    }
    Ok(home_dir()?.join(STORE_DIR))
}

/// Resolver cache root, without the format version segment
pub fn cache_dir() -> Result<PathBuf> {
    if let Some(cache) = env_path(CACHE_ENV) {
        return Ok(cache);
    }

    let base = dirs::cache_dir().ok_or_else(|| io_error("Could not determine cache directory"))?;
    Ok(base.join(APP_DIR).join(RESOLVER_DIR))
}

/// Local package feed
pub fn feed_dir() -> Result<PathBuf> {
    if let Some(feed) = env_path(FEED_ENV) {
        return Ok(feed);
    }
    Ok(home_dir()?.join(FEED_DIR))
}
