//! Project restorer collaborator
//!
//! A restorer fetches one package into a staging directory: the package files
//! go to `<output>/<id>/<version>/` and the selected framework, runtime and
//! asset listing go to `<output>/project.assets.json`. The installer owns the
//! staging directory; the restorer only fills it.

pub mod local_feed;

use std::path::{Path, PathBuf};

use crate::domain::{PackageId, PackageVersion};
use crate::error::Result;

pub use local_feed::LocalFeedRestorer;

/// What to restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreRequest {
    pub id: PackageId,

    /// Concrete version, or floating to pick the latest available
    pub version: PackageVersion,

    /// Preferred target framework folder (e.g. "net8.0")
    pub framework: String,

    /// Preferred runtime identifier (e.g. "linux-x64")
    pub runtime: String,

    /// Feeds searched before the restorer's own, in order
    pub additional_feeds: Vec<PathBuf>,
}

impl RestoreRequest {
    pub fn new(
        id: PackageId,
        version: PackageVersion,
        framework: impl Into<String>,
        runtime: impl Into<String>,
    ) -> Self {
        Self {
            id,
            version,
            framework: framework.into(),
            runtime: runtime.into(),
            additional_feeds: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_additional_feeds(mut self, feeds: impl IntoIterator<Item = PathBuf>) -> Self {
        self.additional_feeds.extend(feeds);
        self
    }
}

/// Populates a staging directory with a package's files
pub trait ProjectRestorer {
    /// Restore `request` into `output_dir`; any failure aborts the install
    fn restore(&self, request: &RestoreRequest, output_dir: &Path) -> Result<()>;
}
