//! Command domain types
//!
//! Contains the command names exposed by installed packages and the resolved,
//! ready-to-invoke commands stored in the resolver cache.

use std::fmt;
use std::path::PathBuf;

/// A command name exposed by an installed package
///
/// Keeps its declared casing. Uniqueness across a restore batch is checked on
/// [`ToolCommandName::lowercase`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ToolCommandName(String);

impl ToolCommandName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl fmt::Display for ToolCommandName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ToolCommandName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// A resolved command of one installed package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoredCommand {
    pub name: ToolCommandName,

    /// Host that runs the entry point (e.g. "dotnet")
    pub runner: String,

    /// Absolute path to the entry point
    pub executable: PathBuf,
}

impl RestoredCommand {
    pub fn new(
        name: impl Into<ToolCommandName>,
        runner: impl Into<String>,
        executable: impl Into<PathBuf>,
    ) -> Self {
        Self {
            name: name.into(),
            runner: runner.into(),
            executable: executable.into(),
        }
    }
}

/// Formats names as `"a", "b"` for error messages.
pub fn quote_names<'a, I, T>(names: I) -> String
where
    I: IntoIterator<Item = &'a T>,
    T: fmt::Display + 'a,
{
    names
        .into_iter()
        .map(|n| format!("\"{n}\""))
        .collect::<Vec<_>>()
        .join(", ")
}
