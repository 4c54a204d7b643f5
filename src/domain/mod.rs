//! Domain models for Toolpack
//!
//! Pure value types for package identity, versions and commands. They carry
//! the comparison rules (case-insensitive ids and command names) the rest of
//! the crate relies on.

pub mod command;
pub mod package;

pub use command::{RestoredCommand, ToolCommandName, quote_names};
pub use package::{PackageId, PackageVersion, STAGING_DIR};
