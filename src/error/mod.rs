//! Error types and handling for Toolpack
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! Variants are grouped by the layer that raises them:
//! - package identity and versions
//! - store and transactional install/uninstall
//! - tool configuration (settings asset)
//! - resolver cache
//! - manifest and restore orchestration
//! - file system

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for Toolpack operations
#[derive(Error, Diagnostic, Debug)]
pub enum ToolpackError {
    // Package identity errors
    #[error("Invalid package id: '{id}'")]
    #[diagnostic(
        code(toolpack::package::invalid_id),
        help("Package ids cannot be empty, contain path separators or be '.', '..' or '.stage'")
    )]
    InvalidPackageId { id: String },

    #[error("Invalid package version: '{version}'")]
    #[diagnostic(
        code(toolpack::package::invalid_version),
        help("Use a semantic version such as 1.2.3, or '*' for the latest version")
    )]
    InvalidVersion { version: String },

    #[error("Package '{id}' version {version} is not installed")]
    #[diagnostic(
        code(toolpack::package::not_found),
        help("Run 'toolpack list' to see installed packages")
    )]
    PackageNotFound { id: String, version: String },

    // Store and install errors
    #[error("Tool package '{id}' version {version} is already installed")]
    #[diagnostic(
        code(toolpack::install::conflict),
        help("Uninstall the existing version first or choose a different version")
    )]
    PackageConflict { id: String, version: String },

    #[error("Failed to restore package '{id}': {reason}")]
    #[diagnostic(
        code(toolpack::install::restore_failed),
        help("Check that the package and version exist in the configured feed")
    )]
    RestoreFailed { id: String, reason: String },

    #[error("Failed to find staged tool package '{id}'")]
    #[diagnostic(code(toolpack::install::staged_version_not_found))]
    StagedVersionNotFound { id: String },

    #[error("Package '{id}' is missing asset '{asset}'")]
    #[diagnostic(
        code(toolpack::install::missing_asset),
        help("Tool packages must ship their files under tools/<framework>/<runtime>/")
    )]
    MissingAsset { id: String, asset: String },

    #[error("Failed to install tool package '{id}': {reason}")]
    #[diagnostic(code(toolpack::install::failed))]
    InstallFailed { id: String, reason: String },

    #[error("Failed to uninstall tool package '{id}': {reason}")]
    #[diagnostic(code(toolpack::uninstall::failed))]
    UninstallFailed { id: String, reason: String },

    // Tool configuration errors
    #[error("Invalid tool configuration: {message}")]
    #[diagnostic(code(toolpack::config::invalid))]
    ToolConfiguration { message: String },

    #[error("Failed to parse tool settings file {path}: {reason}")]
    #[diagnostic(code(toolpack::config::parse_failed))]
    ToolSettingsParseFailed { path: String, reason: String },

    // Resolver cache errors
    #[error("Resolver cache operation failed: {message}")]
    #[diagnostic(code(toolpack::cache::operation_failed))]
    CacheOperationFailed { message: String },

    // Manifest and restore errors
    #[error("No tool manifest found in {searched_from} or its parent directories")]
    #[diagnostic(
        code(toolpack::manifest::not_found),
        help("Create .config/toolpack-tools.json or pass the manifest path explicitly")
    )]
    ManifestNotFound { searched_from: String },

    #[error("Failed to parse tool manifest {path}: {reason}")]
    #[diagnostic(code(toolpack::manifest::parse_failed))]
    ManifestParseFailed { path: String, reason: String },

    #[error(
        "The commands from package '{id}' are {actual}, which do not match the commands {expected} declared in the manifest"
    )]
    #[diagnostic(
        code(toolpack::restore::commands_mismatch),
        help("Update the manifest's command list to match the package")
    )]
    CommandsMismatch {
        id: String,
        expected: String,
        actual: String,
    },

    #[error("Packages {packages} contain commands with the same name {commands}")]
    #[diagnostic(
        code(toolpack::restore::command_name_collision),
        help("Command names must be unique across all tools in one manifest, ignoring case")
    )]
    CommandNameCollision { packages: String, commands: String },

    #[error("Restore was only partially successful:\n{details}")]
    #[diagnostic(code(toolpack::restore::partial))]
    RestorePartiallyFailed { details: String },

    // CLI errors
    #[error("Unknown shell: {shell}")]
    #[diagnostic(
        code(toolpack::cli::unsupported_shell),
        help("Supported shells: bash, elvish, fish, powershell, zsh")
    )]
    UnsupportedShell { shell: String },

    // File system errors
    #[error("IO error: {message}")]
    #[diagnostic(code(toolpack::fs::io_error))]
    IoError { message: String },
}

impl ToolpackError {
    /// Short machine-friendly name of the failure kind, used in restore reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ToolpackError::InvalidPackageId { .. } | ToolpackError::InvalidVersion { .. } => {
                "invalid"
            }
            ToolpackError::PackageNotFound { .. } => "not-found",
            ToolpackError::PackageConflict { .. } => "conflict",
            ToolpackError::RestoreFailed { .. } | ToolpackError::StagedVersionNotFound { .. } => {
                "restore"
            }
            ToolpackError::MissingAsset { .. } => "missing-asset",
            ToolpackError::ToolConfiguration { .. }
            | ToolpackError::ToolSettingsParseFailed { .. } => "configuration",
            ToolpackError::CommandsMismatch { .. } => "mismatch",
            ToolpackError::CommandNameCollision { .. } => "collision",
            ToolpackError::CacheOperationFailed { .. } => "cache",
            ToolpackError::ManifestNotFound { .. } | ToolpackError::ManifestParseFailed { .. } => {
                "manifest"
            }
            ToolpackError::RestorePartiallyFailed { .. } => "partial",
            ToolpackError::UnsupportedShell { .. } => "cli",
            ToolpackError::InstallFailed { .. }
            | ToolpackError::UninstallFailed { .. }
            | ToolpackError::IoError { .. } => "io",
        }
    }
}

/// Creates a restore failure for a package
pub fn restore_failed(id: impl Into<String>, reason: impl std::fmt::Display) -> ToolpackError {
    ToolpackError::RestoreFailed {
        id: id.into(),
        reason: reason.to_string(),
    }
}

/// Creates a tool configuration error
pub fn tool_configuration(message: impl Into<String>) -> ToolpackError {
    ToolpackError::ToolConfiguration {
        message: message.into(),
    }
}

/// Creates a cache operation failed error
pub fn cache_operation_failed(message: impl Into<String>) -> ToolpackError {
    ToolpackError::CacheOperationFailed {
        message: message.into(),
    }
}

/// Creates an IO error
pub fn io_error(message: impl Into<String>) -> ToolpackError {
    ToolpackError::IoError {
        message: message.into(),
    }
}

impl From<std::io::Error> for ToolpackError {
    fn from(err: std::io::Error) -> Self {
        ToolpackError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for ToolpackError {
    fn from(err: serde_yaml::Error) -> Self {
        ToolpackError::ToolSettingsParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ToolpackError {
    fn from(err: serde_json::Error) -> Self {
        ToolpackError::CacheOperationFailed {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, ToolpackError>;
