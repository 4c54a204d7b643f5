//! Configuration file handling for Toolpack
//!
//! This module contains:
//! - `ToolSettings.yaml` - per-package command declarations
//! - `toolpack-tools.json` - project tools manifest
//! - the reserved command name rules shared by both

pub mod manifest;
pub mod reserved;
pub mod tool_settings;

pub use manifest::ManifestEntry;
pub use tool_settings::{TOOL_SETTINGS_FILE, ToolConfiguration};
