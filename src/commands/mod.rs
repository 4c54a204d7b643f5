//! Command implementations for Toolpack CLI

pub mod completions;
pub mod helpers;
pub mod install;
pub mod list;
pub mod resolve;
pub mod restore;
pub mod uninstall;
pub mod version;
