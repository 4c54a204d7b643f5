//! Tool settings parsing
//!
//! Every tool package ships a `ToolSettings.yaml` under
//! `tools/<framework>/<runtime>/` naming its commands and their entry points:
//!
//! ```yaml
//! version: 1
//! commands:
//!   - name: demo
//!     entryPoint: bin/demo.dll
//!     runner: dotnet
//! ```

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::reserved::reserved_word_errors;
use crate::domain::ToolCommandName;
use crate::error::{Result, ToolpackError, tool_configuration};

/// File name of the settings asset inside a tool package
pub const TOOL_SETTINGS_FILE: &str = "ToolSettings.yaml";

/// Runner used when a command does not declare one
pub const DEFAULT_RUNNER: &str = "dotnet";

/// Characters that cannot appear in a command name
const INVALID_NAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawToolSettings {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    commands: Vec<RawCommand>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCommand {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    entry_point: Option<String>,
    #[serde(default)]
    runner: Option<String>,
}

/// One validated command declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandDeclaration {
    pub name: ToolCommandName,

    /// Entry point path relative to `tools/<framework>/<runtime>/`
    pub entry_point: String,

    pub runner: String,
}

/// Validated contents of a tool settings file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolConfiguration {
    pub commands: Vec<CommandDeclaration>,
}

impl ToolConfiguration {
    /// Read and validate a settings file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ToolpackError::ToolSettingsParseFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| match e {
            ToolpackError::ToolSettingsParseFailed { reason, .. } => {
                ToolpackError::ToolSettingsParseFailed {
                    path: path.display().to_string(),
                    reason,
                }
            }
            other => other,
        })
    }

    /// Parse and validate settings content
    pub fn parse(content: &str) -> Result<Self> {
        let raw: RawToolSettings = serde_yaml::from_str(content)?;

        if let Some(version) = raw.version
            && version != 1
        {
            return Err(tool_configuration(format!(
                "unsupported tool settings version {version}"
            )));
        }

        if raw.commands.is_empty() {
            return Err(tool_configuration("tool settings declare no commands"));
        }

        let commands = raw
            .commands
            .into_iter()
            .map(validate_command)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { commands })
    }
}

fn validate_command(raw: RawCommand) -> Result<CommandDeclaration> {
    let name = raw.name.unwrap_or_default();
    if name.trim().is_empty() {
        return Err(tool_configuration("command name is missing"));
    }

    let entry_point = raw.entry_point.unwrap_or_default();
    if entry_point.trim().is_empty() {
        return Err(tool_configuration(format!(
            "entry point for command '{name}' is missing"
        )));
    }

    validate_command_name(&name)?;

    Ok(CommandDeclaration {
        name: ToolCommandName::new(name),
        entry_point,
        runner: raw
            .runner
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_RUNNER.to_string()),
    })
}

/// Check a command name for a leading dot, invalid characters and reserved words
pub fn validate_command_name(name: &str) -> Result<()> {
    if name.starts_with('.') {
        return Err(tool_configuration(format!(
            "command '{name}' cannot start with a leading dot"
        )));
    }

    if name
        .chars()
        .any(|c| INVALID_NAME_CHARS.contains(&c) || c.is_control())
    {
        let listed = INVALID_NAME_CHARS
            .iter()
            .map(|c| format!("'{c}'"))
            .collect::<Vec<_>>()
            .join(", ");
        return Err(tool_configuration(format!(
            "command '{name}' contains one or more of the following invalid characters: {listed}"
        )));
    }

    let errors = reserved_word_errors(name);
    if !errors.is_empty() {
        return Err(tool_configuration(errors.join("\n")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_single_command() {
        let config = ToolConfiguration::parse(
            r"
version: 1
commands:
  - name: demo
    entryPoint: bin/demo.dll
",
        )
        .unwrap();

        assert_eq!(config.commands.len(), 1);
        assert_eq!(config.commands[0].name.as_str(), "demo");
        assert_eq!(config.commands[0].entry_point, "bin/demo.dll");
        assert_eq!(config.commands[0].runner, DEFAULT_RUNNER);
    }

    #[test]
    fn test_parse_custom_runner() {
        let config = ToolConfiguration::parse(
            r"
commands:
  - name: demo
    entryPoint: demo.sh
    runner: sh
",
        )
        .unwrap();
        assert_eq!(config.commands[0].runner, "sh");
    }

    #[test]
    fn test_missing_fields_are_configuration_errors() {
        let err = ToolConfiguration::parse("commands:\n  - entryPoint: demo.dll\n").unwrap_err();
        assert!(matches!(err, ToolpackError::ToolConfiguration { .. }));

        let err = ToolConfiguration::parse("commands:\n  - name: demo\n").unwrap_err();
        assert!(err.to_string().contains("entry point"));

        let err = ToolConfiguration::parse("commands: []\n").unwrap_err();
        assert!(err.to_string().contains("no commands"));
    }

    #[test]
    fn test_rejects_unsupported_version() {
        let err = ToolConfiguration::parse(
            "version: 2\ncommands:\n  - name: demo\n    entryPoint: demo.dll\n",
        )
        .unwrap_err();
        assert!(err.to_string().contains("version 2"));
    }

    #[test]
    fn test_rejects_leading_dot() {
        let err = validate_command_name(".demo").unwrap_err();
        assert!(err.to_string().contains("leading dot"));
    }

    #[test]
    fn test_rejects_invalid_characters() {
        let err = validate_command_name("de:mo").unwrap_err();
        assert!(err.to_string().contains("invalid characters"));
    }

    #[test]
    fn test_rejects_reserved_word() {
        let err = validate_command_name("dotnet-demo").unwrap_err();
        assert!(matches!(err, ToolpackError::ToolConfiguration { .. }));
        assert!(err.to_string().contains("reserved"));
    }

    #[test]
    fn test_malformed_yaml_names_the_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(TOOL_SETTINGS_FILE);
        fs::write(&path, "commands: [unclosed").unwrap();

        let err = ToolConfiguration::load(&path).unwrap_err();
        match err {
            ToolpackError::ToolSettingsParseFailed { path: p, .. } => {
                assert!(p.ends_with(TOOL_SETTINGS_FILE));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
