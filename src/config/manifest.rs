//! Tools manifest (`toolpack-tools.json`)
//!
//! The manifest pins the tools a project needs:
//!
//! ```json
//! {
//!   "version": 1,
//!   "tools": {
//!     "demo.tool": { "version": "1.0.0", "commands": ["demo"] },
//!     "local.tool": { "version": "0.1.0", "commands": ["local"], "addSource": ["../feed"] }
//!   }
//! }
//! ```
//!
//! Relative `addSource` feeds are resolved against the manifest's directory.
//!
//! Tools keep their file order. Every tool is checked before returning so one
//! run reports all broken entries.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::domain::{PackageId, PackageVersion, ToolCommandName};
use crate::error::{Result, ToolpackError};

/// Manifest file name
pub const MANIFEST_FILE: &str = "toolpack-tools.json";

/// Directory searched before the project root itself
pub const MANIFEST_CONFIG_DIR: &str = ".config";

const SUPPORTED_VERSION: u64 = 1;

/// One tool the manifest asks to restore
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestEntry {
    pub id: PackageId,
    pub version: PackageVersion,
    pub commands: Vec<ToolCommandName>,

    /// Overrides the default target framework for this tool
    pub target_framework: Option<String>,

    /// Feeds searched before the default one when restoring this tool
    pub additional_feeds: Vec<PathBuf>,
}

impl ManifestEntry {
    pub fn new(id: PackageId, version: PackageVersion, commands: Vec<ToolCommandName>) -> Self {
        Self {
            id,
            version,
            commands,
            target_framework: None,
            additional_feeds: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawManifest {
    version: Option<u64>,
    #[serde(default)]
    tools: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTool {
    version: Option<String>,
    #[serde(default)]
    commands: Vec<String>,
    target_framework: Option<String>,
    #[serde(default)]
    add_source: Vec<String>,
}

/// Load a manifest file
pub fn load(path: &Path) -> Result<Vec<ManifestEntry>> {
    let content = fs::read_to_string(path).map_err(|e| parse_failed(path, e))?;
    let mut entries = parse(&content).map_err(|reason| parse_failed(path, reason))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    for entry in &mut entries {
        for feed in &mut entry.additional_feeds {
            if feed.is_relative() {
                *feed = base.join(&*feed);
            }
        }
    }
    Ok(entries)
}

fn parse_failed(path: &Path, reason: impl std::fmt::Display) -> ToolpackError {
    ToolpackError::ManifestParseFailed {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Parse manifest content, returning every problem joined on failure
fn parse(content: &str) -> std::result::Result<Vec<ManifestEntry>, String> {
    let raw: RawManifest = serde_json::from_str(content).map_err(|e| e.to_string())?;

    match raw.version {
        None => return Err("manifest is missing the 'version' field".to_string()),
        Some(0) => return Err("manifest version 0 is invalid".to_string()),
        Some(v) if v > SUPPORTED_VERSION => {
            return Err(format!(
                "manifest version {v} is not supported, expected {SUPPORTED_VERSION}"
            ));
        }
        Some(_) => {}
    }

    let mut entries = Vec::with_capacity(raw.tools.len());
    let mut problems = Vec::new();

    for (name, value) in raw.tools {
        match parse_tool(&name, value) {
            Ok(entry) => entries.push(entry),
            Err(errors) => {
                problems.push(format!("in package '{name}':"));
                problems.extend(errors.into_iter().map(|e| format!("  {e}")));
            }
        }
    }

    if problems.is_empty() {
        Ok(entries)
    } else {
        Err(problems.join("\n"))
    }
}

fn parse_tool(name: &str, value: Value) -> std::result::Result<ManifestEntry, Vec<String>> {
    let raw: RawTool = serde_json::from_value(value).map_err(|e| vec![e.to_string()])?;
    let mut errors = Vec::new();

    let id = PackageId::new(name).map_err(|e| errors.push(e.to_string())).ok();

    let version = match raw.version.as_deref() {
        None => {
            errors.push("version is missing".to_string());
            None
        }
        Some(v) => PackageVersion::concrete(v)
            .map_err(|e| errors.push(e.to_string()))
            .ok(),
    };

    if raw.commands.is_empty() {
        errors.push("commands are missing".to_string());
    }

    match (id, version) {
        (Some(id), Some(version)) if errors.is_empty() => {
            let commands = raw.commands.iter().map(|c| ToolCommandName::new(c.as_str()));
            Ok(ManifestEntry {
                target_framework: raw.target_framework,
                additional_feeds: raw.add_source.into_iter().map(PathBuf::from).collect(),
                ..ManifestEntry::new(id, version, commands.collect())
            })
        }
        _ => Err(errors),
    }
}

/// Find the nearest manifest at or above `start`
pub fn discover(start: &Path) -> Result<PathBuf> {
    for dir in start.ancestors() {
        for candidate in [
            dir.join(MANIFEST_CONFIG_DIR).join(MANIFEST_FILE),
            dir.join(MANIFEST_FILE),
        ] {
            if candidate.is_file() {
                debug!("Found tool manifest at {}", candidate.display());
                return Ok(candidate);
            }
        }
    }

    Err(ToolpackError::ManifestNotFound {
        searched_from: start.display().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_keeps_file_order() {
        let entries = parse(
            r#"{
                "version": 1,
                "tools": {
                    "zeta.tool": { "version": "2.0.0", "commands": ["zeta"] },
                    "Demo.Tool": { "version": "1.0", "commands": ["demo", "demo-admin"], "targetFramework": "net6.0" }
                }
            }"#,
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id.as_str(), "zeta.tool");
        assert_eq!(entries[1].id.as_str(), "Demo.Tool");
        assert_eq!(entries[1].version.normalized(), "1.0.0");
        assert_eq!(entries[1].commands.len(), 2);
        assert_eq!(entries[1].target_framework.as_deref(), Some("net6.0"));
    }

    #[test]
    fn test_rejects_bad_manifest_versions() {
        assert!(parse(r#"{"version": 0, "tools": {}}"#).unwrap_err().contains("invalid"));
        assert!(parse(r#"{"version": 2, "tools": {}}"#).unwrap_err().contains("not supported"));
        assert!(parse(r#"{"tools": {}}"#).unwrap_err().contains("missing"));
    }

    #[test]
    fn test_aggregates_package_errors() {
        let err = parse(
            r#"{
                "version": 1,
                "tools": {
                    "no.version": { "commands": ["a1"] },
                    "no.commands": { "version": "1.0.0" },
                    "floating": { "version": "*", "commands": ["f1"] }
                }
            }"#,
        )
        .unwrap_err();

        assert!(err.contains("in package 'no.version'"));
        assert!(err.contains("version is missing"));
        assert!(err.contains("in package 'no.commands'"));
        assert!(err.contains("commands are missing"));
        assert!(err.contains("in package 'floating'"));
    }

    #[test]
    fn test_load_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILE);
        fs::write(&path, "{ not json").unwrap();

        match load(&path).unwrap_err() {
            ToolpackError::ManifestParseFailed { path: p, .. } => {
                assert!(p.ends_with(MANIFEST_FILE));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_load_resolves_add_source_against_manifest_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(MANIFEST_FILE);
        let absolute = temp.path().join("abs-feed");
        fs::write(
            &path,
            format!(
                r#"{{
                    "version": 1,
                    "tools": {{
                        "demo.tool": {{ "version": "1.0.0", "commands": ["demo"], "addSource": ["feeds/local", {:?}] }},
                        "plain.tool": {{ "version": "1.0.0", "commands": ["plain"] }}
                    }}
                }}"#,
                absolute.display().to_string()
            ),
        )
        .unwrap();

        let entries = load(&path).unwrap();
        assert_eq!(
            entries[0].additional_feeds,
            vec![temp.path().join("feeds/local"), absolute]
        );
        assert!(entries[1].additional_feeds.is_empty());
    }

    #[test]
    fn test_discover_walks_up() {
        let temp = TempDir::new().unwrap();
        let config_dir = temp.path().join(MANIFEST_CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join(MANIFEST_FILE), r#"{"version":1,"tools":{}}"#).unwrap();

        let nested = temp.path().join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();

        let found = discover(&nested).unwrap();
        assert_eq!(found, config_dir.join(MANIFEST_FILE));
    }

    #[test]
    fn test_discover_not_found() {
        let temp = TempDir::new().unwrap();
        // A manifest above the temp dir would be picked up, so only check the kind
        if let Err(e) = discover(temp.path()) {
            assert!(matches!(e, ToolpackError::ManifestNotFound { .. }));
        }
    }
}
