//! Package identity domain types
//!
//! `PackageId` keeps its on-disk casing but compares case-insensitively.
//! `PackageVersion` is either a concrete, normalized semantic version or the
//! floating placeholder that the restorer resolves to the latest version.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use semver::{BuildMetadata, Version};

use crate::error::{Result, ToolpackError};

/// Name of the staging folder inside the store root
pub const STAGING_DIR: &str = ".stage";

/// Identifier of a tool package
#[derive(Debug, Clone)]
pub struct PackageId(String);

impl PackageId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let trimmed = id.trim();
        let invalid = trimmed.is_empty()
            || trimmed != id
            || id == "."
            || id == ".."
            || id.eq_ignore_ascii_case(STAGING_DIR)
            || id.contains(['/', '\\'])
            || id.chars().any(char::is_control);

        if invalid {
            return Err(ToolpackError::InvalidPackageId { id });
        }

        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lower-cased form used for comparisons and hashing.
    pub fn lowercase(&self) -> String {
        self.0.to_lowercase()
    }
}

impl PartialEq for PackageId {
    fn eq(&self, other: &Self) -> bool {
        self.lowercase() == other.lowercase()
    }
}

impl Eq for PackageId {}

impl Hash for PackageId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lowercase().hash(state);
    }
}

impl PartialOrd for PackageId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PackageId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.lowercase().cmp(&other.lowercase())
    }
}

impl fmt::Display for PackageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PackageId {
    type Err = ToolpackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// Requested or resolved package version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PackageVersion {
    /// A concrete version, stored without build metadata
    Concrete(Version),
    /// Resolve to the latest available version during restore
    Floating,
}

impl PackageVersion {
    /// Parses a version string. `*`, `latest` and the empty string float.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed == "*" || trimmed.eq_ignore_ascii_case("latest") {
            return Ok(PackageVersion::Floating);
        }

        Ok(PackageVersion::Concrete(parse_concrete(trimmed)?))
    }

    pub fn concrete(input: &str) -> Result<Self> {
        match Self::parse(input)? {
            PackageVersion::Floating => Err(ToolpackError::InvalidVersion {
                version: input.to_string(),
            }),
            concrete => Ok(concrete),
        }
    }

    pub fn is_floating(&self) -> bool {
        matches!(self, PackageVersion::Floating)
    }

    pub fn as_version(&self) -> Option<&Version> {
        match self {
            PackageVersion::Concrete(v) => Some(v),
            PackageVersion::Floating => None,
        }
    }

    /// Normalized, lower-cased form used for directory names and cache rows.
    ///
    /// Floating versions normalize to `*`.
    pub fn normalized(&self) -> String {
        match self {
            PackageVersion::Concrete(v) => v.to_string().to_lowercase(),
            PackageVersion::Floating => "*".to_string(),
        }
    }
}

impl fmt::Display for PackageVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized())
    }
}

impl FromStr for PackageVersion {
    type Err = ToolpackError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Pads one- and two-part versions to three parts, folds a zero fourth part,
/// and strips build metadata.
fn parse_concrete(input: &str) -> Result<Version> {
    let invalid = || ToolpackError::InvalidVersion {
        version: input.to_string(),
    };

    let (core, suffix) = match input.find(['-', '+']) {
        Some(idx) => input.split_at(idx),
        None => (input, ""),
    };

    let mut parts: Vec<&str> = core.split('.').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(invalid());
    }
    match parts.len() {
        1 => parts.extend(["0", "0"]),
        2 => parts.push("0"),
        3 => {}
        4 if parts[3].parse::<u64>().ok() == Some(0) => {
            parts.truncate(3);
        }
        _ => return Err(invalid()),
    }

    let padded = format!("{}{}", parts.join("."), suffix).to_lowercase();
    let mut version = Version::parse(&padded).map_err(|_| invalid())?;
    version.build = BuildMetadata::EMPTY;
    Ok(version)
}
