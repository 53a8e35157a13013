use crate::error::{ReleaseError, Result};
use std::fmt;
use std::str::FromStr;

/// Semantic version representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Parse a canonical `MAJOR.MINOR.PATCH` string.
    ///
    /// Each component must be plain decimal digits without leading zeros
    /// (a bare `0` is fine). Prefixes such as `v` are not accepted here;
    /// tags go through [`crate::domain::TagPattern::parse_version`].
    pub fn parse(text: &str) -> Result<Self> {
        let parts: Vec<&str> = text.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseError::invalid_version(format!(
                "'{}' - expected MAJOR.MINOR.PATCH",
                text
            )));
        }

        let major = parse_component(text, "major", parts[0])?;
        let minor = parse_component(text, "minor", parts[1])?;
        let patch = parse_component(text, "patch", parts[2])?;

        Ok(Version {
            major,
            minor,
            patch,
        })
    }

    /// Bump version according to bump type.
    ///
    /// Fails when the bumped component would exceed `u64::MAX`.
    pub fn bump(&self, bump_type: &VersionBump) -> Result<Self> {
        let bumped = match bump_type {
            VersionBump::Major => Version {
                major: increment(self, "major", self.major)?,
                minor: 0,
                patch: 0,
            },
            VersionBump::Minor => Version {
                major: self.major,
                minor: increment(self, "minor", self.minor)?,
                patch: 0,
            },
            VersionBump::Patch => Version {
                major: self.major,
                minor: self.minor,
                patch: increment(self, "patch", self.patch)?,
            },
            VersionBump::None => *self,
        };
        Ok(bumped)
    }
}

fn increment(version: &Version, name: &str, value: u64) -> Result<u64> {
    value.checked_add(1).ok_or_else(|| {
        ReleaseError::invalid_version(format!(
            "'{}' - {} component overflows when bumped",
            version, name
        ))
    })
}

fn parse_component(text: &str, name: &str, part: &str) -> Result<u64> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ReleaseError::invalid_version(format!(
            "'{}' - {} component '{}' is not a non-negative integer",
            text, name, part
        )));
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(ReleaseError::invalid_version(format!(
            "'{}' - {} component '{}' has a leading zero",
            text, name, part
        )));
    }
    part.parse::<u64>().map_err(|_| {
        ReleaseError::invalid_version(format!(
            "'{}' - {} component '{}' is out of range",
            text, name, part
        ))
    })
}

impl FromStr for Version {
    type Err = ReleaseError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version bump type decision.
///
/// Variants are declared in ascending severity so `Ord` picks the winner
/// when several commits disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum VersionBump {
    #[default]
    None,
    Patch,
    Minor,
    Major,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VersionBump::None => "none",
            VersionBump::Patch => "patch",
            VersionBump::Minor => "minor",
            VersionBump::Major => "major",
        };
        f.write_str(name)
    }
}
