use crate::domain::TagPattern;
use crate::error::{ReleaseError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "releasekit.toml";

/// Represents the complete configuration for release-kit.
///
/// Contains changelog location, commit classification rules, tag naming and
/// the build manifest holding the package version.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub commits: ConventionalCommitsConfig,

    #[serde(default)]
    pub tags: TagsConfig,

    #[serde(default)]
    pub manifest: ManifestConfig,
}

fn default_changelog_path() -> PathBuf {
    PathBuf::from("CHANGELOG.md")
}

/// Where the changelog lives.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_changelog_path")]
    pub path: PathBuf,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: default_changelog_path(),
        }
    }
}

/// Returns the default list of breaking change indicators.
fn default_breaking_change_indicators() -> Vec<String> {
    vec![
        "BREAKING CHANGE:".to_string(),
        "BREAKING-CHANGE:".to_string(),
    ]
}

/// Returns the commit types that trigger minor version bumps.
fn default_minor_types() -> Vec<String> {
    vec!["feat".to_string()]
}

/// Returns the commit types that trigger patch version bumps.
fn default_patch_types() -> Vec<String> {
    vec!["fix".to_string()]
}

/// Configuration for conventional commit analysis.
///
/// Breaking changes always bump major; otherwise the commit type decides.
/// Types listed in neither list do not bump.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ConventionalCommitsConfig {
    #[serde(default = "default_breaking_change_indicators")]
    pub breaking_change_indicators: Vec<String>,

    #[serde(default = "default_minor_types")]
    pub minor_types: Vec<String>,

    #[serde(default = "default_patch_types")]
    pub patch_types: Vec<String>,
}

impl Default for ConventionalCommitsConfig {
    fn default() -> Self {
        ConventionalCommitsConfig {
            breaking_change_indicators: default_breaking_change_indicators(),
            minor_types: default_minor_types(),
            patch_types: default_patch_types(),
        }
    }
}

fn default_tag_pattern() -> String {
    "v{version}".to_string()
}

/// Release tag naming.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct TagsConfig {
    #[serde(default = "default_tag_pattern")]
    pub pattern: String,
}

impl Default for TagsConfig {
    fn default() -> Self {
        TagsConfig {
            pattern: default_tag_pattern(),
        }
    }
}

impl TagsConfig {
    /// Compile the configured pattern
    pub fn tag_pattern(&self) -> Result<TagPattern> {
        TagPattern::new(self.pattern.as_str())
    }
}

fn default_manifest_path() -> PathBuf {
    PathBuf::from("pyproject.toml")
}

/// Build manifest carrying the package version.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ManifestConfig {
    #[serde(default = "default_manifest_path")]
    pub path: PathBuf,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        ManifestConfig {
            path: default_manifest_path(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releasekit.toml` in current directory
/// 3. `~/.config/.releasekit.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&Path>) -> Result<Config> {
    let local = Path::new(".").join(CONFIG_FILE_NAME);

    let path = if let Some(path) = config_path {
        path.to_path_buf()
    } else if local.exists() {
        local
    } else if let Some(config_dir) = dirs::config_dir() {
        let user_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if user_path.exists() {
            user_path
        } else {
            debug!("no config file found, using defaults");
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config_str = fs::read_to_string(&path).map_err(|e| {
        ReleaseError::config(format!("Cannot read '{}': {}", path.display(), e))
    })?;
    let config = parse_config(&config_str)
        .map_err(|e| ReleaseError::config(format!("'{}': {}", path.display(), e)))?;

    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Parse configuration text and validate the tag pattern
pub fn parse_config(text: &str) -> Result<Config> {
    let config: Config =
        toml::from_str(text).map_err(|e| ReleaseError::config(e.to_string()))?;
    config.tags.tag_pattern()?;
    Ok(config)
}
