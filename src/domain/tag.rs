use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use regex::Regex;

const PLACEHOLDER: &str = "{version}";

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pub pattern: String,
    matcher: Regex,
}

impl TagPattern {
    /// Create a new tag pattern. The pattern must contain `{version}` once.
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if pattern.matches(PLACEHOLDER).count() != 1 {
            return Err(ReleaseError::tag(format!(
                "Pattern '{}' must contain the {} placeholder exactly once",
                pattern, PLACEHOLDER
            )));
        }

        // Escape everything, then swap the placeholder for a version capture
        let escaped = regex::escape(&pattern);
        let regex_pattern = escaped.replace(r"\{version\}", r"(?P<version>[^/]+)");
        let matcher = Regex::new(&format!("^{}$", regex_pattern))
            .map_err(|e| ReleaseError::tag(format!("Invalid pattern '{}': {}", pattern, e)))?;

        Ok(TagPattern { pattern, matcher })
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version=1.2.3 -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.pattern.replace(PLACEHOLDER, &version.to_string())
    }

    /// Whether `tag` has this pattern's shape, parsable version or not
    pub fn matches(&self, tag: &str) -> bool {
        self.matcher.is_match(tag)
    }

    /// The text standing in for `{version}` in a matching tag
    pub fn version_part<'t>(&self, tag: &'t str) -> Option<&'t str> {
        self.matcher
            .captures(tag)
            .and_then(|caps| caps.name("version"))
            .map(|m| m.as_str())
    }

    /// Extract the version from a matching tag
    pub fn parse_version(&self, tag: &str) -> Option<Version> {
        self.version_part(tag)
            .and_then(|part| Version::parse(part).ok())
    }
}

impl Default for TagPattern {
    fn default() -> Self {
        TagPattern {
            pattern: "v{version}".to_string(),
            matcher: Regex::new(r"^v(?P<version>[^/]+)$").expect("Invalid regex"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_format() {
        let pattern = TagPattern::new("v{version}").unwrap();
        assert_eq!(pattern.format(&Version::new(1, 2, 3)), "v1.2.3");
    }

    #[test]
    fn test_pattern_format_with_suffix() {
        let pattern = TagPattern::new("release-{version}").unwrap();
        assert_eq!(pattern.format(&Version::new(1, 2, 3)), "release-1.2.3");
    }

    #[test]
    fn test_pattern_matches() {
        let pattern = TagPattern::new("v{version}").unwrap();
        assert!(pattern.matches("v1.2.3"));
        assert!(pattern.matches("vnext"));
        assert!(!pattern.matches("release-1.2.3"));
    }

    #[test]
    fn test_pattern_parse_version() {
        let pattern = TagPattern::new("pkg-v{version}").unwrap();
        assert_eq!(
            pattern.parse_version("pkg-v0.4.1"),
            Some(Version::new(0, 4, 1))
        );
        assert_eq!(pattern.parse_version("pkg-v0.4"), None);
        assert_eq!(pattern.parse_version("v0.4.1"), None);
    }

    #[test]
    fn test_pattern_escapes_regex_characters() {
        let pattern = TagPattern::new("rel.{version}+build").unwrap();
        assert!(pattern.matches("rel.1.0.0+build"));
        assert!(!pattern.matches("relX1.0.0+build"));
    }

    #[test]
    fn test_pattern_requires_placeholder() {
        assert!(TagPattern::new("latest").is_err());
        assert!(TagPattern::new("{version}-{version}").is_err());
    }

    #[test]
    fn test_default_pattern() {
        let pattern = TagPattern::default();
        assert_eq!(pattern.pattern, "v{version}");
        assert_eq!(pattern.parse_version("v2.0.0"), Some(Version::new(2, 0, 0)));
    }
}
