use crate::config::ConventionalCommitsConfig;
use crate::domain::VersionBump;
use regex::Regex;
use std::sync::LazyLock;

/// `type(scope)!: description` on the first line of a commit message
static CONVENTIONAL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?P<type>[a-z]+)(?:\((?P<scope>[^)]+)\))?(?P<breaking>!)?:\s*(?P<description>.*)$")
        .expect("Invalid regex")
});

/// Parsed representation of a conventional commit message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommit {
    /// Commit type (`feat`, `fix`, ...); `None` for non-conventional messages
    pub r#type: Option<String>,
    pub scope: Option<String>,
    pub description: String,
    pub is_breaking_change: bool,
}

impl ParsedCommit {
    /// Parse a commit message using the default breaking-change indicators.
    ///
    /// Supports formats:
    /// - type(scope)!: description
    /// - type(scope): description
    /// - type!: description
    /// - type: description
    /// - non-conventional text
    pub fn parse(message: &str) -> Self {
        let defaults = ConventionalCommitsConfig::default();
        Self::parse_with(message, &defaults.breaking_change_indicators)
    }

    /// Parse a commit message, treating any of `indicators` found anywhere in
    /// the message (usually a footer) as a breaking change.
    pub fn parse_with<S: AsRef<str>>(message: &str, indicators: &[S]) -> Self {
        let has_indicator = indicators
            .iter()
            .any(|indicator| message.contains(indicator.as_ref()));

        let subject = message.trim_start().lines().next().unwrap_or_default();

        match CONVENTIONAL_REGEX.captures(subject) {
            Some(caps) => ParsedCommit {
                r#type: caps.name("type").map(|m| m.as_str().to_string()),
                scope: caps.name("scope").map(|m| m.as_str().to_string()),
                description: caps
                    .name("description")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default(),
                is_breaking_change: caps.name("breaking").is_some() || has_indicator,
            },
            // A breaking footer still counts without a recognised prefix
            None => ParsedCommit {
                r#type: None,
                scope: None,
                description: subject.to_string(),
                is_breaking_change: has_indicator,
            },
        }
    }

    /// Whether the message followed the conventional commit format
    pub fn is_conventional(&self) -> bool {
        self.r#type.is_some()
    }

    /// Classify this commit. Breaking changes win over the type.
    pub fn bump(&self, rules: &ConventionalCommitsConfig) -> VersionBump {
        if self.is_breaking_change {
            return VersionBump::Major;
        }

        match self.r#type.as_deref() {
            Some(t) if rules.minor_types.iter().any(|m| m == t) => VersionBump::Minor,
            Some(t) if rules.patch_types.iter().any(|p| p == t) => VersionBump::Patch,
            _ => VersionBump::None,
        }
    }
}

/// Classify a single commit message under `rules`.
pub fn classify(message: &str, rules: &ConventionalCommitsConfig) -> VersionBump {
    ParsedCommit::parse_with(message, &rules.breaking_change_indicators).bump(rules)
}
