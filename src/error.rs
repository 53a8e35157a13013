use thiserror::Error;

/// Unified error type for release-kit operations
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error("No changelog section found for version {0}")]
    NotFound(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Changelog has no [Unreleased] section to promote")]
    MissingUnreleased,

    #[error("Changelog already has a section for version {0}")]
    DuplicateSection(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Tag error: {0}")]
    Tag(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in release-kit
pub type Result<T> = std::result::Result<T, ReleaseError>;

impl ReleaseError {
    /// Create a not-found error for a changelog version
    pub fn not_found(version: impl Into<String>) -> Self {
        ReleaseError::NotFound(version.into())
    }

    /// Create an invalid version error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        ReleaseError::InvalidVersion(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        ReleaseError::Manifest(msg.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        ReleaseError::Config(msg.into())
    }

    /// Create a tag error with context
    pub fn tag(msg: impl Into<String>) -> Self {
        ReleaseError::Tag(msg.into())
    }
}
