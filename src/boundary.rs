use std::fmt;

use crate::domain::Version;
use crate::git::short_hash;

/// Non-fatal conditions met while preparing a release.
/// These are reported to the user but never stop the workflow.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryWarning {
    /// No new commits since the latest tag
    NoNewCommits {
        latest_tag: String,
        current_commit_hash: String,
    },
    /// Tag has the release pattern's shape but no valid version
    UnparsableTag { tag: String, reason: String },
    /// No tag matches the release pattern; the whole history is analysed
    NoReleaseTag { pattern: String },
    /// The changelog heads several sections with the same version
    DuplicateSection { version: String },
    /// Manifest and latest tag disagree about the current version
    VersionMismatch { manifest: Version, tag: Version },
}

impl fmt::Display for BoundaryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoundaryWarning::NoNewCommits {
                latest_tag,
                current_commit_hash,
            } => write!(
                f,
                "No new commits since tag '{}' (current: {})",
                latest_tag,
                short_hash(current_commit_hash)
            ),
            BoundaryWarning::UnparsableTag { tag, reason } => {
                write!(f, "Cannot parse tag '{}': {}", tag, reason)
            }
            BoundaryWarning::NoReleaseTag { pattern } => {
                write!(
                    f,
                    "No release tag matches '{}'; analysing the full history",
                    pattern
                )
            }
            BoundaryWarning::DuplicateSection { version } => {
                write!(
                    f,
                    "Changelog has more than one [{}] section; using the first",
                    version
                )
            }
            BoundaryWarning::VersionMismatch { manifest, tag } => {
                write!(
                    f,
                    "Manifest version {} differs from latest tag version {}",
                    manifest, tag
                )
            }
        }
    }
}
