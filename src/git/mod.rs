//! Git operations abstraction layer
//!
//! This module provides a trait-based abstraction over the read-only Git
//! operations release-kit needs: listing tags and walking the commits made
//! since the last release.
//!
//! - [repository::Git2Repository]: A real implementation using the `git2` crate
//! - [mock::MockRepository]: A mock implementation for testing
//!
//! ```rust
//! # use release_kit::git::{release_range, Repository};
//! # use release_kit::domain::TagPattern;
//! # fn example<R: Repository>(repo: &R) -> release_kit::Result<()> {
//! let range = release_range(repo, &TagPattern::default())?;
//! println!("{} commits since last release", range.commits.len());
//! # Ok(())
//! # }
//! ```

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{TagPattern, Version};
use crate::error::Result;
use git2::Oid;
use tracing::debug;

/// Commit information for analysis
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    /// The full commit hash
    pub hash: String,
    /// The full commit message, footers included
    pub message: String,
}

impl CommitInfo {
    pub fn new(oid: Oid, message: impl Into<String>) -> Self {
        CommitInfo {
            hash: oid.to_string(),
            message: message.into(),
        }
    }
}

/// Abbreviate a commit hash to its first seven characters
pub fn short_hash(hash: &str) -> &str {
    hash.get(..7).unwrap_or(hash)
}

/// Common git operation trait for abstraction
///
/// All implementors must be `Send + Sync`. Methods map underlying errors
/// (like `git2::Error`) to [crate::error::ReleaseError] variants.
pub trait Repository: Send + Sync {
    /// Get the OID of the commit HEAD points at
    fn head_oid(&self) -> Result<Oid>;

    /// Get all tag names in the repository
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Find a tag by name and return the commit it points to.
    ///
    /// Handles both lightweight and annotated tags.
    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>>;

    /// Get commits reachable from `to_oid` but not from `from_oid`,
    /// oldest first. `None` walks the whole history of `to_oid`.
    fn commits_between(&self, from_oid: Option<Oid>, to_oid: Oid) -> Result<Vec<CommitInfo>>;
}

/// The latest release tag and the commits made since
#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseRange {
    /// Highest-version tag matching the pattern
    pub latest_tag: Option<ReleaseTag>,
    /// Tags that look like release tags but carry no valid version
    pub unparsable_tags: Vec<String>,
    pub head: Oid,
    /// Commits after `latest_tag` up to HEAD, oldest first
    pub commits: Vec<CommitInfo>,
}

impl ReleaseRange {
    pub fn messages(&self) -> Vec<String> {
        self.commits.iter().map(|c| c.message.clone()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReleaseTag {
    pub name: String,
    pub version: Version,
    pub oid: Oid,
}

/// Locate the latest release tag and collect the commits since it.
///
/// Release tags are compared by version, not by date, so a back-ported
/// patch tag never hides a newer minor release.
pub fn release_range<R: Repository>(repo: &R, pattern: &TagPattern) -> Result<ReleaseRange> {
    let mut unparsable_tags = Vec::new();
    let mut latest: Option<(String, Version)> = None;

    for tag in repo.list_tags()? {
        if !pattern.matches(&tag) {
            continue;
        }
        match pattern.parse_version(&tag) {
            Some(version) => {
                if latest.as_ref().map_or(true, |(_, best)| version > *best) {
                    latest = Some((tag, version));
                }
            }
            None => unparsable_tags.push(tag),
        }
    }

    let latest_tag = match latest {
        Some((name, version)) => match repo.find_tag_oid(&name)? {
            Some(oid) => Some(ReleaseTag { name, version, oid }),
            None => None,
        },
        None => None,
    };

    let head = repo.head_oid()?;
    let commits = repo.commits_between(latest_tag.as_ref().map(|t| t.oid), head)?;

    debug!(
        latest_tag = latest_tag.as_ref().map(|t| t.name.as_str()),
        commit_count = commits.len(),
        "resolved release range"
    );

    Ok(ReleaseRange {
        latest_tag,
        unparsable_tags,
        head,
        commits,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(n: u8) -> Oid {
        Oid::from_bytes(&[n; 20]).unwrap()
    }

    fn sample_repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.add_commit(oid(1), CommitInfo::new(oid(1), "feat: initial"));
        repo.add_commit(oid(2), CommitInfo::new(oid(2), "fix: first bug"));
        repo.add_commit(oid(3), CommitInfo::new(oid(3), "feat: search"));
        repo.add_commit(oid(4), CommitInfo::new(oid(4), "docs: readme"));
        repo.add_tag("v0.1.0", oid(1));
        repo.add_tag("v0.1.1", oid(2));
        repo.add_tag("vnext", oid(3));
        repo.add_tag("nightly-2026", oid(4));
        repo
    }

    #[test]
    fn test_release_range_picks_highest_version() {
        let repo = sample_repo();
        let range = release_range(&repo, &TagPattern::default()).unwrap();

        let latest = range.latest_tag.clone().unwrap();
        assert_eq!(latest.name, "v0.1.1");
        assert_eq!(latest.version, Version::new(0, 1, 1));
        assert_eq!(range.head, oid(4));
        assert_eq!(range.messages(), vec!["feat: search", "docs: readme"]);
        assert_eq!(range.unparsable_tags, vec!["vnext".to_string()]);
    }

    #[test]
    fn test_release_range_without_tags() {
        let mut repo = MockRepository::new();
        repo.add_commit(oid(1), CommitInfo::new(oid(1), "feat: initial"));

        let range = release_range(&repo, &TagPattern::default()).unwrap();
        assert!(range.latest_tag.is_none());
        assert_eq!(range.commits.len(), 1);
    }

    #[test]
    fn test_release_range_custom_pattern() {
        let repo = sample_repo();
        let pattern = TagPattern::new("nightly-{version}").unwrap();
        let range = release_range(&repo, &pattern).unwrap();

        assert!(range.latest_tag.is_none());
        assert_eq!(range.unparsable_tags, vec!["nightly-2026".to_string()]);
        assert_eq!(range.commits.len(), 4);
    }

    #[test]
    fn test_short_hash() {
        let info = CommitInfo::new(oid(0xab), "chore: x");
        assert_eq!(short_hash(&info.hash), "abababa");
        assert_eq!(short_hash("abc"), "abc");
        assert_eq!(short_hash(""), "");
    }
}
