use crate::error::{ReleaseError, Result};
use crate::git::{CommitInfo, Repository};
use git2::Oid;
use std::collections::BTreeMap;

/// Mock repository for testing without actual git operations.
///
/// History is linear: commits are kept in insertion order, oldest first,
/// and the last one added is HEAD.
pub struct MockRepository {
    commits: Vec<(Oid, CommitInfo)>,
    tags: BTreeMap<String, Oid>,
}

impl MockRepository {
    /// Create a new empty mock repository
    pub fn new() -> Self {
        MockRepository {
            commits: Vec::new(),
            tags: BTreeMap::new(),
        }
    }

    /// Append a commit to the mock history
    pub fn add_commit(&mut self, oid: Oid, info: CommitInfo) {
        self.commits.push((oid, info));
    }

    /// Add a tag pointing to an OID
    pub fn add_tag(&mut self, name: impl Into<String>, oid: Oid) {
        self.tags.insert(name.into(), oid);
    }

    fn position(&self, oid: Oid) -> Result<usize> {
        self.commits
            .iter()
            .position(|(id, _)| *id == oid)
            .ok_or_else(|| ReleaseError::Git(git2::Error::from_str("commit not found")))
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl Repository for MockRepository {
    fn head_oid(&self) -> Result<Oid> {
        self.commits
            .last()
            .map(|(oid, _)| *oid)
            .ok_or_else(|| ReleaseError::Git(git2::Error::from_str("repository has no commits")))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.tags.keys().cloned().collect())
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        Ok(self.tags.get(tag_name).copied())
    }

    fn commits_between(&self, from_oid: Option<Oid>, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        let end = self.position(to_oid)?;
        let start = match from_oid {
            Some(from) => self.position(from)? + 1,
            None => 0,
        };

        if start > end {
            return Ok(Vec::new());
        }
        Ok(self.commits[start..=end]
            .iter()
            .map(|(_, info)| info.clone())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn oid(n: u8) -> Oid {
        Oid::from_bytes(&[n; 20]).unwrap()
    }

    #[test]
    fn test_mock_head_is_last_commit() {
        let mut repo = MockRepository::new();
        assert!(repo.head_oid().is_err());

        repo.add_commit(oid(1), CommitInfo::new(oid(1), "a"));
        repo.add_commit(oid(2), CommitInfo::new(oid(2), "b"));
        assert_eq!(repo.head_oid().unwrap(), oid(2));
    }

    #[test]
    fn test_mock_commits_between() {
        let mut repo = MockRepository::new();
        for n in 1..=3 {
            repo.add_commit(oid(n), CommitInfo::new(oid(n), format!("commit {}", n)));
        }

        let commits = repo.commits_between(Some(oid(1)), oid(3)).unwrap();
        let messages: Vec<&str> = commits.iter().map(|c| c.message.as_str()).collect();
        assert_eq!(messages, vec!["commit 2", "commit 3"]);

        assert!(repo.commits_between(Some(oid(3)), oid(3)).unwrap().is_empty());
        assert_eq!(repo.commits_between(None, oid(3)).unwrap().len(), 3);
    }

    #[test]
    fn test_mock_tags() {
        let mut repo = MockRepository::new();
        repo.add_tag("v1.0.0", oid(1));
        assert_eq!(repo.find_tag_oid("v1.0.0").unwrap(), Some(oid(1)));
        assert_eq!(repo.find_tag_oid("v2.0.0").unwrap(), None);
        assert_eq!(repo.list_tags().unwrap(), vec!["v1.0.0".to_string()]);
    }
}
