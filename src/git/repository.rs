use crate::error::{ReleaseError, Result};
use crate::git::CommitInfo;
use git2::{Oid, Repository as Git2Repo};
use std::path::Path;
use std::sync::Mutex;

/// Wrapper around git2::Repository with our trait interface
pub struct Git2Repository {
    // git2::Repository is Send but not Sync
    repo: Mutex<Git2Repo>,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let repo = Git2Repo::discover(path)?;
        Ok(Self::from_git2(repo))
    }

    /// Create from existing git2::Repository
    pub fn from_git2(repo: Git2Repo) -> Self {
        Git2Repository {
            repo: Mutex::new(repo),
        }
    }

    fn with_repo<T>(&self, f: impl FnOnce(&Git2Repo) -> Result<T>) -> Result<T> {
        let repo = self
            .repo
            .lock()
            .map_err(|_| ReleaseError::Git(git2::Error::from_str("repository lock poisoned")))?;
        f(&repo)
    }
}

impl super::Repository for Git2Repository {
    fn head_oid(&self) -> Result<Oid> {
        self.with_repo(|repo| {
            let head = repo.head()?;
            let commit = head.peel_to_commit()?;
            Ok(commit.id())
        })
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        self.with_repo(|repo| {
            let tags = repo.tag_names(None)?;
            Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
        })
    }

    fn find_tag_oid(&self, tag_name: &str) -> Result<Option<Oid>> {
        self.with_repo(|repo| {
            let reference_name = format!("refs/tags/{}", tag_name);

            match repo.find_reference(&reference_name) {
                Ok(reference) => {
                    let oid = reference
                        .peel_to_commit()
                        .map_err(|e| ReleaseError::tag(format!("Cannot peel tag: {}", e)))?
                        .id();
                    Ok(Some(oid))
                }
                Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
                Err(e) => Err(ReleaseError::tag(format!(
                    "Cannot find tag '{}': {}",
                    tag_name, e
                ))),
            }
        })
    }

    fn commits_between(&self, from_oid: Option<Oid>, to_oid: Oid) -> Result<Vec<CommitInfo>> {
        self.with_repo(|repo| {
            let mut revwalk = repo.revwalk()?;
            revwalk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE)?;
            revwalk.push(to_oid)?;
            if let Some(from) = from_oid {
                revwalk.hide(from)?;
            }

            let mut commits = Vec::new();
            for oid_result in revwalk {
                let oid = oid_result?;
                let commit = repo.find_commit(oid)?;
                let message = commit.message().unwrap_or_default().to_string();
                commits.push(CommitInfo::new(oid, message));
            }
            Ok(commits)
        })
    }
}
