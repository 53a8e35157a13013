use crate::config::ConventionalCommitsConfig;
use crate::domain::commit;
use crate::domain::{Version, VersionBump};
use crate::error::Result;
use crate::git::Repository;
use git2::Oid;
use tracing::{debug, info};

/// Outcome of analysing a batch of commits against the current version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BumpDecision {
    pub current: Version,
    pub bump: VersionBump,
    /// `None` when no commit warrants a release
    pub next: Option<Version>,
}

impl BumpDecision {
    fn new(current: Version, bump: VersionBump) -> Result<Self> {
        let next = match bump {
            VersionBump::None => None,
            bump => Some(current.bump(&bump)?),
        };
        Ok(BumpDecision {
            current,
            bump,
            next,
        })
    }

    /// Whether any commit calls for a new version
    pub fn is_required(&self) -> bool {
        self.next.is_some()
    }
}

/// Analyzes commits to determine version bump type
#[derive(Debug, Clone, Default)]
pub struct VersionAnalyzer {
    config: ConventionalCommitsConfig,
}

impl VersionAnalyzer {
    /// Create a new version analyzer
    pub fn new(config: ConventionalCommitsConfig) -> Self {
        VersionAnalyzer { config }
    }

    /// Classify one commit message
    pub fn classify(&self, message: &str) -> VersionBump {
        commit::classify(message, &self.config)
    }

    /// Analyze commit messages and determine version bump.
    ///
    /// The most severe classification wins; order does not matter and an
    /// empty batch is `VersionBump::None`.
    pub fn analyze_messages<S: AsRef<str>>(&self, messages: &[S]) -> VersionBump {
        let mut bump = VersionBump::None;

        for message in messages {
            let message = message.as_ref();
            let classified = self.classify(message);
            debug!(
                bump = %classified,
                subject = message.lines().next().unwrap_or_default(),
                "classified commit"
            );

            bump = bump.max(classified);
            if bump == VersionBump::Major {
                break;
            }
        }

        bump
    }

    /// Work out the version that should follow `current`.
    ///
    /// Fails when the required bump would overflow a version component.
    pub fn next_version<S: AsRef<str>>(
        &self,
        current: &Version,
        messages: &[S],
    ) -> Result<BumpDecision> {
        let decision = BumpDecision::new(*current, self.analyze_messages(messages))?;
        info!(
            current = %decision.current,
            bump = %decision.bump,
            commit_count = messages.len(),
            "bump decision"
        );
        Ok(decision)
    }

    /// Analyze commits from a repository between two OIDs to determine version bump
    pub fn analyze_repository_range<R: Repository>(
        &self,
        repo: &R,
        from_oid: Option<Oid>,
        to_oid: Oid,
    ) -> Result<VersionBump> {
        let commits = repo.commits_between(from_oid, to_oid)?;
        let messages: Vec<String> = commits.into_iter().map(|c| c.message).collect();
        Ok(self.analyze_messages(&messages))
    }
}

/// Parse `current` and compute the next version under the default rules.
///
/// Fails with [`crate::ReleaseError::InvalidVersion`] when `current` is not a
/// canonical `MAJOR.MINOR.PATCH` string, or when the bump would overflow.
pub fn next_version<S: AsRef<str>>(current: &str, messages: &[S]) -> Result<BumpDecision> {
    let current = Version::parse(current)?;
    VersionAnalyzer::default().next_version(&current, messages)
}
