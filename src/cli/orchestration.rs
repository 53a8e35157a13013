//! Release workflow orchestration
//!
//! The binary only parses arguments and prints; the workflows here read the
//! changelog, manifest and git history, call into the domain, and hand back
//! a result. Workflow arguments are plain structs so the workflows can be
//! driven programmatically without clap.

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use tracing::{info, instrument, warn};

use crate::analyzer::{BumpDecision, VersionAnalyzer};
use crate::boundary::BoundaryWarning;
use crate::config::Config;
use crate::domain::changelog::{self, ChangelogDocument, Section};
use crate::domain::{TagPattern, Version};
use crate::error::ReleaseError;
use crate::git::{self, Git2Repository, ReleaseRange};
use crate::manifest;

/// Passed as the commits file to read messages from stdin
pub const STDIN_MARKER: &str = "-";

fn record(warnings: &mut Vec<BoundaryWarning>, warning: BoundaryWarning) {
    warn!(%warning, "release boundary");
    warnings.push(warning);
}

fn changelog_path(explicit: Option<&Path>, config: &Config) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| config.changelog.path.clone())
}

fn read_changelog(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Cannot read changelog '{}'", path.display()))
}

/// Accept `1.2.3`, a release tag such as `v1.2.3`, or a CI ref such as
/// `refs/tags/v1.2.3`.
pub fn parse_version_argument(arg: &str, pattern: &TagPattern) -> crate::Result<Version> {
    let arg = arg.trim();
    let tag = arg.strip_prefix("refs/tags/").unwrap_or(arg);

    match Version::parse(tag) {
        Ok(version) => Ok(version),
        Err(err) => pattern.parse_version(tag).ok_or(err),
    }
}

/// Split commit text into messages.
///
/// NUL-separated input (`git log --format=%B%x00`) keeps multi-line
/// messages and their footers together; otherwise every non-blank line is
/// one message.
pub fn split_commit_messages(text: &str) -> Vec<String> {
    if text.contains('\0') {
        text.split('\0')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    } else {
        text.lines()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Arguments for the release notes workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotesArgs {
    /// Version or release tag to extract
    pub version: String,
    pub changelog: Option<PathBuf>,
    /// Write the notes here instead of returning them for stdout
    pub output: Option<PathBuf>,
}

/// Result of the release notes workflow
#[derive(Debug, Clone, PartialEq)]
pub struct NotesOutcome {
    pub version: Version,
    pub notes: String,
    pub written_to: Option<PathBuf>,
    pub warnings: Vec<BoundaryWarning>,
}

/// Extract one version's section from the changelog.
#[instrument(skip(config))]
pub fn run_notes(args: &NotesArgs, config: &Config) -> Result<NotesOutcome> {
    let pattern = config.tags.tag_pattern()?;
    let version = parse_version_argument(&args.version, &pattern)?;
    let path = changelog_path(args.changelog.as_deref(), config);
    let text = read_changelog(&path)?;

    let mut warnings = Vec::new();
    let label = version.to_string();
    if ChangelogDocument::parse(&text)
        .duplicate_labels()
        .contains(&label)
    {
        record(
            &mut warnings,
            BoundaryWarning::DuplicateSection { version: label },
        );
    }

    let notes = changelog::extract(&text, &version)
        .with_context(|| format!("Cannot extract release notes from '{}'", path.display()))?;

    if let Some(output) = &args.output {
        let mut contents = notes.clone();
        contents.push('\n');
        fs::write(output, contents)
            .with_context(|| format!("Cannot write release notes to '{}'", output.display()))?;
        info!(%version, path = %output.display(), "release notes written");
    }

    Ok(NotesOutcome {
        version,
        notes,
        written_to: args.output.clone(),
        warnings,
    })
}

/// Arguments for the version bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct BumpArgs {
    /// Current version; falls back to the manifest, then the latest tag
    pub current: Option<String>,
    /// File of commit messages (`-` for stdin); defaults to git history
    pub commits: Option<PathBuf>,
    /// Repository used when git history is needed
    pub repo: PathBuf,
    /// Store the new version in the manifest
    pub write: bool,
    /// Skip the confirmation before writing
    pub yes: bool,
}

impl Default for BumpArgs {
    fn default() -> Self {
        BumpArgs {
            current: None,
            commits: None,
            repo: PathBuf::from("."),
            write: false,
            yes: false,
        }
    }
}

/// Result of the version bump workflow
#[derive(Debug, Clone, PartialEq)]
pub struct BumpOutcome {
    pub decision: BumpDecision,
    pub commit_messages: Vec<String>,
    /// Tag the commits were collected from, when git was used
    pub since_tag: Option<String>,
    pub manifest_written: bool,
    pub warnings: Vec<BoundaryWarning>,
}

fn read_commit_source(path: &Path) -> Result<String> {
    if path == Path::new(STDIN_MARKER) {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Cannot read commit messages from stdin")?;
        Ok(text)
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Cannot read commit messages from '{}'", path.display()))
    }
}

fn load_release_range(
    repo_path: &Path,
    pattern: &TagPattern,
    warnings: &mut Vec<BoundaryWarning>,
) -> Result<ReleaseRange> {
    let repo = Git2Repository::open(repo_path)
        .with_context(|| format!("Cannot open git repository at '{}'", repo_path.display()))?;
    let range = git::release_range(&repo, pattern)?;

    for tag in &range.unparsable_tags {
        record(
            warnings,
            BoundaryWarning::UnparsableTag {
                tag: tag.clone(),
                reason: "version is not MAJOR.MINOR.PATCH".to_string(),
            },
        );
    }
    match &range.latest_tag {
        None => record(
            warnings,
            BoundaryWarning::NoReleaseTag {
                pattern: pattern.pattern.clone(),
            },
        ),
        Some(tag) if range.commits.is_empty() => record(
            warnings,
            BoundaryWarning::NoNewCommits {
                latest_tag: tag.name.clone(),
                current_commit_hash: range.head.to_string(),
            },
        ),
        Some(_) => {}
    }

    Ok(range)
}

/// Compute the next version and optionally store it in the manifest.
///
/// `confirm` is asked before the manifest is rewritten unless `args.yes`.
#[instrument(skip(config, confirm))]
pub fn run_bump<F>(args: &BumpArgs, config: &Config, mut confirm: F) -> Result<BumpOutcome>
where
    F: FnMut(&str) -> Result<bool>,
{
    let pattern = config.tags.tag_pattern()?;
    let manifest_path = &config.manifest.path;
    let mut warnings = Vec::new();

    let needs_git =
        args.commits.is_none() || (args.current.is_none() && !manifest_path.exists());
    let range = if needs_git {
        Some(load_release_range(&args.repo, &pattern, &mut warnings)?)
    } else {
        None
    };
    let tag_version = range
        .as_ref()
        .and_then(|r| r.latest_tag.as_ref())
        .map(|t| t.version);

    let commit_messages = match &args.commits {
        Some(path) => split_commit_messages(&read_commit_source(path)?),
        None => range.as_ref().map(ReleaseRange::messages).unwrap_or_default(),
    };

    let current = if let Some(current) = &args.current {
        Version::parse(current.trim())?
    } else if manifest_path.exists() {
        let from_manifest = manifest::load_version(manifest_path)?;
        if let Some(tag) = tag_version.filter(|tag| *tag != from_manifest) {
            record(
                &mut warnings,
                BoundaryWarning::VersionMismatch {
                    manifest: from_manifest,
                    tag,
                },
            );
        }
        from_manifest
    } else if let Some(tag) = tag_version {
        tag
    } else {
        bail!(
            "Cannot determine the current version: pass --current, add '{}', or tag a release",
            manifest_path.display()
        );
    };

    let analyzer = VersionAnalyzer::new(config.commits.clone());
    let decision = analyzer.next_version(&current, &commit_messages)?;

    let mut manifest_written = false;
    if args.write {
        if let Some(next) = decision.next {
            if !manifest_path.exists() {
                return Err(anyhow!(ReleaseError::manifest(format!(
                    "cannot write version: '{}' does not exist",
                    manifest_path.display()
                ))));
            }
            let prompt = format!("Set version {} in {}?", next, manifest_path.display());
            if args.yes || confirm(&prompt)? {
                manifest::write_version(manifest_path, &next)?;
                manifest_written = true;
            }
        }
    }

    Ok(BumpOutcome {
        decision,
        commit_messages,
        since_tag: range.and_then(|r| r.latest_tag).map(|t| t.name),
        manifest_written,
        warnings,
    })
}

/// Arguments for the changelog promotion workflow
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PromoteArgs {
    pub version: String,
    /// `YYYY-MM-DD`; defaults to today
    pub date: Option<String>,
    pub changelog: Option<PathBuf>,
}

/// Turn the Unreleased notes into a dated section for `args.version`.
#[instrument(skip(config))]
pub fn run_promote(args: &PromoteArgs, config: &Config) -> Result<PathBuf> {
    let pattern = config.tags.tag_pattern()?;
    let version = parse_version_argument(&args.version, &pattern)?;

    let date = match &args.date {
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .with_context(|| format!("Invalid release date '{}', expected YYYY-MM-DD", date))?,
        None => chrono::Local::now().date_naive(),
    };

    let path = changelog_path(args.changelog.as_deref(), config);
    let text = read_changelog(&path)?;
    let stamp = date.format("%Y-%m-%d").to_string();
    let promoted = changelog::promote_unreleased(&text, &version, &stamp)?;
    fs::write(&path, promoted)
        .with_context(|| format!("Cannot write changelog '{}'", path.display()))?;

    info!(%version, %date, path = %path.display(), "changelog promoted");
    Ok(path)
}

/// Sections of the changelog plus warnings about duplicates
#[derive(Debug, Clone, PartialEq)]
pub struct SectionsOutcome {
    pub sections: Vec<Section>,
    pub warnings: Vec<BoundaryWarning>,
}

/// List the bracketed sections of the changelog.
#[instrument(skip(config))]
pub fn run_sections(changelog: Option<&Path>, config: &Config) -> Result<SectionsOutcome> {
    let path = changelog_path(changelog, config);
    let document = ChangelogDocument::parse(&read_changelog(&path)?);

    let mut warnings = Vec::new();
    for version in document.duplicate_labels() {
        record(&mut warnings, BoundaryWarning::DuplicateSection { version });
    }

    Ok(SectionsOutcome {
        sections: document.sections().to_vec(),
        warnings,
    })
}
