use std::fs;
use std::path::{Path, PathBuf};

use release_kit::boundary::BoundaryWarning;
use release_kit::cli::orchestration::{
    run_bump, run_notes, run_promote, run_sections, BumpArgs, NotesArgs, PromoteArgs,
};
use release_kit::config::Config;
use release_kit::{extract, ReleaseError, Version, VersionBump};
use tempfile::TempDir;

const FIXTURE_CHANGELOG: &str = include_str!("fixtures/CHANGELOG.md");

const PYPROJECT: &str = r#"[project]
name = "demo"
version = "0.2.5"
requires-python = ">=3.9"
"#;

/// Temp project with a changelog, a manifest and a config pointing at both
fn project() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("CHANGELOG.md"), FIXTURE_CHANGELOG).unwrap();
    fs::write(dir.path().join("pyproject.toml"), PYPROJECT).unwrap();

    let mut config = Config::default();
    config.changelog.path = dir.path().join("CHANGELOG.md");
    config.manifest.path = dir.path().join("pyproject.toml");
    (dir, config)
}

fn write_commits(dir: &Path, text: &str) -> PathBuf {
    let path = dir.join("commits.txt");
    fs::write(&path, text).unwrap();
    path
}

fn never_confirm(_: &str) -> anyhow::Result<bool> {
    panic!("confirmation should not be requested");
}

// ============================================================================
// notes
// ============================================================================

#[test]
fn test_notes_returns_section() {
    let (_dir, config) = project();
    let outcome = run_notes(
        &NotesArgs {
            version: "0.2.4".to_string(),
            ..NotesArgs::default()
        },
        &config,
    )
    .unwrap();

    assert_eq!(outcome.version, Version::new(0, 2, 4));
    assert_eq!(
        outcome.notes,
        "### Added\n- Command line entry point\n\n### Changed\n- Require Python 3.9 or newer"
    );
    assert!(outcome.written_to.is_none());
    assert!(outcome.warnings.is_empty());
}

#[test]
fn test_notes_accepts_tag_ref() {
    let (_dir, config) = project();
    let outcome = run_notes(
        &NotesArgs {
            version: "refs/tags/v0.2.5".to_string(),
            ..NotesArgs::default()
        },
        &config,
    )
    .unwrap();
    assert_eq!(outcome.notes, "### Fixed\n- Wheel metadata for Python 3.13");
}

#[test]
fn test_notes_empty_section() {
    let (_dir, config) = project();
    let outcome = run_notes(
        &NotesArgs {
            version: "0.2.3".to_string(),
            ..NotesArgs::default()
        },
        &config,
    )
    .unwrap();
    assert_eq!(outcome.notes, "");
}

#[test]
fn test_notes_written_to_file() {
    let (dir, config) = project();
    let output = dir.path().join("notes.md");
    let outcome = run_notes(
        &NotesArgs {
            version: "0.1.0".to_string(),
            output: Some(output.clone()),
            ..NotesArgs::default()
        },
        &config,
    )
    .unwrap();

    assert_eq!(outcome.written_to, Some(output.clone()));
    assert_eq!(fs::read_to_string(output).unwrap(), "- Initial release\n");
}

#[test]
fn test_notes_missing_version_is_not_found() {
    let (_dir, config) = project();
    let err = run_notes(
        &NotesArgs {
            version: "9.9.9".to_string(),
            ..NotesArgs::default()
        },
        &config,
    )
    .unwrap_err();

    let release_err = err.downcast_ref::<ReleaseError>().unwrap();
    assert!(matches!(release_err, ReleaseError::NotFound(v) if v == "9.9.9"));
}

#[test]
fn test_notes_invalid_version_argument() {
    let (_dir, config) = project();
    let err = run_notes(
        &NotesArgs {
            version: "0.2".to_string(),
            ..NotesArgs::default()
        },
        &config,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReleaseError>(),
        Some(ReleaseError::InvalidVersion(_))
    ));
}

#[test]
fn test_notes_warns_about_duplicates() {
    let (dir, mut config) = project();
    let path = dir.path().join("DUPES.md");
    fs::write(
        &path,
        "## [1.0.0] - 2026-02-01\n- newer\n\n## [1.0.0] - 2026-01-01\n- older\n",
    )
    .unwrap();
    config.changelog.path = path;

    let outcome = run_notes(
        &NotesArgs {
            version: "1.0.0".to_string(),
            ..NotesArgs::default()
        },
        &config,
    )
    .unwrap();
    assert_eq!(outcome.notes, "- newer");
    assert_eq!(
        outcome.warnings,
        vec![BoundaryWarning::DuplicateSection {
            version: "1.0.0".to_string()
        }]
    );
}

// ============================================================================
// bump
// ============================================================================

#[test]
fn test_bump_from_commits_file_and_manifest() {
    let (dir, config) = project();
    let commits = write_commits(dir.path(), "feat: add cli\nfix: typo\ndocs: readme\n");

    let outcome = run_bump(
        &BumpArgs {
            commits: Some(commits),
            ..BumpArgs::default()
        },
        &config,
        never_confirm,
    )
    .unwrap();

    assert_eq!(outcome.decision.current, Version::new(0, 2, 5));
    assert_eq!(outcome.decision.bump, VersionBump::Minor);
    assert_eq!(outcome.decision.next, Some(Version::new(0, 3, 0)));
    assert_eq!(outcome.commit_messages.len(), 3);
    assert!(outcome.since_tag.is_none());
    assert!(!outcome.manifest_written);
}

#[test]
fn test_bump_explicit_current_wins() {
    let (dir, config) = project();
    let commits = write_commits(dir.path(), "fix: a\n");

    let outcome = run_bump(
        &BumpArgs {
            current: Some("1.4.9".to_string()),
            commits: Some(commits),
            ..BumpArgs::default()
        },
        &config,
        never_confirm,
    )
    .unwrap();
    assert_eq!(outcome.decision.next, Some(Version::new(1, 4, 10)));
}

#[test]
fn test_bump_invalid_current() {
    let (dir, config) = project();
    let commits = write_commits(dir.path(), "fix: a\n");

    let err = run_bump(
        &BumpArgs {
            current: Some("1.4".to_string()),
            commits: Some(commits),
            ..BumpArgs::default()
        },
        &config,
        never_confirm,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReleaseError>(),
        Some(ReleaseError::InvalidVersion(_))
    ));
}

#[test]
fn test_bump_overflowing_current_is_an_error() {
    let (dir, config) = project();
    let commits = write_commits(dir.path(), "feat!: drop legacy api\n");

    let err = run_bump(
        &BumpArgs {
            current: Some(format!("{}.0.0", u64::MAX)),
            commits: Some(commits),
            write: true,
            yes: true,
            ..BumpArgs::default()
        },
        &config,
        never_confirm,
    )
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ReleaseError>(),
        Some(ReleaseError::InvalidVersion(_))
    ));
    assert_eq!(
        fs::read_to_string(&config.manifest.path).unwrap(),
        PYPROJECT
    );
}

#[test]
fn test_bump_none_required() {
    let (dir, config) = project();
    let commits = write_commits(dir.path(), "chore: cleanup\n");

    let outcome = run_bump(
        &BumpArgs {
            commits: Some(commits),
            write: true,
            ..BumpArgs::default()
        },
        &config,
        never_confirm,
    )
    .unwrap();

    assert_eq!(outcome.decision.bump, VersionBump::None);
    assert_eq!(outcome.decision.next, None);
    assert!(!outcome.manifest_written);
    assert_eq!(
        fs::read_to_string(&config.manifest.path).unwrap(),
        PYPROJECT
    );
}

#[test]
fn test_bump_multiline_breaking_footer() {
    let (dir, config) = project();
    let commits = write_commits(
        dir.path(),
        "refactor: new storage\n\nBREAKING CHANGE: data dir moved\0fix: a\0",
    );

    let outcome = run_bump(
        &BumpArgs {
            commits: Some(commits),
            ..BumpArgs::default()
        },
        &config,
        never_confirm,
    )
    .unwrap();
    assert_eq!(outcome.decision.next, Some(Version::new(1, 0, 0)));
}

#[test]
fn test_bump_write_with_yes() {
    let (dir, config) = project();
    let commits = write_commits(dir.path(), "fix: a\n");

    let outcome = run_bump(
        &BumpArgs {
            commits: Some(commits),
            write: true,
            yes: true,
            ..BumpArgs::default()
        },
        &config,
        never_confirm,
    )
    .unwrap();

    assert!(outcome.manifest_written);
    assert_eq!(
        fs::read_to_string(&config.manifest.path).unwrap(),
        PYPROJECT.replace("0.2.5", "0.2.6")
    );
}

#[test]
fn test_bump_write_declined() {
    let (dir, config) = project();
    let commits = write_commits(dir.path(), "feat: a\n");
    let mut prompts = Vec::new();

    let outcome = run_bump(
        &BumpArgs {
            commits: Some(commits),
            write: true,
            ..BumpArgs::default()
        },
        &config,
        |prompt: &str| {
            prompts.push(prompt.to_string());
            Ok(false)
        },
    )
    .unwrap();

    assert!(!outcome.manifest_written);
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].starts_with("Set version 0.3.0 in "));
    assert_eq!(
        fs::read_to_string(&config.manifest.path).unwrap(),
        PYPROJECT
    );
}

#[test]
fn test_bump_respects_configured_types() {
    let (dir, mut config) = project();
    config.commits.patch_types = vec!["fix".to_string(), "perf".to_string()];
    let commits = write_commits(dir.path(), "perf: faster import\n");

    let outcome = run_bump(
        &BumpArgs {
            commits: Some(commits),
            ..BumpArgs::default()
        },
        &config,
        never_confirm,
    )
    .unwrap();
    assert_eq!(outcome.decision.bump, VersionBump::Patch);
}

// ============================================================================
// promote / sections
// ============================================================================

#[test]
fn test_promote_then_extract() {
    let (_dir, config) = project();
    let path = run_promote(
        &PromoteArgs {
            version: "v0.3.0".to_string(),
            date: Some("2026-10-17".to_string()),
            changelog: None,
        },
        &config,
    )
    .unwrap();
    assert_eq!(path, config.changelog.path);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("## [Unreleased]\n\n## [0.3.0] - 2026-10-17\n"));
    assert_eq!(
        extract(&text, &Version::new(0, 3, 0)).unwrap(),
        "### Added\n- Trusted publishing workflow"
    );
}

#[test]
fn test_promote_rejects_bad_date() {
    let (_dir, config) = project();
    let err = run_promote(
        &PromoteArgs {
            version: "0.3.0".to_string(),
            date: Some("17/10/2026".to_string()),
            changelog: None,
        },
        &config,
    )
    .unwrap_err();
    assert!(err.to_string().contains("Invalid release date"));
    assert_eq!(
        fs::read_to_string(&config.changelog.path).unwrap(),
        FIXTURE_CHANGELOG
    );
}

#[test]
fn test_promote_existing_version() {
    let (_dir, config) = project();
    let err = run_promote(
        &PromoteArgs {
            version: "0.2.5".to_string(),
            date: None,
            changelog: None,
        },
        &config,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ReleaseError>(),
        Some(ReleaseError::DuplicateSection(_))
    ));
}

#[test]
fn test_sections_lists_labels() {
    let (_dir, config) = project();
    let outcome = run_sections(None, &config).unwrap();

    let labels: Vec<&str> = outcome
        .sections
        .iter()
        .map(|s| s.header.label.as_str())
        .collect();
    assert_eq!(
        labels,
        vec!["Unreleased", "0.2.5", "0.2.4", "0.2.3", "0.1.0"]
    );
    assert!(outcome.warnings.is_empty());
}
