//! Release helpers for tag-driven package publishing.
//!
//! Two pure functions form the core:
//! - [`extract`] pulls one version's section out of a Keep-a-Changelog file.
//! - [`next_version`] derives the next semantic version from conventional
//!   commit messages.
//!
//! ```
//! let changelog = "## [1.2.3] - 2026-01-04\nAdded:\n- X\n\n## [1.2.2] - 2025-12-01\n";
//! let version = release_kit::Version::new(1, 2, 3);
//! assert_eq!(release_kit::extract(changelog, &version).unwrap(), "Added:\n- X");
//!
//! let decision = release_kit::next_version("0.2.5", &["feat: a", "fix: b"]).unwrap();
//! assert_eq!(decision.next, Some(release_kit::Version::new(0, 3, 0)));
//! ```

pub mod analyzer;
pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod manifest;
pub mod ui;

pub use analyzer::{next_version, BumpDecision};
pub use domain::changelog::extract;
pub use domain::{Version, VersionBump};
pub use error::{ReleaseError, Result};
