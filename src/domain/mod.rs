//! Domain logic - pure release rules independent of git and file I/O

pub mod changelog;
pub mod commit;
pub mod tag;
pub mod version;

pub use changelog::{ChangelogDocument, Section, SectionHeader};
pub use commit::ParsedCommit;
pub use tag::TagPattern;
pub use version::{Version, VersionBump};
