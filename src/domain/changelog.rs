//! Keep-a-Changelog document model.
//!
//! Version sections start with a level-2 heading of the shape
//! `## [1.2.3] - 2026-01-04`. A section runs until the next level-2
//! heading of any kind, so `### Added` style subsections stay inside it.

use crate::domain::Version;
use crate::error::{ReleaseError, Result};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

/// `## [LABEL]` with an optional ` - DATE` suffix
static SECTION_HEADER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##[ \t]+\[(?P<label>[^\]]+)\](?:[ \t]+-[ \t]+(?P<date>\S.*?))?[ \t]*$")
        .expect("Invalid regex")
});

/// Label used by the pseudo-section collecting changes not yet released
pub const UNRELEASED_LABEL: &str = "Unreleased";

/// Header line of a version section
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeader {
    /// Text inside the brackets, e.g. `1.2.3` or `Unreleased`
    pub label: String,
    pub date: Option<String>,
    /// Zero-based line index of the header in the source document
    pub line: usize,
}

impl SectionHeader {
    /// The label as a version, when it is one
    pub fn version(&self) -> Option<Version> {
        Version::parse(&self.label).ok()
    }

    pub fn is_unreleased(&self) -> bool {
        self.label.eq_ignore_ascii_case(UNRELEASED_LABEL)
    }
}

/// One bracketed section of a changelog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub header: SectionHeader,
    /// Body with surrounding blank lines removed, lines joined by `\n`
    pub body: String,
}

/// A changelog split into its bracketed sections, in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangelogDocument {
    sections: Vec<Section>,
}

/// Classification of a single source line
enum Line<'a> {
    Section(SectionHeader),
    OtherHeading,
    Text(&'a str),
}

impl ChangelogDocument {
    /// Split `text` into sections. Never fails: text that is not inside a
    /// bracketed section (preamble, other level-2 headings) is ignored.
    pub fn parse(text: &str) -> Self {
        let mut sections = Vec::new();
        let mut current: Option<(SectionHeader, Vec<&str>)> = None;

        for line in classify_lines(text) {
            match line {
                Line::Section(header) => {
                    if let Some((previous, body)) = current.take() {
                        sections.push(finish_section(previous, &body));
                    }
                    current = Some((header, Vec::new()));
                }
                Line::OtherHeading => {
                    if let Some((header, body)) = current.take() {
                        sections.push(finish_section(header, &body));
                    }
                }
                Line::Text(content) => {
                    if let Some((_, body)) = current.as_mut() {
                        body.push(content);
                    }
                }
            }
        }
        if let Some((header, body)) = current.take() {
            sections.push(finish_section(header, &body));
        }

        debug!(section_count = sections.len(), "changelog parsed");
        ChangelogDocument { sections }
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// First section whose label equals `label` exactly
    pub fn find(&self, label: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.header.label == label)
    }

    /// First section for `version`, matched on the canonical string
    pub fn section(&self, version: &Version) -> Option<&Section> {
        self.find(&version.to_string())
    }

    /// The `[Unreleased]` section, if present
    pub fn unreleased(&self) -> Option<&Section> {
        self.sections.iter().find(|s| s.header.is_unreleased())
    }

    /// Versions named by section labels, in document order
    pub fn versions(&self) -> Vec<Version> {
        self.sections
            .iter()
            .filter_map(|s| s.header.version())
            .collect()
    }

    /// Labels that head more than one section, in order of first appearance
    pub fn duplicate_labels(&self) -> Vec<String> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for section in &self.sections {
            *counts.entry(section.header.label.as_str()).or_default() += 1;
        }

        let mut duplicates: Vec<String> = Vec::new();
        for section in &self.sections {
            let label = section.header.label.as_str();
            if counts[label] > 1 && !duplicates.iter().any(|d| d == label) {
                duplicates.push(label.to_string());
            }
        }
        duplicates
    }
}

/// Return the body of the first section for `version`.
///
/// Matching is string equality on `MAJOR.MINOR.PATCH`, so a `## [1.0]`
/// header never answers for `1.0.0`. An empty section yields `""`.
pub fn extract(document: &str, version: &Version) -> Result<String> {
    let wanted = version.to_string();
    ChangelogDocument::parse(document)
        .find(&wanted)
        .map(|section| section.body.clone())
        .ok_or_else(|| ReleaseError::not_found(wanted))
}

/// Move the `[Unreleased]` notes under a new `## [version] - date` header.
///
/// The new header is inserted directly below `## [Unreleased]`, which leaves
/// the Unreleased section empty and everything else byte-for-byte intact.
pub fn promote_unreleased(document: &str, version: &Version, date: &str) -> Result<String> {
    let parsed = ChangelogDocument::parse(document);
    if parsed.section(version).is_some() {
        return Err(ReleaseError::DuplicateSection(version.to_string()));
    }
    let unreleased = parsed.unreleased().ok_or(ReleaseError::MissingUnreleased)?;

    let newline = if document.contains("\r\n") { "\r\n" } else { "\n" };
    let header_line = unreleased.header.line;

    let mut output = String::with_capacity(document.len() + 32);
    for (index, line) in document.split_inclusive('\n').enumerate() {
        output.push_str(line);
        if index == header_line {
            if !line.ends_with('\n') {
                output.push_str(newline);
            }
            output.push_str(newline);
            output.push_str(&format!("## [{}] - {}", version, date));
            output.push_str(newline);
        }
    }

    debug!(%version, date, "promoted unreleased section");
    Ok(output)
}

/// An open code fence: its character and the length of its opening run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// A line of three or more backticks or tildes opens a fence. Backtick
    /// fences may not carry a backtick in their info string.
    fn open(line: &str) -> Option<Fence> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = trimmed.chars().take_while(|c| *c == marker).count();
        if len < 3 {
            return None;
        }
        let info = &trimmed[len * marker.len_utf8()..];
        if marker == '`' && info.contains('`') {
            return None;
        }
        Some(Fence { marker, len })
    }

    /// Only a bare run of the same character, at least as long, closes it.
    fn is_closed_by(&self, line: &str) -> bool {
        let trimmed = line.trim();
        let run = trimmed.chars().take_while(|c| *c == self.marker).count();
        run >= self.len && run * self.marker.len_utf8() == trimmed.len()
    }
}

fn classify_lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    let mut fence: Option<Fence> = None;

    text.lines().enumerate().map(move |(index, line)| {
        if let Some(open) = fence {
            if open.is_closed_by(line) {
                fence = None;
            }
            return Line::Text(line);
        }
        if let Some(opened) = Fence::open(line) {
            fence = Some(opened);
            return Line::Text(line);
        }

        if let Some(caps) = SECTION_HEADER_REGEX.captures(line) {
            return Line::Section(SectionHeader {
                label: caps["label"].trim().to_string(),
                date: caps.name("date").map(|m| m.as_str().to_string()),
                line: index,
            });
        }
        if is_level_two_heading(line) {
            return Line::OtherHeading;
        }
        Line::Text(line)
    })
}

fn is_level_two_heading(line: &str) -> bool {
    line == "##" || line.starts_with("## ") || line.starts_with("##\t")
}

fn finish_section(header: SectionHeader, body: &[&str]) -> Section {
    let start = body
        .iter()
        .position(|l| !l.trim().is_empty())
        .unwrap_or(body.len());
    let end = body
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(start, |i| i + 1);

    Section {
        header,
        body: body[start..end].join("\n"),
    }
}
