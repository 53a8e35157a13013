//! Formatting functions for UI output.
//!
//! Everything here writes to stderr so stdout stays reserved for the
//! machine-readable result (a version string or release notes) that CI
//! steps capture.

use console::style;

use crate::analyzer::BumpDecision;
use crate::boundary::BoundaryWarning;
use crate::domain::Section;

const MAX_LISTED_COMMITS: usize = 10;
const MAX_SUBJECT_CHARS: usize = 60;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    eprintln!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    eprintln!("{} {}", style("→").yellow(), message);
}

/// Display a boundary warning to the user.
pub fn display_boundary_warning(warning: &BoundaryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// First line of a commit message, cut to a readable width
pub fn commit_subject(message: &str) -> String {
    let subject = message.lines().next().unwrap_or_default();
    if subject.chars().count() > MAX_SUBJECT_CHARS {
        let cut: String = subject.chars().take(MAX_SUBJECT_CHARS).collect();
        format!("{}…", cut)
    } else {
        subject.to_string()
    }
}

/// Display the commits being analysed.
///
/// Shows up to 10 subjects; the rest are summarised as a count.
pub fn display_commit_analysis(commit_messages: &[String], since: Option<&str>) {
    let heading = match since {
        Some(tag) => format!("Commits since {}", tag),
        None => "Commits in history".to_string(),
    };
    eprintln!("\n{} ({})", style(heading).bold(), commit_messages.len());

    for (i, message) in commit_messages.iter().take(MAX_LISTED_COMMITS).enumerate() {
        eprintln!("  {}. {}", i + 1, commit_subject(message));
    }

    if commit_messages.len() > MAX_LISTED_COMMITS {
        eprintln!(
            "  ... and {} more commits",
            commit_messages.len() - MAX_LISTED_COMMITS
        );
    }
}

/// One-line summary of a bump decision
pub fn format_decision(decision: &BumpDecision) -> String {
    match decision.next {
        Some(next) => format!("{} bump: {} -> {}", decision.bump, decision.current, next),
        None => format!("No bump required (current: {})", decision.current),
    }
}

/// Display the proposed version change.
pub fn display_bump_decision(decision: &BumpDecision) {
    match decision.next {
        Some(next) => {
            eprintln!("\n{}", style("Proposed Version Change:").bold());
            eprintln!("  Bump: {}", decision.bump);
            eprintln!("  From: {}", style(decision.current).red());
            eprintln!("  To:   {}", style(next).green());
        }
        None => display_status(&format_decision(decision)),
    }
}

/// `label - date` line for a changelog section listing
pub fn format_section(section: &Section) -> String {
    match &section.header.date {
        Some(date) => format!("{} - {}", section.header.label, date),
        None => section.header.label.clone(),
    }
}
