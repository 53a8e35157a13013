//! User interface module - interaction (prompts) and formatting.
//!
//! Separates concerns:
//! - `formatter` - Output formatting
//! - This module - Interactive prompts and user input handling

use std::io::{self, BufRead, Write};

use anyhow::Result;

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    commit_subject, display_boundary_warning, display_bump_decision, display_commit_analysis,
    display_error, display_status, display_success, format_decision, format_section,
};

/// Prompts user to confirm an action with a yes/no prompt.
///
/// Accepts "y" or "yes" (case-insensitive) as confirmation. Default is "no"
/// if user presses Enter. The prompt goes to stderr so stdout stays clean.
pub fn confirm_action(prompt: &str) -> Result<bool> {
    let stdin = io::stdin();
    confirm_with(prompt, &mut stdin.lock(), &mut io::stderr())
}

/// [`confirm_action`] over arbitrary streams
pub fn confirm_with<R: BufRead, W: Write>(prompt: &str, input: &mut R, output: &mut W) -> Result<bool> {
    write!(output, "\n{} (y/N): ", prompt)?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;

    let response = line.trim().to_lowercase();
    Ok(response == "y" || response == "yes")
}
