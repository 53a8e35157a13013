use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use release_kit::cli::orchestration::{
    self, BumpArgs, NotesArgs, PromoteArgs, STDIN_MARKER,
};
use release_kit::config;
use release_kit::ui;

#[derive(Parser)]
#[command(
    name = "release-kit",
    version,
    about = "Extract changelog release notes and compute the next version from conventional commits"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Log debug output to stderr")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the changelog section for a version
    Notes {
        /// Version or release tag, e.g. 1.2.3, v1.2.3 or refs/tags/v1.2.3
        version: String,

        #[arg(long, help = "Changelog file (default from config)")]
        changelog: Option<PathBuf>,

        #[arg(short, long, help = "Write the notes to a file instead of stdout")]
        output: Option<PathBuf>,
    },

    /// Compute the next version from commits since the last release
    Bump {
        #[arg(long, help = "Current version (default: manifest, then latest tag)")]
        current: Option<String>,

        #[arg(long, value_name = "PATH", help = "Commit messages file, '-' for stdin (default: git history)")]
        commits_file: Option<PathBuf>,

        #[arg(long, default_value = ".", help = "Git repository to read tags and commits from")]
        repo: PathBuf,

        #[arg(long, help = "Store the new version in the manifest")]
        write: bool,

        #[arg(short, long, help = "Skip confirmation prompts")]
        yes: bool,
    },

    /// Turn the Unreleased notes into a dated version section
    Promote {
        version: String,

        #[arg(long, help = "Release date as YYYY-MM-DD (default: today)")]
        date: Option<String>,

        #[arg(long, help = "Changelog file (default from config)")]
        changelog: Option<PathBuf>,
    },

    /// List the version sections of the changelog
    Sections {
        #[arg(long, help = "Changelog file (default from config)")]
        changelog: Option<PathBuf>,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;

    match args.command {
        Command::Notes {
            version,
            changelog,
            output,
        } => {
            let outcome = orchestration::run_notes(
                &NotesArgs {
                    version,
                    changelog,
                    output,
                },
                &config,
            )?;
            outcome.warnings.iter().for_each(ui::display_boundary_warning);

            match &outcome.written_to {
                Some(path) => ui::display_success(&format!(
                    "Release notes for {} written to {}",
                    outcome.version,
                    path.display()
                )),
                None => println!("{}", outcome.notes),
            }
        }

        Command::Bump {
            current,
            commits_file,
            repo,
            write,
            yes,
        } => {
            let from_stdin = commits_file
                .as_deref()
                .is_some_and(|p| p.as_os_str() == STDIN_MARKER);
            if write && !yes && from_stdin {
                anyhow::bail!("--write with commits from stdin needs --yes");
            }

            let outcome = orchestration::run_bump(
                &BumpArgs {
                    current,
                    commits: commits_file,
                    repo,
                    write,
                    yes,
                },
                &config,
                ui::confirm_action,
            )?;
            outcome.warnings.iter().for_each(ui::display_boundary_warning);

            ui::display_commit_analysis(&outcome.commit_messages, outcome.since_tag.as_deref());
            ui::display_bump_decision(&outcome.decision);

            if let Some(next) = outcome.decision.next {
                println!("{}", next);
            }
            if outcome.manifest_written {
                ui::display_success(&format!(
                    "Updated {} to {}",
                    config.manifest.path.display(),
                    outcome.decision.next.map(|v| v.to_string()).unwrap_or_default()
                ));
            }
        }

        Command::Promote {
            version,
            date,
            changelog,
        } => {
            let path = orchestration::run_promote(
                &PromoteArgs {
                    version,
                    date,
                    changelog,
                },
                &config,
            )?;
            ui::display_success(&format!("Promoted Unreleased notes in {}", path.display()));
        }

        Command::Sections { changelog } => {
            let outcome = orchestration::run_sections(changelog.as_deref(), &config)?;
            outcome.warnings.iter().for_each(ui::display_boundary_warning);

            if outcome.sections.is_empty() {
                ui::display_status("No version sections found");
            }
            for section in &outcome.sections {
                println!("{}", ui::format_section(section));
            }
        }
    }

    Ok(())
}
