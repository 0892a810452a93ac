//! Subcommand dispatch.
//!
//! ```text
//! Cli ──run()──┬── config  ──▶ config::run
//!              └── review | report | fix | document
//!                    │ repository check
//!                    ▼
//!                  generate::* ──▶ Agent ──▶ stdout
//! ```

pub mod config;
pub mod generate;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use reviewer_core::{ConfigError, Git, ReviewerConfig};

use crate::cli::{self, Cli, Command};

/// Exit code used when the user quits a running animation
pub const CANCELLED_EXIT_CODE: u8 = 130;

/// How a successful command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    /// Ran to completion
    Done,
    /// The user quit while the answer was being generated
    Cancelled,
}

impl CommandStatus {
    /// Process exit code for this status
    #[must_use]
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Done => ExitCode::SUCCESS,
            Self::Cancelled => ExitCode::from(CANCELLED_EXIT_CODE),
        }
    }
}

/// Run the parsed command line.
///
/// # Errors
///
/// Any failure, already worded for the user.
pub async fn run(cli: Cli) -> anyhow::Result<CommandStatus> {
    let Cli {
        config, command, ..
    } = cli;

    match command {
        Command::Config { action } => {
            config::run(action, config)?;
            Ok(CommandStatus::Done)
        }
        Command::Review { staged } => generate::review(&repository()?, config, staged).await,
        Command::Report { staged } => generate::report(&repository()?, config, staged).await,
        Command::Fix => generate::fix(&repository()?, config).await,
        Command::Document { staged, unstaged } => {
            let mode = cli::document_mode(staged, unstaged);
            generate::document(&repository()?, config, mode).await
        }
    }
}

/// The git repository in the current directory
fn repository() -> anyhow::Result<Git> {
    let git = Git::current_dir().context("Error reading current directory")?;
    if !git.is_repo() {
        bail!("Error: Current directory is not a git repository.");
    }
    tracing::debug!(workdir = %git.workdir().display(), "repository found");
    Ok(git)
}

/// Load the configuration from `path`, or the default location
pub(crate) fn load_config(path: Option<PathBuf>) -> Result<ReviewerConfig, ConfigError> {
    match path {
        Some(path) => ReviewerConfig::load_from_path(path),
        None => ReviewerConfig::load(),
    }
}
