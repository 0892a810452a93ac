//! Command-line interface.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use reviewer_core::DiffMode;

/// AI Code Review Agent CLI
#[derive(Parser, Debug)]
#[command(name = "code-reviewer")]
#[command(author, version, about)]
#[command(long_about = "A CLI tool that uses AI to review code changes and suggest fixes.")]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short = 'c', long, env = "CODE_REVIEWER_CONFIG", value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Review code changes and print the report (no animation)
    Review {
        /// Review staged changes
        #[arg(long)]
        staged: bool,
    },

    /// Generate a code review report
    Report {
        /// Review staged changes
        #[arg(long)]
        staged: bool,
    },

    /// Propose fixes for the current changes (staged first, then unstaged)
    Fix,

    /// Generate technical documentation for code changes
    Document {
        /// Document staged changes
        #[arg(long, conflicts_with = "unstaged")]
        staged: bool,

        /// Document unstaged changes
        #[arg(long)]
        unstaged: bool,
    },

    /// Manage application configuration
    Config {
        /// Configuration action
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// `config` subcommands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigAction {
    /// List all configuration values
    List,

    /// Get a specific configuration value
    Get {
        /// Configuration key
        key: String,
    },

    /// Set a specific configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },
}

/// Diff mode selected by `document`'s flags; both unset means all changes
#[must_use]
pub fn document_mode(staged: bool, unstaged: bool) -> DiffMode {
    match (staged, unstaged) {
        (true, _) => DiffMode::Staged,
        (false, true) => DiffMode::Unstaged,
        (false, false) => DiffMode::All,
    }
}
