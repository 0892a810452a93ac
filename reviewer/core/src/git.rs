//! Git adapter for diff retrieval.
//!
//! Every generation command starts from a `git diff`, so this is a thin,
//! explicit wrapper around the `git` subprocess.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Output;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

/// Which changes to diff
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DiffMode {
    /// Working tree and index against `HEAD`
    #[default]
    All,
    /// Index against `HEAD`
    Staged,
    /// Working tree against the index
    Unstaged,
}

impl DiffMode {
    /// Arguments passed to `git`
    #[must_use]
    pub fn args(self) -> &'static [&'static str] {
        match self {
            Self::All => &["diff", "HEAD"],
            Self::Staged => &["diff", "--staged"],
            Self::Unstaged => &["diff"],
        }
    }

    /// `Staged` when `staged`, otherwise `Unstaged`
    #[must_use]
    pub fn from_staged_flag(staged: bool) -> Self {
        if staged {
            Self::Staged
        } else {
            Self::Unstaged
        }
    }
}

impl fmt::Display for DiffMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "all"),
            Self::Staged => write!(f, "staged"),
            Self::Unstaged => write!(f, "unstaged"),
        }
    }
}

/// Git invocation failures
#[derive(Debug, Error)]
pub enum GitError {
    /// No `.git` in the working directory
    #[error("{} is not a git repository", .0.display())]
    NotARepository(PathBuf),

    /// `git` ran and exited non-zero
    #[error("git {args} failed: {output}")]
    CommandFailed {
        /// Space-joined arguments
        args: String,
        /// Combined stdout and stderr
        output: String,
    },

    /// `git` could not be started
    #[error("failed to run git: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Wrapper for executing git commands in a working directory.
#[derive(Debug, Clone)]
pub struct Git {
    workdir: PathBuf,
}

impl Git {
    /// Adapter rooted at `workdir`
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Adapter for the process's current directory
    ///
    /// # Errors
    ///
    /// Fails if the current directory is unreadable.
    pub fn current_dir() -> std::io::Result<Self> {
        std::env::current_dir().map(Self::new)
    }

    /// Working directory
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Whether `.git` exists directly in the working directory.
    ///
    /// Subdirectories of a repository do not count.
    #[must_use]
    pub fn is_repo(&self) -> bool {
        self.workdir.join(".git").exists()
    }

    /// Return the diff for `mode`; an empty string means no changes.
    ///
    /// # Errors
    ///
    /// [`GitError::CommandFailed`] when git exits non-zero (for example
    /// `DiffMode::All` in a repository without commits).
    #[instrument(skip(self), fields(workdir = %self.workdir.display()))]
    pub async fn diff(&self, mode: DiffMode) -> Result<String, GitError> {
        let out = self.run(mode.args()).await?;
        let diff = String::from_utf8_lossy(&out.stdout).into_owned();
        debug!(bytes = diff.len(), "diff captured");
        Ok(diff)
    }

    /// Check that this is a repository before diffing
    ///
    /// # Errors
    ///
    /// [`GitError::NotARepository`] if [`is_repo`](Self::is_repo) is false.
    pub fn ensure_repo(&self) -> Result<(), GitError> {
        if self.is_repo() {
            Ok(())
        } else {
            Err(GitError::NotARepository(self.workdir.clone()))
        }
    }

    async fn run(&self, args: &[&str]) -> Result<Output, GitError> {
        let out = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .kill_on_drop(true)
            .output()
            .await?;

        if out.status.success() {
            return Ok(out);
        }

        let mut output = String::from_utf8_lossy(&out.stdout).into_owned();
        output.push_str(&String::from_utf8_lossy(&out.stderr));
        let output = output.trim().to_string();
        warn!(args = ?args, status = ?out.status.code(), "git command failed");

        Err(GitError::CommandFailed {
            args: args.join(" "),
            output,
        })
    }
}
