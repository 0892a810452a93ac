//! Diff-based generation commands: review, report, fix and document.
//!
//! `review` awaits the agent directly. The others run it behind the robot
//! animation when a terminal is attached and fall back to a plain await
//! otherwise, so piping the output still works.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use reviewer_core::agent::PromptKind;
use reviewer_core::runner::{Runner, RunnerConfig, DEFAULT_STATUS};
use reviewer_core::{Agent, DiffMode, Git, LlmBackend};
use tokio::runtime::Handle;

use super::{load_config, CommandStatus};
use crate::surface::CrosstermSurface;
use crate::{onboarding, robot, theme};

/// `review`: print the report without animation
///
/// # Errors
///
/// Diff, onboarding or generation failures.
pub async fn review(
    git: &Git,
    config_path: Option<PathBuf>,
    staged: bool,
) -> anyhow::Result<CommandStatus> {
    let Some(diff) = read_diff(git, DiffMode::from_staged_flag(staged)).await? else {
        println!("No changes found.");
        return Ok(CommandStatus::Done);
    };

    println!("Analyzing changes...");
    let agent = build_agent(config_path).await?;
    let report = agent.analyze(&diff).await.context("Error analyzing code")?;
    println!("{report}");
    Ok(CommandStatus::Done)
}

/// `report`: review with the robot animation
///
/// # Errors
///
/// Diff, onboarding or generation failures.
pub async fn report(
    git: &Git,
    config_path: Option<PathBuf>,
    staged: bool,
) -> anyhow::Result<CommandStatus> {
    let Some(diff) = read_diff(git, DiffMode::from_staged_flag(staged)).await? else {
        println!("No changes to review.");
        return Ok(CommandStatus::Done);
    };

    let agent = build_agent(config_path).await?;
    let Some(report) = run_animated(agent, PromptKind::Review, diff)
        .await
        .context("Error analyzing code")?
    else {
        return Ok(CommandStatus::Cancelled);
    };

    println!("{report}");
    Ok(CommandStatus::Done)
}

/// `fix`: propose fixes for staged changes, or unstaged ones if nothing is
/// staged
///
/// # Errors
///
/// Diff, onboarding or generation failures.
pub async fn fix(git: &Git, config_path: Option<PathBuf>) -> anyhow::Result<CommandStatus> {
    let diff = match read_diff(git, DiffMode::Staged).await? {
        Some(diff) => Some(diff),
        None => read_diff(git, DiffMode::Unstaged).await?,
    };
    let Some(diff) = diff else {
        println!("No changes to fix.");
        return Ok(CommandStatus::Done);
    };

    let agent = build_agent(config_path).await?;
    let Some(proposal) = run_animated(agent, PromptKind::Fix, diff)
        .await
        .context("Error generating fix")?
    else {
        return Ok(CommandStatus::Cancelled);
    };

    println!("Proposed Fix:");
    println!("{proposal}");
    println!(
        "{}",
        theme::paint(
            "Fix generated successfully.",
            theme::DONE_INDEX,
            io::stdout().is_terminal()
        )
    );
    Ok(CommandStatus::Done)
}

/// `document`: technical documentation for the selected changes
///
/// # Errors
///
/// Diff, onboarding or generation failures.
pub async fn document(
    git: &Git,
    config_path: Option<PathBuf>,
    mode: DiffMode,
) -> anyhow::Result<CommandStatus> {
    let Some(diff) = read_diff(git, mode).await? else {
        println!("No changes to document.");
        return Ok(CommandStatus::Done);
    };

    let agent = build_agent(config_path).await?;
    let Some(doc) = run_animated(agent, PromptKind::Document, diff)
        .await
        .context("Error generating documentation")?
    else {
        return Ok(CommandStatus::Cancelled);
    };

    println!("{doc}");
    Ok(CommandStatus::Done)
}

/// The diff for `mode`, or `None` when there is nothing to look at
async fn read_diff(git: &Git, mode: DiffMode) -> anyhow::Result<Option<String>> {
    let diff = git.diff(mode).await.context("Error getting diff")?;
    Ok(non_empty(diff))
}

fn non_empty(diff: String) -> Option<String> {
    (!diff.trim().is_empty()).then_some(diff)
}

async fn build_agent(
    config_path: Option<PathBuf>,
) -> anyhow::Result<Agent<reviewer_core::GeminiBackend>> {
    let config = load_config(config_path).context("Error loading config")?;
    onboarding::prepare_agent(config)
        .await
        .context("Error creating agent")
}

/// Generate behind the robot animation.
///
/// `None` means the user quit. Without a terminal the agent is awaited
/// directly.
async fn run_animated<B>(
    agent: Agent<B>,
    kind: PromptKind,
    diff: String,
) -> anyhow::Result<Option<String>>
where
    B: LlmBackend + 'static,
{
    if !CrosstermSurface::is_available() {
        tracing::debug!("no terminal attached, generating without animation");
        eprintln!("{DEFAULT_STATUS}");
        let output = agent.complete(kind, &diff).await?;
        return Ok(Some(output));
    }

    let handle = Handle::current();
    let runner = Runner::new(CrosstermSurface::new(), RunnerConfig::new(robot::FRAME_COUNT));
    let outcome = runner
        .run_with_cancel(move |token| {
            handle.block_on(async move {
                tokio::select! {
                    result = agent.complete(kind, &diff) => result.map_err(anyhow::Error::from),
                    () = token.cancelled() => Ok(String::new()),
                }
            })
        })
        .await?;

    if outcome.is_cancelled() {
        tracing::info!("generation cancelled by user");
        return Ok(None);
    }
    outcome.into_result().map(Some)
}
