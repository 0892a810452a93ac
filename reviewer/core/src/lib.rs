//! Reviewer Core - Headless orchestration for code-reviewer
//!
//! This crate holds everything the CLI needs except the terminal itself:
//! aggregating streamed LLM responses, running a slow operation behind an
//! animated indicator, talking to the Gemini API, reading diffs from git and
//! loading the user configuration.
//!
//! # Architecture
//!
//! ```text
//!                     caller (CLI command)
//!                            │ run(operation)
//!                            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Runner                           │
//! │   ┌──────────────┐  ┌──────────────┐  ┌──────────────┐   │
//! │   │AnimationClock│  │ TaskExecutor │  │Surface input │   │
//! │   │  Tick (200ms)│  │ TaskFinished │  │KeyPress/Resize│  │
//! │   └──────┬───────┘  └──────┬───────┘  └──────┬───────┘   │
//! │          └─────────── mpsc::Sender<Event> ───┘           │
//! │                            │                             │
//! │                   RunnerState::apply                     │
//! └────────────────────────────┼─────────────────────────────┘
//!                              ▼
//!                     Surface::draw(FrameView)
//! ```
//!
//! The operation handed to the runner usually drives an [`Agent`], which
//! streams [`Fragment`]s from an [`LlmBackend`] through
//! [`stream::aggregate_stream`].
//!
//! # Module Overview
//!
//! - [`stream`]: Fragments and fail-fast aggregation
//! - [`runner`]: Event loop, state machine, clock, executor, surface seam
//! - [`backend`]: LLM backend abstraction and the Gemini client
//! - [`agent`]: Review/fix/document prompts on top of a backend
//! - [`git`]: Diff retrieval
//! - [`config`]: TOML configuration file
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui or crossterm. The terminal
//! lives behind the [`Surface`] trait.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod agent;
pub mod backend;
pub mod config;
pub mod git;
pub mod runner;
pub mod stream;

pub use agent::Agent;
pub use backend::{GeminiBackend, GenerateRequest, LlmBackend};
pub use config::{ConfigError, ConfigKey, ConfigSource, ReviewerConfig};
pub use git::{DiffMode, Git, GitError};
pub use runner::{
    DriverError, Event, FrameView, Key, Phase, RunOutcome, Runner, RunnerConfig, Surface,
};
pub use stream::{aggregate, aggregate_stream, Fragment, GenerationError, StreamError};
