//! Code Reviewer - AI code review from the command line
//!
//! The binary wires the headless `reviewer_core` crate to a terminal:
//! subcommands read a git diff, ask Gemini about it and print the answer,
//! while a small robot animates on stderr until the answer arrives.
//!
//! # Architecture
//!
//! - **CLI**: clap subcommands (`review`, `report`, `fix`, `document`, `config`)
//! - **Onboarding**: Prompts for missing API key, language and model
//! - **Surface**: Crossterm/ratatui implementation of the runner's surface
//! - **Robot**: Animation frames and palette

pub mod cli;
pub mod commands;
pub mod logging;
pub mod onboarding;
pub mod robot;
pub mod surface;
pub mod theme;

pub use cli::Cli;
pub use commands::CommandStatus;
