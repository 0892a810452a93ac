//! Interactive Task Runner
//!
//! Keeps a progress animation alive while a slow, blocking operation (the
//! LLM call) runs in the background, and hands back exactly one result.
//!
//! # Architecture
//!
//! ```text
//!  AnimationClock ──Tick──────────┐
//!  TaskExecutor ───TaskFinished───┼──▶ mpsc ──▶ event loop ──▶ RunnerState::apply
//!  Surface input ──KeyPress/Resize┘                 │
//!                                                   ▼
//!                                         Surface::draw(FrameView)
//! ```
//!
//! - The clock is a one-shot timer re-armed after every consumed tick.
//! - The executor runs the operation on the blocking pool and reports once.
//! - The loop task is the sole owner of [`RunnerState`].
//!
//! # Example
//!
//! ```ignore
//! use reviewer_core::runner::{Runner, RunnerConfig};
//!
//! let runner = Runner::new(surface, RunnerConfig::new(frame_count));
//! let outcome = runner.run(move || agent_blocking_call()).await?;
//! if !outcome.is_cancelled() {
//!     println!("{}", outcome.into_result()?);
//! }
//! ```

mod clock;
mod event_loop;
mod events;
mod executor;
mod state;
mod surface;

pub use clock::{AnimationClock, DEFAULT_TICK_INTERVAL};
pub use event_loop::{Runner, RunnerConfig, DEFAULT_STATUS};
pub use events::{Event, Key};
pub use executor::TaskExecutor;
pub use state::{Command, FrameView, Phase, RunOutcome, RunnerState};
pub use surface::{DriverError, Surface};

pub use tokio_util::sync::CancellationToken;
