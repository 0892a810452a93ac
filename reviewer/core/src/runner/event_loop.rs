//! Runner Event Loop
//!
//! Merges the clock, the executor and the surface's input into one channel
//! and feeds every event through [`RunnerState::apply`]. The loop task is
//! the only owner of the state, so no locking is involved.

use std::num::NonZeroUsize;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::clock::{AnimationClock, DEFAULT_TICK_INTERVAL};
use super::events::Event;
use super::executor::TaskExecutor;
use super::state::{Command, RunOutcome, RunnerState};
use super::surface::{DriverError, Surface};

/// Capacity of the merged event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Default status line under the animation
pub const DEFAULT_STATUS: &str = "Processing...";

/// Static presentation settings for a run
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Interval between animation ticks
    pub tick_interval: Duration,
    /// Number of frames in the animation cycle
    pub frame_count: NonZeroUsize,
    /// Fixed status line shown while running
    pub status: String,
}

impl RunnerConfig {
    /// Config for an animation of `frame_count` frames with default timing
    #[must_use]
    pub fn new(frame_count: NonZeroUsize) -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            frame_count,
            status: DEFAULT_STATUS.to_string(),
        }
    }

    /// Set the tick interval
    #[must_use]
    pub fn with_tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Set the status line
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }
}

/// Interactive task runner
///
/// Keeps a surface animated while a blocking operation runs elsewhere, and
/// returns once the operation finishes or the user quits.
pub struct Runner<S: Surface> {
    surface: S,
    config: RunnerConfig,
}

impl<S: Surface> Runner<S> {
    /// Create a runner drawing on `surface`
    pub fn new(surface: S, config: RunnerConfig) -> Self {
        Self { surface, config }
    }

    /// Run `operation` behind the animation.
    ///
    /// Quitting returns immediately with an empty output; the operation keeps
    /// running in the background and its result is dropped.
    ///
    /// # Errors
    ///
    /// [`DriverError`] if the surface cannot start (the operation is then
    /// never executed) or fails to draw.
    pub async fn run<F>(self, operation: F) -> Result<RunOutcome, DriverError>
    where
        F: FnOnce() -> anyhow::Result<String> + Send + 'static,
    {
        self.run_with_cancel(move |_token| operation()).await
    }

    /// Like [`run`](Self::run), but the operation receives a token that is
    /// cancelled when the user quits, so it can stop early.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run).
    pub async fn run_with_cancel<F>(mut self, operation: F) -> Result<RunOutcome, DriverError>
    where
        F: FnOnce(CancellationToken) -> anyhow::Result<String> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        self.surface.start(tx.clone())?;

        let token = CancellationToken::new();
        let task_token = token.clone();
        TaskExecutor::spawn(move || operation(task_token), tx.clone());

        let mut clock = AnimationClock::new(self.config.tick_interval, tx);
        let result = self.event_loop(rx, &mut clock).await;
        clock.disarm();

        if let Err(err) = self.surface.finish() {
            warn!(error = %err, "failed to restore surface");
        }

        match &result {
            Ok(outcome) if !outcome.is_cancelled() => {}
            _ => token.cancel(),
        }

        let outcome = result?;
        info!(phase = ?outcome.phase, "run finished");
        Ok(outcome)
    }

    async fn event_loop(
        &mut self,
        mut rx: mpsc::Receiver<Event>,
        clock: &mut AnimationClock,
    ) -> Result<RunOutcome, DriverError> {
        let mut state = RunnerState::new(self.config.frame_count);

        self.surface.draw(&state.view(&self.config.status))?;
        clock.arm();

        while let Some(event) = rx.recv().await {
            match state.apply(event) {
                Command::Render => {
                    self.surface.draw(&state.view(&self.config.status))?;
                }
                Command::RearmAndRender => {
                    clock.arm();
                    self.surface.draw(&state.view(&self.config.status))?;
                }
                Command::Exit => {
                    clock.disarm();
                    debug!(phase = ?state.phase(), "runner reached terminal state");
                    break;
                }
                Command::Ignore => {}
            }
        }

        Ok(state.into_outcome())
    }
}
