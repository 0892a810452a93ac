//! Runner State Machine
//!
//! ```text
//!            Tick / Resize / other keys
//!                 ┌──────────┐
//!                 ▼          │
//!            ┌─────────┐─────┘
//!            │ Running │
//!            └─────────┘
//!    TaskFinished │   │ quit key
//!        ┌────────┘   └────────┐
//!        ▼                     ▼
//!  Succeeded / Failed      Cancelled        (terminal, no way out)
//! ```
//!
//! [`RunnerState::apply`] is pure bookkeeping: it mutates the state and
//! tells the loop what to do next via a [`Command`]. Timers, channels and
//! drawing all live in the loop.

use std::num::NonZeroUsize;

use super::events::Event;

/// Lifecycle phase of one run
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the operation or a quit key
    Running,
    /// Operation returned text
    Succeeded,
    /// Operation returned an error
    Failed,
    /// User quit before the operation finished
    Cancelled,
}

impl Phase {
    /// Whether no further transitions are possible
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// What the loop must do after an event was applied
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Draw the current frame
    Render,
    /// Arm the clock for the next tick, then draw
    RearmAndRender,
    /// Disarm the clock and leave the loop
    Exit,
    /// Nothing to do
    Ignore,
}

/// Snapshot handed to a surface for drawing one frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameView<'a> {
    /// Index of the animation frame to show
    pub frame_index: usize,
    /// Fixed status line under the animation
    pub status: &'a str,
    /// Last known terminal width (0 if unknown)
    pub width: u16,
    /// Last known terminal height (0 if unknown)
    pub height: u16,
}

/// Mutable state owned by the runner loop for a single run
#[derive(Debug)]
pub struct RunnerState {
    frame_index: usize,
    frame_count: NonZeroUsize,
    phase: Phase,
    output: String,
    error: Option<anyhow::Error>,
    width: u16,
    height: u16,
}

impl RunnerState {
    /// Fresh state for a run animating `frame_count` frames
    #[must_use]
    pub fn new(frame_count: NonZeroUsize) -> Self {
        Self {
            frame_index: 0,
            frame_count,
            phase: Phase::Running,
            output: String::new(),
            error: None,
            width: 0,
            height: 0,
        }
    }

    /// Apply one event and return the follow-up command
    pub fn apply(&mut self, event: Event) -> Command {
        match event {
            Event::Tick(_) => {
                if self.phase.is_terminal() {
                    return Command::Ignore;
                }
                self.frame_index = (self.frame_index + 1) % self.frame_count.get();
                Command::RearmAndRender
            }
            Event::TaskFinished(result) => {
                if self.phase.is_terminal() {
                    return Command::Ignore;
                }
                match result {
                    Ok(output) => {
                        self.output = output;
                        self.phase = Phase::Succeeded;
                    }
                    Err(err) => {
                        self.error = Some(err);
                        self.phase = Phase::Failed;
                    }
                }
                Command::Exit
            }
            Event::KeyPress(key) => {
                if self.phase.is_terminal() {
                    return Command::Ignore;
                }
                if key.is_quit() {
                    self.phase = Phase::Cancelled;
                    Command::Exit
                } else {
                    Command::Render
                }
            }
            Event::Resize { width, height } => {
                self.width = width;
                self.height = height;
                if self.phase.is_terminal() {
                    Command::Ignore
                } else {
                    Command::Render
                }
            }
        }
    }

    /// View of the current frame
    #[must_use]
    pub fn view<'a>(&self, status: &'a str) -> FrameView<'a> {
        FrameView {
            frame_index: self.frame_index,
            status,
            width: self.width,
            height: self.height,
        }
    }

    /// Current animation frame index
    #[must_use]
    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    /// Current phase
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Output captured so far (empty until the task succeeds)
    #[must_use]
    pub fn output(&self) -> &str {
        &self.output
    }

    /// Error captured so far
    #[must_use]
    pub fn error(&self) -> Option<&anyhow::Error> {
        self.error.as_ref()
    }

    #[cfg(test)]
    fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Consume the state into the value returned to the caller
    #[must_use]
    pub fn into_outcome(self) -> RunOutcome {
        RunOutcome {
            phase: self.phase,
            output: self.output,
            error: self.error,
        }
    }
}

/// Final result of a run
///
/// On cancellation `output` is empty and `error` is `None`: the
/// operation's eventual result is discarded, not awaited.
#[derive(Debug)]
pub struct RunOutcome {
    /// Phase the run ended in
    pub phase: Phase,
    /// Text returned by the operation
    pub output: String,
    /// Error returned by the operation
    pub error: Option<anyhow::Error>,
}

impl RunOutcome {
    /// Whether the user quit before the operation finished
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.phase == Phase::Cancelled
    }

    /// Collapse into a `Result`; a cancelled run yields the empty output.
    ///
    /// # Errors
    ///
    /// The operation's error, unchanged.
    pub fn into_result(self) -> anyhow::Result<String> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self.output),
        }
    }
}
