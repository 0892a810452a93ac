//! Surface Seam
//!
//! The runner does not know about terminals. A [`Surface`] owns the actual
//! display and input device: it pushes key and resize events into the
//! runner's channel and draws the frames the runner asks for.

use thiserror::Error;
use tokio::sync::mpsc;

use super::events::Event;
use super::state::FrameView;

/// The display driver could not start or draw
#[derive(Debug, Error)]
pub enum DriverError {
    /// No interactive terminal to draw on or read keys from
    #[error("no interactive terminal available")]
    NotATerminal,

    /// Terminal I/O failed
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Display + input device driven by the runner
pub trait Surface: Send {
    /// Prepare the display and begin forwarding input events.
    ///
    /// Called once per run, before the operation starts. An error here
    /// aborts the run without executing the operation.
    ///
    /// # Errors
    ///
    /// [`DriverError`] if the device is unusable.
    fn start(&mut self, events: mpsc::Sender<Event>) -> Result<(), DriverError>;

    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// [`DriverError::Io`] if writing to the device failed.
    fn draw(&mut self, view: &FrameView<'_>) -> Result<(), DriverError>;

    /// Stop forwarding input and restore the device.
    ///
    /// Called exactly once after a successful `start`, on every exit path.
    ///
    /// # Errors
    ///
    /// [`DriverError::Io`] if the device could not be restored.
    fn finish(&mut self) -> Result<(), DriverError>;
}
