//! Runner Events
//!
//! Everything the runner reacts to arrives as one [`Event`] on a single
//! channel. Producers never touch runner state; they only send events.

use tokio::time::Instant;

/// Events consumed by the runner loop
#[derive(Debug)]
pub enum Event {
    /// The animation clock fired
    Tick(Instant),
    /// The background operation finished (exactly once per run)
    TaskFinished(anyhow::Result<String>),
    /// The user pressed a key
    KeyPress(Key),
    /// The terminal was resized
    Resize {
        /// New width in cells
        width: u16,
        /// New height in cells
        height: u16,
    },
}

/// Terminal-independent key symbol
///
/// Surfaces translate their native key events into this type so the
/// state machine stays free of terminal crates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    /// A printable character
    Char(char),
    /// Ctrl+C
    Interrupt,
    /// Escape
    Escape,
    /// Enter / Return
    Enter,
    /// Anything else
    Other,
}

impl Key {
    /// Whether this key ends the run (`q` or Ctrl+C)
    #[must_use]
    pub fn is_quit(self) -> bool {
        matches!(self, Self::Char('q') | Self::Interrupt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        assert!(Key::Char('q').is_quit());
        assert!(Key::Interrupt.is_quit());

        assert!(!Key::Char('Q').is_quit());
        assert!(!Key::Escape.is_quit());
        assert!(!Key::Enter.is_quit());
        assert!(!Key::Other.is_quit());
    }
}
