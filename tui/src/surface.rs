//! Crossterm Surface
//!
//! The terminal side of the runner: an inline ratatui viewport on stderr
//! (so stdout stays clean for the report) plus a task pumping crossterm
//! input into the runner's channel.
//!
//! ```text
//! EventStream ──map_event──▶ mpsc::Sender<Event> ──▶ Runner
//! Runner ──FrameView──▶ render() ──▶ Terminal<CrosstermBackend<Stderr>>
//! ```

use std::io::{self, IsTerminal, Stderr};

use crossterm::event::{
    Event as TermEvent, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use futures::StreamExt;
use ratatui::backend::CrosstermBackend;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal, TerminalOptions, Viewport};
use reviewer_core::runner::{DriverError, Event, FrameView, Key, Surface};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::robot::{self, FRAME_HEIGHT};
use crate::theme;

/// Rows used by the indicator: blank, robot, blank, status
pub const VIEWPORT_HEIGHT: u16 = FRAME_HEIGHT + 3;

/// Runner surface backed by the real terminal
#[derive(Default)]
pub struct CrosstermSurface {
    terminal: Option<Terminal<CrosstermBackend<Stderr>>>,
    input: Option<JoinHandle<()>>,
    raw_mode: bool,
}

impl CrosstermSurface {
    /// Create an idle surface; nothing touches the terminal until `start`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether keys can be read and the indicator drawn
    #[must_use]
    pub fn is_available() -> bool {
        io::stdin().is_terminal() && io::stderr().is_terminal()
    }

    fn restore(&mut self) -> io::Result<()> {
        if let Some(input) = self.input.take() {
            input.abort();
        }

        let mut result = Ok(());
        if let Some(mut terminal) = self.terminal.take() {
            result = terminal.clear().and_then(|()| terminal.show_cursor());
        }
        if self.raw_mode {
            self.raw_mode = false;
            let disabled = disable_raw_mode();
            result = result.and(disabled);
        }
        result
    }
}

impl Surface for CrosstermSurface {
    fn start(&mut self, events: mpsc::Sender<Event>) -> Result<(), DriverError> {
        if !Self::is_available() {
            return Err(DriverError::NotATerminal);
        }

        enable_raw_mode()?;
        self.raw_mode = true;

        let terminal = Terminal::with_options(
            CrosstermBackend::new(io::stderr()),
            TerminalOptions {
                viewport: Viewport::Inline(VIEWPORT_HEIGHT),
            },
        );
        let terminal = match terminal {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = self.restore();
                return Err(err.into());
            }
        };
        self.terminal = Some(terminal);

        if let Ok((width, height)) = crossterm::terminal::size() {
            let _ = events.try_send(Event::Resize { width, height });
        }

        self.input = Some(tokio::spawn(pump_input(events)));
        tracing::debug!("terminal surface started");
        Ok(())
    }

    fn draw(&mut self, view: &FrameView<'_>) -> Result<(), DriverError> {
        if let Some(terminal) = self.terminal.as_mut() {
            terminal.draw(|frame| render(frame, view))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), DriverError> {
        self.restore()?;
        tracing::debug!("terminal surface restored");
        Ok(())
    }
}

impl Drop for CrosstermSurface {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

/// Forward terminal input until the runner hangs up
async fn pump_input(events: mpsc::Sender<Event>) {
    let mut stream = EventStream::new();

    while let Some(event) = stream.next().await {
        let event = match event {
            Ok(event) => event,
            Err(err) => {
                tracing::warn!(error = %err, "terminal input failed");
                return;
            }
        };

        if let Some(event) = map_event(&event) {
            if events.send(event).await.is_err() {
                return;
            }
        }
    }
}

/// Translate a crossterm event; `None` for events the runner ignores
#[must_use]
pub fn map_event(event: &TermEvent) -> Option<Event> {
    match event {
        // Only handle Press events (not Release or Repeat)
        TermEvent::Key(key) if key.kind == KeyEventKind::Press => {
            Some(Event::KeyPress(map_key(key)))
        }
        TermEvent::Resize(width, height) => Some(Event::Resize {
            width: *width,
            height: *height,
        }),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Key {
    match key.code {
        // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Key::Interrupt,
        KeyCode::Char(c) => Key::Char(c),
        KeyCode::Esc => Key::Escape,
        KeyCode::Enter => Key::Enter,
        _ => Key::Other,
    }
}

/// Draw one indicator frame
pub fn render(frame: &mut Frame<'_>, view: &FrameView<'_>) {
    let mut lines = Vec::with_capacity(usize::from(VIEWPORT_HEIGHT));
    lines.push(Line::default());
    lines.extend(
        robot::frame(view.frame_index)
            .lines()
            .map(|line| Line::styled(line, theme::robot_style())),
    );
    lines.push(Line::default());
    lines.push(Line::styled(view.status, theme::text_style()));

    frame.render_widget(Paragraph::new(lines), frame.area());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, KeyModifiers};
    use pretty_assertions::assert_eq;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::{Buffer, Cell};

    fn rows(buffer: &Buffer) -> Vec<String> {
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(Cell::symbol).collect::<String>().trim_end().to_string())
            .collect()
    }

    fn draw(frame_index: usize, status: &str) -> Buffer {
        let mut terminal = Terminal::new(TestBackend::new(24, VIEWPORT_HEIGHT)).unwrap();
        let view = FrameView {
            frame_index,
            status,
            width: 24,
            height: VIEWPORT_HEIGHT,
        };
        terminal.draw(|frame| render(frame, &view)).unwrap();
        terminal.backend().buffer().clone()
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> TermEvent {
        TermEvent::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_render_layout() {
        let buffer = draw(0, "Processing...");
        assert_eq!(
            rows(&buffer),
            vec!["", "  \\ /", " [o_o]", " /| |\\", " /   \\", "", "Processing..."]
        );
    }

    #[test]
    fn test_render_follows_frame_index() {
        let buffer = draw(3, "Processing...");
        assert_eq!(rows(&buffer)[2], " [-_-]");
    }

    #[test]
    fn test_render_colors() {
        let buffer = draw(0, "Processing...");
        let width = usize::from(buffer.area.width);

        // Row 2 is the robot face, row 6 the status line
        assert_eq!(buffer.content[2 * width + 1].fg, theme::ROBOT);
        assert_eq!(buffer.content[6 * width].fg, theme::TEXT);
    }

    #[test]
    fn test_quit_keys() {
        assert!(matches!(
            map_event(&press(KeyCode::Char('q'), KeyModifiers::NONE)),
            Some(Event::KeyPress(Key::Char('q')))
        ));
        assert!(matches!(
            map_event(&press(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Event::KeyPress(Key::Interrupt))
        ));
        // Plain 'c' is just a character
        assert!(matches!(
            map_event(&press(KeyCode::Char('c'), KeyModifiers::NONE)),
            Some(Event::KeyPress(Key::Char('c')))
        ));
    }

    #[test]
    fn test_other_keys() {
        assert!(matches!(
            map_event(&press(KeyCode::Esc, KeyModifiers::NONE)),
            Some(Event::KeyPress(Key::Escape))
        ));
        assert!(matches!(
            map_event(&press(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Event::KeyPress(Key::Enter))
        ));
        assert!(matches!(
            map_event(&press(KeyCode::F(5), KeyModifiers::NONE)),
            Some(Event::KeyPress(Key::Other))
        ));
    }

    #[test]
    fn test_key_release_is_ignored() {
        let release = TermEvent::Key(KeyEvent {
            code: KeyCode::Char('q'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(map_event(&release).is_none());
        assert!(map_event(&TermEvent::FocusGained).is_none());
    }

    #[test]
    fn test_resize_is_forwarded() {
        assert!(matches!(
            map_event(&TermEvent::Resize(100, 30)),
            Some(Event::Resize {
                width: 100,
                height: 30
            })
        ));
    }
}
