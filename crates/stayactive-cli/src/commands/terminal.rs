//! crossterm implementations of the display sink and key source.

use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::{cursor, execute, queue};

use stayactive_core::error::DisplayError;
use stayactive_core::{
    CoreError, DisplaySink, Key, KeyInput, KeySource, Modifiers, StatusLine, Tone,
};

/// Raw mode with a hidden cursor for as long as it lives.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), cursor::Hide, Clear(ClearType::All)) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), ResetColor, cursor::Show);
        let _ = terminal::disable_raw_mode();
    }
}

fn color(tone: Tone) -> Option<Color> {
    match tone {
        Tone::Plain => None,
        Tone::Idle => Some(Color::Blue),
        Tone::Normal => Some(Color::Green),
        Tone::Warning => Some(Color::DarkYellow),
        Tone::Critical => Some(Color::Red),
    }
}

/// Draws status lines at fixed rows of the terminal.
pub struct TerminalDisplay {
    out: Stdout,
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self { out: io::stdout() }
    }
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DisplaySink for TerminalDisplay {
    fn render(&mut self, line: &StatusLine) -> Result<(), DisplayError> {
        queue!(self.out, cursor::MoveTo(0, line.row))?;
        match color(line.tone) {
            Some(c) => queue!(
                self.out,
                SetForegroundColor(c),
                Print(&line.text),
                ResetColor
            )?,
            None => queue!(self.out, Print(&line.text))?,
        }
        self.out.flush()?;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), DisplayError> {
        execute!(self.out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        Ok(())
    }
}

/// Terminal key presses.
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn next_key(&mut self, timeout: Duration) -> stayactive_core::error::Result<Option<KeyInput>> {
        let ready = event::poll(timeout).map_err(|e| CoreError::Input(e.to_string()))?;
        if !ready {
            return Ok(None);
        }
        match event::read().map_err(|e| CoreError::Input(e.to_string()))? {
            Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(key_input(key))),
            _ => Ok(None),
        }
    }
}

/// Convert a crossterm key event.
///
/// Shift is dropped for character keys: it only selects the character
/// (`+` on most layouts, digits on some), so Ctrl or Alt is the modifier.
/// Raw mode swallows SIGINT, so Ctrl+C arrives here and quits.
pub fn key_input(event: KeyEvent) -> KeyInput {
    if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
        return KeyInput::new(Key::Esc, Modifiers::NONE);
    }

    let mut modifiers = Modifiers::NONE;
    if event.modifiers.contains(KeyModifiers::SHIFT) {
        modifiers = modifiers | Modifiers::SHIFT;
    }
    if event.modifiers.contains(KeyModifiers::CONTROL) {
        modifiers = modifiers | Modifiers::CTRL;
    }
    if event.modifiers.contains(KeyModifiers::ALT) {
        modifiers = modifiers | Modifiers::ALT;
    }

    let key = match event.code {
        KeyCode::Char(c) => {
            modifiers = modifiers.without(Modifiers::SHIFT);
            Key::Char(c)
        }
        KeyCode::Esc => Key::Esc,
        _ => Key::Other,
    };
    KeyInput::new(key, modifiers)
}
