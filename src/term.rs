use std::io::{stdout, Stdout, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue, style};
use tracing::{error, warn};

use crate::snake::Direction;

/// What a raw terminal delivers for CTRL+C.
pub const CTRL_C: char = '\u{3}';

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Turn(Direction),
    Exit,
}

/// Keyboard mapping, case-insensitive. Unknown keys map to nothing.
pub fn parse_key(key: char) -> Option<Command> {
    match key.to_ascii_lowercase() {
        'a' => Some(Command::Turn(Direction::Left)),
        'd' => Some(Command::Turn(Direction::Right)),
        'w' => Some(Command::Turn(Direction::Up)),
        's' => Some(Command::Turn(Direction::Down)),
        'x' | CTRL_C => Some(Command::Exit),
        _ => None,
    }
}

/// Raw input mode plus alternate screen, held for as long as the value lives.
///
/// Dropping it (or calling `restore`) puts the terminal back the way it was.
pub struct RawMode {
    stdout: Stdout,
    active: bool,
}

impl RawMode {
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode().context("failed to enable raw mode, is stdin a terminal?")?;

        let mut raw = RawMode { stdout: stdout(), active: true };
        execute!(raw.stdout, EnterAlternateScreen, cursor::Hide)
            .context("failed to enter alternate screen")?;

        Ok(raw)
    }

    pub fn restore(mut self) -> Result<()> {
        self.release()
    }

    fn release(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        let screen = execute!(self.stdout, cursor::Show, LeaveAlternateScreen)
            .context("failed to leave alternate screen");
        terminal::disable_raw_mode().context("failed to disable raw mode")?;
        screen
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(err) = self.release() {
            error!(?err, "failed to restore terminal");
        }
    }
}

/// Non-blocking keyboard reader.
#[derive(Default)]
pub struct InputSource;

impl InputSource {
    pub fn new() -> Self {
        InputSource
    }

    /// Returns the next pending keypress, or `None` right away if there is none.
    pub fn poll(&mut self) -> Option<char> {
        loop {
            match event::poll(Duration::ZERO) {
                Ok(true) => {}
                Ok(false) => return None,
                Err(err) => {
                    warn!(?err, "polling the keyboard failed");
                    return None;
                }
            }

            match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                    if let Some(ch) = key_char(&key) {
                        return Some(ch);
                    }
                }
                Ok(_) => {}
                Err(err) => {
                    warn!(?err, "reading a key event failed");
                    return None;
                }
            }
        }
    }
}

fn key_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char('c') | KeyCode::Char('C')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            Some(CTRL_C)
        }
        KeyCode::Char(ch) => Some(ch),
        KeyCode::Up => Some('w'),
        KeyCode::Left => Some('a'),
        KeyCode::Down => Some('s'),
        KeyCode::Right => Some('d'),
        _ => None,
    }
}

/// Writes whole frames to stdout.
pub struct Display {
    stdout: Stdout,
}

impl Default for Display {
    fn default() -> Self {
        Display::new()
    }
}

impl Display {
    pub fn new() -> Self {
        Display { stdout: stdout() }
    }

    /// Clears the screen and prints `lines`, flushed as a single write.
    pub fn draw(&mut self, lines: &[String]) -> Result<()> {
        queue!(self.stdout, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        // Raw mode: no implicit carriage return on newline
        queue!(self.stdout, style::Print(lines.join("\r\n")))?;
        self.stdout.flush().context("failed to flush frame")?;
        Ok(())
    }
}
