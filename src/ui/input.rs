/// Terminal input source.
///
/// Blocks for one key press and turns it into a command character.
/// The wait is sliced into short polls so a cancelled session is noticed
/// without another key press.
///
/// Key mapping:
///   - printable keys pass through unchanged
///   - arrow keys map to w/a/s/d
///   - Enter → '\n', Esc and Ctrl+C → 'q'

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::sim::bridge::{CancelToken, InputSource};

/// How long one poll waits before re-checking the cancel token.
const POLL_SLICE: Duration = Duration::from_millis(50);

pub struct TerminalInput;

impl TerminalInput {
    pub fn new() -> Self {
        TerminalInput
    }
}

impl InputSource for TerminalInput {
    fn next_char(&mut self, cancel: &CancelToken) -> io::Result<Option<char>> {
        loop {
            if cancel.is_cancelled() {
                return Ok(None);
            }
            if !event::poll(POLL_SLICE)? {
                continue;
            }
            if let Event::Key(key) = event::read()? {
                if let Some(ch) = key_to_char(&key) {
                    return Ok(Some(ch));
                }
            }
        }
    }
}

/// Only presses count; release and repeat reports are dropped.
fn key_to_char(key: &KeyEvent) -> Option<char> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')).then_some('q');
    }
    match key.code {
        KeyCode::Char(c) => Some(c),
        KeyCode::Up => Some('w'),
        KeyCode::Left => Some('a'),
        KeyCode::Down => Some('s'),
        KeyCode::Right => Some('d'),
        KeyCode::Enter => Some('\n'),
        KeyCode::Esc => Some('q'),
        _ => None,
    }
}
