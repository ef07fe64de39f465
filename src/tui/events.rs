//! Event handling system

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

/// TUI events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Key press event
    Key(KeyEvent),

    /// Window resize event
    Resize(u16, u16),

    /// Tick event (periodic redraw)
    Tick,

    /// Quit event
    Quit,
}

/// Event loop for TUI applications
pub struct EventLoop {
    /// Tick rate in milliseconds
    tick_rate: u64,
}

impl EventLoop {
    /// Create new event loop
    pub fn new(tick_rate: u64) -> Self {
        Self { tick_rate }
    }

    /// Poll for next event, yielding a tick when nothing arrives in time
    pub fn poll_event(&self) -> Result<TuiEvent> {
        if event::poll(Duration::from_millis(self.tick_rate))? {
            if let Some(event) = Self::translate(event::read()?) {
                return Ok(event);
            }
        }

        Ok(TuiEvent::Tick)
    }

    /// Map a crossterm event onto a TUI event
    pub fn translate(event: Event) -> Option<TuiEvent> {
        match event {
            // Windows reports key releases too
            Event::Key(key) if key.kind == KeyEventKind::Release => None,
            Event::Key(key) if Self::is_quit_key(&key) => Some(TuiEvent::Quit),
            Event::Key(key) => Some(TuiEvent::Key(key)),
            Event::Resize(w, h) => Some(TuiEvent::Resize(w, h)),
            _ => None,
        }
    }

    /// Check if key event is a quit shortcut
    fn is_quit_key(key: &KeyEvent) -> bool {
        // Ctrl+C, Ctrl+Q or Esc
        matches!(
            (key.code, key.modifiers),
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
                | (KeyCode::Char('q'), KeyModifiers::CONTROL)
                | (KeyCode::Esc, _)
        )
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new(100) // 100ms tick rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_keys() {
        let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        let esc = Event::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert_eq!(EventLoop::translate(ctrl_c), Some(TuiEvent::Quit));
        assert_eq!(EventLoop::translate(esc), Some(TuiEvent::Quit));
    }

    #[test]
    fn test_plain_keys_pass_through() {
        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(
            EventLoop::translate(Event::Key(key)),
            Some(TuiEvent::Key(key))
        );
        assert_eq!(
            EventLoop::translate(Event::Resize(80, 24)),
            Some(TuiEvent::Resize(80, 24))
        );
        assert_eq!(EventLoop::translate(Event::FocusGained), None);
    }
}
