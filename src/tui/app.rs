//! Interactive lookup application

use super::events::{EventLoop, TuiEvent};
use super::terminal::TerminalManager;
use super::views::{self, ViewOptions};
use crate::dispatcher::QueryDispatcher;
use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Running normally
    Running,
    /// Quit requested
    Quitting,
}

/// What a key press asks the app to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Submit,
    ToggleMode,
    Insert(char),
    Backspace,
    ClearInput,
    Ignore,
}

impl KeyAction {
    pub fn from_key(key: &KeyEvent) -> Self {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => KeyAction::Submit,
            (KeyCode::Tab, _) | (KeyCode::BackTab, _) => KeyAction::ToggleMode,
            (KeyCode::Backspace, _) => KeyAction::Backspace,
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => KeyAction::ClearInput,
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => KeyAction::Insert(c),
            _ => KeyAction::Ignore,
        }
    }
}

/// Counts one submit as in flight until dropped, even if its task panics
struct PendingSubmit(Arc<AtomicUsize>);

impl PendingSubmit {
    fn start(counter: &Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(counter))
    }
}

impl Drop for PendingSubmit {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Main TUI application
pub struct LookupApp {
    dispatcher: QueryDispatcher,
    event_loop: EventLoop,
    options: ViewOptions,
    in_flight: Arc<AtomicUsize>,
    state: AppState,
}

impl LookupApp {
    pub fn new(dispatcher: QueryDispatcher, tick_rate_ms: u64, show_header: bool) -> Self {
        Self {
            dispatcher,
            event_loop: EventLoop::new(tick_rate_ms),
            options: ViewOptions {
                show_header,
                in_flight: 0,
            },
            in_flight: Arc::new(AtomicUsize::new(0)),
            state: AppState::Running,
        }
    }

    /// Run until the user quits
    pub async fn run(mut self) -> Result<()> {
        let mut terminal = TerminalManager::new()?;
        terminal.clear()?;

        // Start loading the resolver right away; the first lookup is slow otherwise
        let bridge = Arc::clone(self.dispatcher.bridge());
        tokio::spawn(async move {
            bridge.warm_up().await;
        });

        while self.state == AppState::Running {
            self.render(&mut terminal)?;

            match self.event_loop.poll_event()? {
                TuiEvent::Quit => self.state = AppState::Quitting,
                TuiEvent::Key(key) => self.handle_key(&key)?,
                TuiEvent::Resize(..) | TuiEvent::Tick => {}
            }

            tokio::task::yield_now().await;
        }

        debug!("Lookup TUI exiting");
        Ok(())
    }

    fn render(&mut self, terminal: &mut TerminalManager) -> Result<()> {
        self.options.in_flight = self.in_flight.load(Ordering::SeqCst);
        let bridge_status = self.dispatcher.bridge().status();
        let state = self.dispatcher.read_state()?;
        let options = &self.options;

        terminal
            .terminal_mut()
            .draw(|frame| views::draw(frame, &state, &bridge_status, options))?;
        Ok(())
    }

    /// Apply one key press to the engine
    pub fn handle_key(&mut self, key: &KeyEvent) -> Result<()> {
        match KeyAction::from_key(key) {
            KeyAction::Submit => self.spawn_submit(),
            KeyAction::ToggleMode => {
                let mode = self.dispatcher.toggle_mode()?;
                debug!("Search mode now {}", mode);
            }
            KeyAction::Insert(c) => self.dispatcher.edit_pending_input(|text| text.push(c))?,
            KeyAction::Backspace => self.dispatcher.edit_pending_input(|text| {
                text.pop();
            })?,
            KeyAction::ClearInput => self.dispatcher.set_pending_input("")?,
            KeyAction::Ignore => {}
        }
        Ok(())
    }

    /// Fire a submit without waiting for it
    ///
    /// Earlier submits may still be in flight; each completion applies its
    /// own transition when it lands.
    fn spawn_submit(&self) {
        let dispatcher = self.dispatcher.clone();
        let pending = PendingSubmit::start(&self.in_flight);

        tokio::spawn(async move {
            let _pending = pending;
            if let Err(e) = dispatcher.submit().await {
                debug!("Submit finished with error: {}", e);
            }
        });
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }
}
