//! Terminal shell for the lookup engine
//!
//! Presentation only: it forwards key presses to the dispatcher and
//! renders whatever the engine state holds.
//!
//! This module contains:
//! - Terminal setup and management
//! - Event handling
//! - Widgets and screen composition
//! - The application loop

mod app;
mod events;
mod terminal;
mod views;
mod widgets;

pub use app::{AppState, KeyAction, LookupApp};
pub use events::{EventLoop, TuiEvent};
pub use terminal::TerminalManager;
pub use views::{draw, ViewOptions};
pub use widgets::{HistoryTable, StatusBar};
