//! Screen composition
//!
//! Renders an [`EngineState`] snapshot: title bar, input field with its
//! helper prompt, error line, history table and status bar.

use super::widgets::{HistoryTable, StatusBar};
use crate::engine::EngineState;
use crate::resolver::BridgeStatus;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Presentation options that are not engine state
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Show the title bar
    pub show_header: bool,

    /// Number of submits still waiting on the resolver
    pub in_flight: usize,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_header: true,
            in_flight: 0,
        }
    }
}

/// Draw one frame
pub fn draw(frame: &mut Frame, state: &EngineState, bridge: &BridgeStatus, options: &ViewOptions) {
    let header_height = if options.show_header { 1 } else { 0 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    if options.show_header {
        render_header(frame, chunks[0], bridge);
    }
    render_input(frame, chunks[1], state);

    frame.render_widget(
        Paragraph::new(state.mode().helper_text()).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );

    if let Some(message) = state.last_error() {
        frame.render_widget(
            Paragraph::new(format!(" {} ", message)).style(Style::default().fg(Color::Red)),
            chunks[3],
        );
    }

    frame.render_widget(HistoryTable::new(state.history()), chunks[4]);

    let status = StatusBar::new()
        .left_item("Mode", state.mode().label())
        .left_item("Resolver", bridge.to_string())
        .left_item("Pending", options.in_flight.to_string())
        .right_text("Enter search | Tab mode | Esc quit");
    frame.render_widget(status, chunks[5]);
}

fn render_header(frame: &mut Frame, area: Rect, bridge: &BridgeStatus) {
    let status_style = match bridge {
        BridgeStatus::Ready => Style::default().fg(Color::Green),
        BridgeStatus::Unavailable(_) => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::Yellow),
    };

    let line = Line::from(vec![
        Span::styled(
            " Particle ",
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw(" "),
        Span::styled(bridge.to_string(), status_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_input(frame: &mut Frame, area: Rect, state: &EngineState) {
    let block = Block::default()
        .title(state.mode().label())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);

    frame.render_widget(Paragraph::new(state.pending_input()).block(block), area);

    let cursor_x = inner.x + state.pending_input().chars().count() as u16;
    frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Mass, ResolvedParticle, SearchMode};
    use ratatui::{backend::TestBackend, Terminal};

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_draw_error_and_history() {
        let mut state = EngineState::new(SearchMode::PdgId);
        state.set_pending_input("-11".to_string());
        let query = state.snapshot_query();
        state.apply_success(
            query,
            ResolvedParticle {
                display_name: "e+".to_string(),
                pdg_id: -11,
                mass_mev: Mass::Known(0.511),
                width_mev: Mass::Known(0.0),
            },
        );
        state.apply_failure("Invalid input. Try again.");

        let mut terminal = Terminal::new(TestBackend::new(100, 16)).unwrap();
        terminal
            .draw(|frame| draw(frame, &state, &BridgeStatus::Ready, &ViewOptions::default()))
            .unwrap();
        let text = screen_text(&terminal);

        assert!(text.contains("Particle"));
        assert!(text.contains("Enter a PDG ID (e.g. -12)"));
        assert!(text.contains("Invalid input. Try again."));
        assert!(text.contains("e+"));
        assert!(text.contains("Mode: PDG ID"));
    }

    #[test]
    fn test_header_can_be_hidden() {
        let state = EngineState::new(SearchMode::Name);
        let options = ViewOptions {
            show_header: false,
            in_flight: 2,
        };

        let mut terminal = Terminal::new(TestBackend::new(100, 12)).unwrap();
        terminal
            .draw(|frame| draw(frame, &state, &BridgeStatus::Uninitialized, &options))
            .unwrap();
        let text = screen_text(&terminal);

        assert!(!text.contains(" Particle "));
        assert!(text.contains("Enter a particle name (e.g. pi+)"));
        assert!(text.contains("Pending: 2"));
    }
}
