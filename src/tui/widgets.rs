//! Shared widget components

use crate::history::HistoryStore;
use crate::types::Mass;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Widget},
};

/// Status bar widget
pub struct StatusBar<'a> {
    /// Left-aligned items
    left_items: Vec<(&'a str, String)>,

    /// Right-aligned hint
    right_text: &'a str,

    /// Style
    style: Style,
}

impl<'a> StatusBar<'a> {
    /// Create new status bar
    pub fn new() -> Self {
        Self {
            left_items: Vec::new(),
            right_text: "",
            style: Style::default().bg(Color::DarkGray).fg(Color::White),
        }
    }

    /// Add left-aligned item
    pub fn left_item(mut self, label: &'a str, value: impl Into<String>) -> Self {
        self.left_items.push((label, value.into()));
        self
    }

    /// Set right-aligned text
    pub fn right_text(mut self, text: &'a str) -> Self {
        self.right_text = text;
        self
    }
}

impl<'a> Default for StatusBar<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Widget for StatusBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();
        for (i, (label, value)) in self.left_items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" | "));
            }
            spans.push(Span::styled(*label, Style::default().add_modifier(Modifier::BOLD)));
            spans.push(Span::raw(": "));
            spans.push(Span::raw(value.clone()));
        }

        let left_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
        let right_width = self.right_text.chars().count();
        let padding = (area.width as usize).saturating_sub(left_width + right_width);
        if padding > 0 && right_width > 0 {
            spans.push(Span::raw(" ".repeat(padding)));
            spans.push(Span::raw(self.right_text));
        }

        Paragraph::new(Line::from(spans))
            .style(self.style)
            .render(area, buf);
    }
}

/// History table, newest row first
pub struct HistoryTable<'a> {
    history: &'a HistoryStore,
}

impl<'a> HistoryTable<'a> {
    pub fn new(history: &'a HistoryStore) -> Self {
        Self { history }
    }
}

impl<'a> Widget for HistoryTable<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let header = Row::new(vec!["#", "Name", "PDG ID", "Mass (MeV)", "Width (MeV)", "Query"])
            .style(Style::default().add_modifier(Modifier::BOLD));

        let rows = self.history.most_recent_first().map(|entry| {
            Row::new(vec![
                Cell::from((entry.sequence + 1).to_string()),
                Cell::from(entry.result.display_name.clone()),
                Cell::from(entry.result.pdg_id.to_string()),
                quantity_cell(entry.result.mass_mev),
                quantity_cell(entry.result.width_mev),
                Cell::from(format!("{}: {}", entry.query.mode.label(), entry.query.raw_input)),
            ])
        });

        let widths = [
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Min(12),
        ];

        let title = format!("History ({})", self.history.len());
        Table::new(rows, widths)
            .header(header)
            .block(Block::default().title(title).borders(Borders::ALL))
            .render(area, buf);
    }
}

fn quantity_cell(value: Mass) -> Cell<'static> {
    let cell = Cell::from(value.to_string());
    if value.is_unknown() {
        cell.style(Style::default().fg(Color::DarkGray))
    } else {
        cell
    }
}
