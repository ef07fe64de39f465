//! Engine state container
//!
//! One `EngineState` per UI shell. Readers get shared references; all
//! mutation goes through the two transitions (`apply_success`,
//! `apply_failure`) plus the two input setters, each of which runs under a
//! single write lock held by the dispatcher.

use crate::history::HistoryStore;
use crate::reporter::ErrorReporter;
use crate::types::{HistoryEntry, Query, ResolvedParticle, SearchMode};

/// Everything the UI renders
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    mode: SearchMode,
    pending_input: String,
    reporter: ErrorReporter,
    history: HistoryStore,
}

impl EngineState {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// Latest failure message, if the last completed submit failed
    pub fn last_error(&self) -> Option<&str> {
        self.reporter.current()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Most recent successful result
    pub fn last_result(&self) -> Option<&HistoryEntry> {
        self.history.latest()
    }

    pub(crate) fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    pub(crate) fn set_pending_input(&mut self, text: String) {
        self.pending_input = text;
    }

    /// Freeze the current mode and input into a query
    pub(crate) fn snapshot_query(&self) -> Query {
        Query::new(self.mode, self.pending_input.clone())
    }

    /// Success transition: clear the error line, append to history
    pub(crate) fn apply_success(&mut self, query: Query, result: ResolvedParticle) -> &HistoryEntry {
        self.reporter.clear();
        self.history.append(query, result)
    }

    /// Failure transition: replace the error line, history untouched
    pub(crate) fn apply_failure(&mut self, message: &str) {
        self.reporter.set(message);
    }
}
