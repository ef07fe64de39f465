//! Query dispatch
//!
//! The dispatcher owns the shared [`EngineState`] and is the only thing
//! that mutates it. A submit snapshots `{mode, pending_input}`, awaits the
//! resolver without holding any lock, then applies exactly one transition.
//!
//! Concurrent submits are not serialized: each completion applies its own
//! transition when it finishes, so history is in completion order and the
//! error line reflects whichever submit completed last. Nothing is
//! cancelled; a completion after a mode change still uses its own snapshot.

use crate::engine::EngineState;
use crate::error::{ErrorKind, LookupError, Result};
use crate::resolver::ResolverBridge;
use crate::types::{Query, ResolvedParticle, SearchMode};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

/// Front door of the engine; cheap to clone, clones share state
#[derive(Clone)]
pub struct QueryDispatcher {
    bridge: Arc<ResolverBridge>,
    state: Arc<RwLock<EngineState>>,
}

impl QueryDispatcher {
    pub fn new(bridge: Arc<ResolverBridge>, mode: SearchMode) -> Self {
        Self {
            bridge,
            state: Arc::new(RwLock::new(EngineState::new(mode))),
        }
    }

    pub fn bridge(&self) -> &Arc<ResolverBridge> {
        &self.bridge
    }

    /// Read access for rendering; do not hold across an await
    pub fn read_state(&self) -> Result<RwLockReadGuard<'_, EngineState>> {
        self.state
            .read()
            .map_err(|e| LookupError::StatePoisoned(format!("Failed to read engine state: {}", e)))
    }

    fn write_state(&self) -> Result<RwLockWriteGuard<'_, EngineState>> {
        self.state
            .write()
            .map_err(|e| LookupError::StatePoisoned(format!("Failed to write engine state: {}", e)))
    }

    /// Change the interpretation mode; input and history are untouched
    pub fn set_mode(&self, mode: SearchMode) -> Result<()> {
        self.write_state()?.set_mode(mode);
        Ok(())
    }

    /// Flip between PDG ID and name mode, returning the new mode
    pub fn toggle_mode(&self) -> Result<SearchMode> {
        let mut state = self.write_state()?;
        let mode = state.mode().toggle();
        state.set_mode(mode);
        Ok(mode)
    }

    /// Store the latest raw text; validation is deferred to the resolver
    pub fn set_pending_input(&self, text: impl Into<String>) -> Result<()> {
        self.write_state()?.set_pending_input(text.into());
        Ok(())
    }

    /// Edit the pending input in place
    pub fn edit_pending_input(&self, edit: impl FnOnce(&mut String)) -> Result<()> {
        let mut state = self.write_state()?;
        let mut text = state.pending_input().to_string();
        edit(&mut text);
        state.set_pending_input(text);
        Ok(())
    }

    /// Submit the current mode and pending input
    ///
    /// Empty or whitespace input is dispatched like any other; the resolver
    /// is what rejects it.
    pub async fn submit(&self) -> Result<ResolvedParticle> {
        let query = {
            let state = self.read_state()?;
            state.snapshot_query()
        };
        self.dispatch(query).await
    }

    /// Resolve an already snapshotted query and apply its transition
    ///
    /// On failure the error line is set and the error is returned; history
    /// and the last successful result are left as they were.
    pub async fn dispatch(&self, query: Query) -> Result<ResolvedParticle> {
        debug!("Dispatching {} query {:?}", query.mode, query.raw_input);

        match self.bridge.resolve(&query).await {
            Ok(particle) => {
                let mut state = self.write_state()?;
                let entry = state.apply_success(query, particle.clone());
                info!(
                    "Resolved {} (pdg {}) as history entry {}",
                    entry.result.display_name, entry.result.pdg_id, entry.sequence
                );
                Ok(particle)
            }
            Err(err) => {
                match err.kind() {
                    ErrorKind::Initialization => warn!("Resolver unavailable: {}", err),
                    _ => warn!("Query {:?} failed: {}", query.raw_input, err),
                }
                self.write_state()?.apply_failure(err.user_message());
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INVALID_INPUT_MESSAGE;
    use crate::resolver::{MockResolverBackend, MockResolverSession, ResolverSession};
    use crate::types::Mass;

    /// Dispatcher whose resolver knows the electron family and nothing else
    fn dispatcher() -> QueryDispatcher {
        let mut session = MockResolverSession::new();
        session.expect_evaluate().returning(|query| {
            let answer = match (query.mode, query.raw_input.trim()) {
                (SearchMode::PdgId, "11") | (SearchMode::Name, "e-") => {
                    r#"{"name": "e-", "pdg_id": 11, "mass": 0.511, "width": 0.0}"#
                }
                (SearchMode::PdgId, "-11") | (SearchMode::Name, "e+") => {
                    r#"{"name": "e+", "pdg_id": -11, "mass": 0.511, "width": 0.0}"#
                }
                (SearchMode::PdgId, "22") => r#"{"name": "gamma", "pdg_id": 22, "mass": 0}"#,
                (SearchMode::PdgId, "9000221") => {
                    r#"{"name": "f(0)(500)", "pdg_id": 9000221, "mass": null}"#
                }
                _ => r#"{"error": "ParticleNotFound"}"#,
            };
            Ok(answer.to_string())
        });
        let session: Arc<dyn ResolverSession> = Arc::new(session);

        let mut backend = MockResolverBackend::new();
        backend.expect_name().return_const("mock");
        backend
            .expect_load()
            .returning(move || Ok(Arc::clone(&session)));

        QueryDispatcher::new(
            Arc::new(ResolverBridge::new(Arc::new(backend))),
            SearchMode::PdgId,
        )
    }

    #[tokio::test]
    async fn test_positron_scenario() {
        let dispatcher = dispatcher();
        dispatcher.set_pending_input("-11").unwrap();

        let particle = dispatcher.submit().await.unwrap();
        assert_eq!(particle.display_name, "e+");

        let state = dispatcher.read_state().unwrap();
        assert_eq!(state.history().len(), 1);
        let entry = state.history().latest().unwrap();
        assert_eq!(entry.query.mode, SearchMode::PdgId);
        assert_eq!(entry.query.raw_input, "-11");
        assert_eq!(entry.result.display_name, "e+");
        assert_eq!(entry.result.pdg_id, -11);
        assert_eq!(entry.result.mass_mev, Mass::Known(0.511));
        assert!(state.last_error().is_none());
    }

    #[tokio::test]
    async fn test_bogus_name_scenario() {
        let dispatcher = dispatcher();
        dispatcher.set_mode(SearchMode::Name).unwrap();
        dispatcher.set_pending_input("bogus").unwrap();

        let err = dispatcher.submit().await.unwrap_err();
        assert!(matches!(err, LookupError::Resolution(_)));

        let state = dispatcher.read_state().unwrap();
        assert_eq!(state.last_error(), Some(INVALID_INPUT_MESSAGE));
        assert!(state.history().is_empty());
    }

    #[tokio::test]
    async fn test_failure_keeps_previous_result() {
        let dispatcher = dispatcher();
        dispatcher.set_pending_input("11").unwrap();
        dispatcher.submit().await.unwrap();

        dispatcher.set_pending_input("").unwrap();
        assert!(dispatcher.submit().await.is_err());

        let state = dispatcher.read_state().unwrap();
        assert_eq!(state.history().len(), 1);
        assert_eq!(state.last_result().unwrap().result.pdg_id, 11);
        assert_eq!(state.last_error(), Some(INVALID_INPUT_MESSAGE));
    }

    #[tokio::test]
    async fn test_success_clears_error() {
        let dispatcher = dispatcher();
        dispatcher.set_pending_input("nonsense").unwrap();
        assert!(dispatcher.submit().await.is_err());

        dispatcher.set_pending_input("11").unwrap();
        dispatcher.submit().await.unwrap();

        assert!(dispatcher.read_state().unwrap().last_error().is_none());
    }

    #[tokio::test]
    async fn test_mass_normalization() {
        let dispatcher = dispatcher();

        dispatcher.set_pending_input("9000221").unwrap();
        let unknown = dispatcher.submit().await.unwrap();
        assert_eq!(unknown.mass_mev, Mass::Unknown);

        dispatcher.set_pending_input("22").unwrap();
        let massless = dispatcher.submit().await.unwrap();
        assert_eq!(massless.mass_mev, Mass::Known(0.0));
    }

    #[tokio::test]
    async fn test_identical_queries_make_distinct_entries() {
        let dispatcher = dispatcher();
        dispatcher.set_pending_input("11").unwrap();
        dispatcher.submit().await.unwrap();
        dispatcher.submit().await.unwrap();

        let state = dispatcher.read_state().unwrap();
        let entries: Vec<_> = state.history().all().collect();
        assert_eq!(entries.len(), 2);
        assert_ne!(entries[0].id, entries[1].id);
        assert_eq!(entries[0].result, entries[1].result);
        assert_eq!(entries[0].sequence, 0);
        assert_eq!(entries[1].sequence, 1);
    }

    #[tokio::test]
    async fn test_mode_and_input_setters_do_not_touch_history() {
        let dispatcher = dispatcher();
        dispatcher.set_pending_input("11").unwrap();
        dispatcher.submit().await.unwrap();

        assert_eq!(dispatcher.toggle_mode().unwrap(), SearchMode::Name);
        dispatcher.edit_pending_input(|text| text.push('3')).unwrap();

        let state = dispatcher.read_state().unwrap();
        assert_eq!(state.mode(), SearchMode::Name);
        assert_eq!(state.pending_input(), "113");
        assert_eq!(state.history().len(), 1);
    }
}
