//! Common test utilities and helpers
//!
//! `CatalogBackend` answers from a fixed table of particles, with optional
//! per-input gates so tests can control the order in which lookups finish.

#![allow(dead_code)]

use async_trait::async_trait;
use pdg_lookup_core::{
    LookupError, Query, QueryDispatcher, ResolverBackend, ResolverBridge, ResolverSession,
    SearchMode,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

pub const ELECTRON: &str = r#"{"name": "e-", "pdg_id": 11, "mass": 0.51099895, "width": 0.0}"#;
pub const POSITRON: &str = r#"{"name": "e+", "pdg_id": -11, "mass": 0.511, "width": 0.0}"#;
pub const MUON: &str = r#"{"name": "mu-", "pdg_id": 13, "mass": 105.6583755, "width": 3.0e-16}"#;
pub const PHOTON: &str = r#"{"name": "gamma", "pdg_id": 22, "mass": 0, "width": 0}"#;
pub const SIGMA_MESON: &str = r#"{"name": "f(0)(500)", "pdg_id": 9000221, "mass": null, "width": null}"#;

/// Resolver session over a fixed table
pub struct CatalogSession {
    answers: HashMap<(SearchMode, String), String>,
    gates: Mutex<HashMap<String, Arc<Notify>>>,
    evaluations: AtomicUsize,
}

impl CatalogSession {
    fn standard() -> Self {
        let mut answers = HashMap::new();
        for (mode, input, answer) in [
            (SearchMode::PdgId, "11", ELECTRON),
            (SearchMode::PdgId, "-11", POSITRON),
            (SearchMode::PdgId, "13", MUON),
            (SearchMode::PdgId, "22", PHOTON),
            (SearchMode::PdgId, "9000221", SIGMA_MESON),
            (SearchMode::Name, "e-", ELECTRON),
            (SearchMode::Name, "e+", POSITRON),
            (SearchMode::Name, "mu-", MUON),
            (SearchMode::Name, "gamma", PHOTON),
            (SearchMode::PdgId, "666", "this is not json"),
        ] {
            answers.insert((mode, input.to_string()), answer.to_string());
        }

        Self {
            answers,
            gates: Mutex::new(HashMap::new()),
            evaluations: AtomicUsize::new(0),
        }
    }

    /// Hold every lookup of `input` until the returned gate is notified
    pub fn gate(&self, input: &str) -> Arc<Notify> {
        let mut gates = self.gates.lock().unwrap();
        Arc::clone(
            gates
                .entry(input.to_string())
                .or_insert_with(|| Arc::new(Notify::new())),
        )
    }

    /// How many queries reached the resolver
    pub fn evaluations(&self) -> usize {
        self.evaluations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResolverSession for CatalogSession {
    async fn evaluate(&self, query: &Query) -> pdg_lookup_core::Result<String> {
        self.evaluations.fetch_add(1, Ordering::SeqCst);

        let gate = {
            let gates = self.gates.lock().unwrap();
            gates.get(&query.raw_input).cloned()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }

        // Mirrors the Python script: int() tolerates surrounding whitespace
        let key = (query.mode, query.raw_input.trim().to_string());
        Ok(self.answers.get(&key).cloned().unwrap_or_else(|| {
            format!(
                r#"{{"error": "ParticleNotFound: {}"}}"#,
                query.raw_input.escape_default()
            )
        }))
    }
}

/// Backend handing out a shared [`CatalogSession`]
pub struct CatalogBackend {
    pub session: Arc<CatalogSession>,
    loads: AtomicUsize,
    load_error: Option<String>,
    load_delay: Duration,
}

impl CatalogBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            session: Arc::new(CatalogSession::standard()),
            loads: AtomicUsize::new(0),
            load_error: None,
            load_delay: Duration::ZERO,
        })
    }

    /// Backend whose load always fails with `reason`
    pub fn broken(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            session: Arc::new(CatalogSession::standard()),
            loads: AtomicUsize::new(0),
            load_error: Some(reason.to_string()),
            load_delay: Duration::ZERO,
        })
    }

    /// Backend that takes `delay` to load
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            session: Arc::new(CatalogSession::standard()),
            loads: AtomicUsize::new(0),
            load_error: None,
            load_delay: delay,
        })
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ResolverBackend for CatalogBackend {
    fn name(&self) -> &'static str {
        "catalog"
    }

    async fn load(&self) -> pdg_lookup_core::Result<Arc<dyn ResolverSession>> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if !self.load_delay.is_zero() {
            tokio::time::sleep(self.load_delay).await;
        }
        match &self.load_error {
            Some(reason) => Err(LookupError::Initialization(reason.clone())),
            None => Ok(Arc::clone(&self.session) as Arc<dyn ResolverSession>),
        }
    }
}

/// Dispatcher over `backend`, starting in PDG ID mode
pub fn dispatcher_with(backend: Arc<CatalogBackend>) -> QueryDispatcher {
    QueryDispatcher::new(
        Arc::new(ResolverBridge::new(backend)),
        SearchMode::PdgId,
    )
}

/// Poll until `check` holds or a second passes
pub async fn wait_until(mut check: impl FnMut() -> bool) {
    for _ in 0..200 {
        if check() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}
