//! Bridge to the external particle resolver
//!
//! The resolver is an opaque capability: something that can load the
//! particle data package once and then answer queries with a small JSON
//! document. This module owns the lazy, shared initialization of that
//! capability and the strict decoding of its answers.
//!
//! # Architecture
//!
//! ```text
//! QueryDispatcher → ResolverBridge → ResolverBackend::load (once)
//!                                  → ResolverSession::evaluate (per query)
//!                                  → parse_response (schema check)
//! ```
//!
//! Backends:
//! - [`process::PythonProcessBackend`]: runs an external interpreter per query
//! - `embedded::EmbeddedPythonBackend`: embeds CPython (feature `python`)

pub mod process;
pub mod script;

#[cfg(feature = "python")]
pub mod embedded;

use crate::config::{BackendKind, ResolverSettings};
use crate::error::{LookupError, Result};
use crate::types::{Mass, Query, ResolvedParticle};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, error, info};

/// Something that can bring up a resolver session
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResolverBackend: Send + Sync {
    /// Backend name for logs and status output
    fn name(&self) -> &'static str;

    /// Load the resolution environment and its data package
    async fn load(&self) -> Result<Arc<dyn ResolverSession>>;
}

/// A loaded resolver, able to answer queries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResolverSession: Send + Sync {
    /// Run one query and return the resolver's raw JSON text
    async fn evaluate(&self, query: &Query) -> Result<String>;
}

/// Lifecycle of the bridge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeStatus {
    /// Nobody has asked for the resolver yet
    Uninitialized,
    /// Loading is in flight
    Initializing,
    /// Loaded and answering
    Ready,
    /// Loading failed; permanent for this process
    Unavailable(String),
}

impl std::fmt::Display for BridgeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BridgeStatus::Uninitialized => write!(f, "not loaded"),
            BridgeStatus::Initializing => write!(f, "loading"),
            BridgeStatus::Ready => write!(f, "ready"),
            BridgeStatus::Unavailable(reason) => write!(f, "unavailable ({})", reason),
        }
    }
}

/// Lazily initialized handle to the resolver
///
/// Initialization runs at most once per bridge. Concurrent callers await the
/// same in-flight load; a failed load is cached and every later call reports
/// the bridge as unavailable.
pub struct ResolverBridge {
    backend: Arc<dyn ResolverBackend>,
    session: OnceCell<std::result::Result<Arc<dyn ResolverSession>, String>>,
    loading: AtomicBool,
    timeout: Option<Duration>,
}

impl ResolverBridge {
    /// Create a bridge over a backend; nothing is loaded yet
    pub fn new(backend: Arc<dyn ResolverBackend>) -> Self {
        Self {
            backend,
            session: OnceCell::new(),
            loading: AtomicBool::new(false),
            timeout: None,
        }
    }

    /// Bound every resolve call by `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the configured backend and wrap it
    pub fn from_settings(settings: &ResolverSettings) -> Result<Self> {
        Ok(Self::new(backend_from_settings(settings)?).with_timeout(settings.timeout()))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Current lifecycle state
    pub fn status(&self) -> BridgeStatus {
        match self.session.get() {
            Some(Ok(_)) => BridgeStatus::Ready,
            Some(Err(reason)) => BridgeStatus::Unavailable(reason.clone()),
            None if self.loading.load(Ordering::SeqCst) => BridgeStatus::Initializing,
            None => BridgeStatus::Uninitialized,
        }
    }

    /// Return the session, loading it on first use
    ///
    /// The caller that actually performed a failed load gets
    /// [`LookupError::Initialization`]; everyone after that gets
    /// [`LookupError::ResolverUnavailable`].
    pub async fn initialize(&self) -> Result<Arc<dyn ResolverSession>> {
        let performed = AtomicBool::new(false);
        let performed_ref = &performed;
        let backend = &self.backend;
        let loading = &self.loading;

        let outcome = self
            .session
            .get_or_init(|| async move {
                performed_ref.store(true, Ordering::SeqCst);
                let _loading = LoadingFlag::raise(loading);
                info!("Loading particle resolver ({} backend)", backend.name());

                match backend.load().await {
                    Ok(session) => {
                        info!("Particle resolver ready");
                        Ok(session)
                    }
                    Err(e) => {
                        error!("Particle resolver failed to load: {}", e);
                        Err(e.to_string())
                    }
                }
            })
            .await;

        match outcome {
            Ok(session) => Ok(Arc::clone(session)),
            Err(reason) if performed.load(Ordering::SeqCst) => {
                Err(LookupError::Initialization(reason.clone()))
            }
            Err(reason) => Err(LookupError::ResolverUnavailable(reason.clone())),
        }
    }

    /// Start loading without resolving anything
    pub async fn warm_up(&self) -> BridgeStatus {
        let _ = self.initialize().await;
        self.status()
    }

    /// Resolve one query into a validated particle
    pub async fn resolve(&self, query: &Query) -> Result<ResolvedParticle> {
        let session = self.initialize().await?;

        debug!("Resolving {} query {:?}", query.mode, query.raw_input);

        let raw = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, session.evaluate(query))
                .await
                .map_err(|_| LookupError::Timeout(limit))??,
            None => session.evaluate(query).await?,
        };

        parse_response(&raw)
    }
}

/// Marks a load as in flight until dropped, including when the loading
/// future is abandoned partway through
struct LoadingFlag<'a>(&'a AtomicBool);

impl<'a> LoadingFlag<'a> {
    fn raise(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for LoadingFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Build the backend named in the settings
pub fn backend_from_settings(settings: &ResolverSettings) -> Result<Arc<dyn ResolverBackend>> {
    match settings.backend {
        BackendKind::Process => Ok(Arc::new(process::PythonProcessBackend::new(
            settings.python.clone(),
            settings.package.clone(),
            settings.install_missing,
        ))),
        #[cfg(feature = "python")]
        BackendKind::Embedded => Ok(Arc::new(embedded::EmbeddedPythonBackend::new(
            settings.package.clone(),
        ))),
        #[cfg(not(feature = "python"))]
        BackendKind::Embedded => Err(LookupError::Config(config::ConfigError::Message(
            "the embedded backend requires building with --features python".to_string(),
        ))),
    }
}

/// Wire schema of a resolver answer
///
/// Neither shape tolerates extra keys, so a reply mixing a record with an
/// `error` matches nothing and is rejected as malformed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireResponse {
    /// The resolver ran but rejected the query
    Failure(FailureRecord),
    /// A particle record
    Particle(ParticleRecord),
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FailureRecord {
    error: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ParticleRecord {
    name: String,
    pdg_id: i64,
    #[serde(default)]
    mass: Option<f64>,
    #[serde(default)]
    width: Option<f64>,
}

/// Decode and validate the resolver's raw text
///
/// `mass`/`width` that are `null` or absent become [`Mass::Unknown`]; any
/// other deviation from the schema is a [`LookupError::MalformedResponse`].
pub fn parse_response(raw: &str) -> Result<ResolvedParticle> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LookupError::MalformedResponse("empty response".to_string()));
    }

    let wire: WireResponse = serde_json::from_str(trimmed)
        .map_err(|e| LookupError::MalformedResponse(format!("{}: {}", e, abbreviate(trimmed))))?;

    let record = match wire {
        WireResponse::Failure(failure) => return Err(LookupError::Resolution(failure.error)),
        WireResponse::Particle(record) => record,
    };

    if record.name.trim().is_empty() {
        return Err(LookupError::MalformedResponse("empty particle name".to_string()));
    }

    Ok(ResolvedParticle {
        display_name: record.name,
        pdg_id: record.pdg_id,
        mass_mev: checked_quantity("mass", record.mass)?,
        width_mev: checked_quantity("width", record.width)?,
    })
}

fn checked_quantity(field: &str, value: Option<f64>) -> Result<Mass> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(LookupError::MalformedResponse(format!(
            "{} must be a non-negative number, got {}",
            field, v
        ))),
        other => Ok(Mass::from_option(other)),
    }
}

fn abbreviate(text: &str) -> String {
    const LIMIT: usize = 120;
    if text.chars().count() <= LIMIT {
        text.to_string()
    } else {
        let head: String = text.chars().take(LIMIT).collect();
        format!("{}...", head)
    }
}
