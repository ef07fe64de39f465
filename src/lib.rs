//! pdg-lookup - Particle lookup by PDG ID or name
//!
//! Resolves particle identifiers into reference properties (name, PDG ID,
//! mass, width) through an external particle-data resolver, and keeps an
//! append-only history of every successful lookup.
//!
//! # Architecture
//!
//! - **Types**: SearchMode, Query, ResolvedParticle, HistoryEntry
//! - **Resolver**: lazily initialized bridge to the external resolver
//! - **Engine**: state container with the success/failure transitions
//! - **Dispatcher**: snapshots queries, resolves them, applies transitions
//! - **TUI**: terminal shell rendering the engine state
//! - **CLI**: one-shot lookup, doctor and config commands
//!
//! # Example
//!
//! ```ignore
//! use pdg_lookup_core::{LookupConfig, QueryDispatcher, ResolverBridge, SearchMode};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = LookupConfig::load(None)?;
//!     let bridge = Arc::new(ResolverBridge::from_settings(&config.resolver)?);
//!     let dispatcher = QueryDispatcher::new(bridge, SearchMode::PdgId);
//!
//!     dispatcher.set_pending_input("-11")?;
//!     let positron = dispatcher.submit().await?;
//!     println!("{} {}", positron.display_name, positron.mass_mev);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod error;
pub mod history;
pub mod reporter;
pub mod resolver;
pub mod tui;
pub mod types;

// Re-export commonly used types
pub use config::{BackendKind, LookupConfig};
pub use dispatcher::QueryDispatcher;
pub use engine::EngineState;
pub use error::{ErrorKind, LookupError, Result};
pub use history::HistoryStore;
pub use reporter::ErrorReporter;
pub use resolver::{BridgeStatus, ResolverBackend, ResolverBridge, ResolverSession};
pub use types::{EntryId, HistoryEntry, Mass, Query, ResolvedParticle, SearchMode};
