//! Error types for the particle lookup engine
//!
//! Structured errors are defined with thiserror; binaries propagate them
//! through anyhow at the outer edge.

use std::time::Duration;
use thiserror::Error;

/// User-facing line shown for any recoverable lookup failure
pub const INVALID_INPUT_MESSAGE: &str = "Invalid input. Try again.";

/// User-facing line shown once the resolver has failed to load
pub const UNAVAILABLE_MESSAGE: &str = "Particle data unavailable. Check the resolver setup.";

/// User-facing line for failures that are neither the user's nor the resolver's
pub const INTERNAL_MESSAGE: &str = "Internal error.";

/// Main error type for lookup operations
#[derive(Error, Debug)]
pub enum LookupError {
    /// The resolution environment or its data package failed to load
    #[error("Resolver initialization failed: {0}")]
    Initialization(String),

    /// A previous initialization failed; the bridge no longer resolves anything
    #[error("Resolver unavailable: {0}")]
    ResolverUnavailable(String),

    /// The input could not be parsed under the selected mode, or no such particle exists
    #[error("Resolution failed: {0}")]
    Resolution(String),

    /// The resolver answered with something that is not a particle record
    #[error("Malformed resolver response: {0}")]
    MalformedResponse(String),

    /// The resolver did not answer within the configured bound
    #[error("Resolver timed out after {0:?}")]
    Timeout(Duration),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A lock guarding engine state was poisoned by a panicking holder
    #[error("Engine state poisoned: {0}")]
    StatePoisoned(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Coarse classification of a [`LookupError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Fatal to the bridge; every later resolve fails too
    Initialization,
    /// Recoverable, caused by the query
    Resolution,
    /// Recoverable, caused by the resolver's output
    MalformedResponse,
    /// Anything else (I/O, config, poisoned state)
    Internal,
}

impl LookupError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::Initialization(_) | LookupError::ResolverUnavailable(_) => {
                ErrorKind::Initialization
            }
            LookupError::Resolution(_) | LookupError::Timeout(_) => ErrorKind::Resolution,
            LookupError::MalformedResponse(_) | LookupError::Serialization(_) => {
                ErrorKind::MalformedResponse
            }
            LookupError::Config(_)
            | LookupError::Io(_)
            | LookupError::StatePoisoned(_)
            | LookupError::Other(_) => ErrorKind::Internal,
        }
    }

    /// Message suitable for the UI error line
    ///
    /// Details stay in the logs; the user only ever sees one of three fixed lines.
    /// Only the load failure itself shows the unavailable line; a bridge
    /// reports it once, to the caller that ran the load.
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::Initialization(_) => UNAVAILABLE_MESSAGE,
            _ => match self.kind() {
                ErrorKind::Internal => INTERNAL_MESSAGE,
                _ => INVALID_INPUT_MESSAGE,
            },
        }
    }
}

/// Result type alias for lookup operations
pub type Result<T> = std::result::Result<T, LookupError>;

/// Convert anyhow::Error to LookupError
impl From<anyhow::Error> for LookupError {
    fn from(err: anyhow::Error) -> Self {
        LookupError::Other(err.to_string())
    }
}
