//! Core data types for the particle lookup engine
//!
//! Queries, resolved particles and history entries. Every type here is a
//! plain value: once built it is never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// How raw input text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Signed integer Particle Data Group identifier, e.g. `-11`
    #[default]
    PdgId,

    /// Particle name as the data package spells it, e.g. `pi+`
    Name,
}

impl SearchMode {
    /// Short label for the input field
    pub fn label(&self) -> &'static str {
        match self {
            SearchMode::PdgId => "PDG ID",
            SearchMode::Name => "Name",
        }
    }

    /// Helper prompt shown under the input field
    pub fn helper_text(&self) -> &'static str {
        match self {
            SearchMode::PdgId => "Enter a PDG ID (e.g. -12)",
            SearchMode::Name => "Enter a particle name (e.g. pi+)",
        }
    }

    /// The other mode
    pub fn toggle(&self) -> Self {
        match self {
            SearchMode::PdgId => SearchMode::Name,
            SearchMode::Name => SearchMode::PdgId,
        }
    }
}

impl std::fmt::Display for SearchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SearchMode::PdgId => write!(f, "pdg_id"),
            SearchMode::Name => write!(f, "name"),
        }
    }
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "pdg_id" | "pdgid" | "id" => Ok(SearchMode::PdgId),
            "name" => Ok(SearchMode::Name),
            other => Err(format!("Unknown search mode: {}", other)),
        }
    }
}

/// A submitted lookup
///
/// Snapshot of mode and input taken at submit time; later edits to the
/// pending input never reach an already dispatched query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Interpretation mode at submit time
    pub mode: SearchMode,

    /// Input text exactly as typed, untrimmed and unvalidated
    pub raw_input: String,

    /// When the query was submitted
    pub submitted_at: DateTime<Utc>,
}

impl Query {
    /// Create a query stamped with the current time
    pub fn new(mode: SearchMode, raw_input: impl Into<String>) -> Self {
        Self {
            mode,
            raw_input: raw_input.into(),
            submitted_at: Utc::now(),
        }
    }
}

/// A physical quantity in MeV, or the explicit "unknown" sentinel
///
/// `Known(0.0)` is a real value (photons are massless) and must never be
/// confused with `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mass {
    /// Value in MeV
    Known(f64),

    /// The data package has no value for this particle
    Unknown,
}

impl Mass {
    /// Map an optional value onto the sentinel
    pub fn from_option(value: Option<f64>) -> Self {
        match value {
            Some(v) => Mass::Known(v),
            None => Mass::Unknown,
        }
    }

    /// The value, if known
    pub fn value(&self) -> Option<f64> {
        match self {
            Mass::Known(v) => Some(*v),
            Mass::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Mass::Unknown)
    }
}

impl std::fmt::Display for Mass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mass::Known(v) => write!(f, "{}", v),
            Mass::Unknown => write!(f, "unknown"),
        }
    }
}

impl Serialize for Mass {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Mass::Known(v) => serializer.serialize_f64(*v),
            Mass::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for Mass {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Value(f64),
            Sentinel(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Value(v) => Ok(Mass::Known(v)),
            Repr::Sentinel(s) if s == "unknown" => Ok(Mass::Unknown),
            Repr::Sentinel(s) => Err(serde::de::Error::custom(format!(
                "expected a number or \"unknown\", got {:?}",
                s
            ))),
        }
    }
}

/// Normalized resolver result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedParticle {
    /// Name as the data package prints it, e.g. `e+`
    pub display_name: String,

    /// PDG identifier
    pub pdg_id: i64,

    /// Mass in MeV
    pub mass_mev: Mass,

    /// Total decay width in MeV
    pub width_mev: Mass,
}

/// Unique identifier for history entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One successful lookup, as recorded in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Distinguishes repeated lookups of the same particle
    pub id: EntryId,

    /// Zero-based append position in the history
    pub sequence: u64,

    /// The query as submitted
    pub query: Query,

    /// What the resolver returned for it
    pub result: ResolvedParticle,

    /// When the success transition ran
    pub resolved_at: DateTime<Utc>,
}
